//! intentkeeper: content intent classification server and command-line tool
//!
//! Usage:
//!   intentkeeper [serve]                 Run the HTTP API (default)
//!   intentkeeper classify <text...>      Classify one piece of text
//!   intentkeeper intents [--json]        Show the loaded intent catalog
//!   intentkeeper health                  Check the Ollama connection

use anyhow::Context;
use intentkeeper::config::{debug_enabled, ClassifierConfig, ServerConfig};
use intentkeeper::IntentClassifier;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("serve");

    match command {
        "serve" => cmd_serve().await,
        "classify" => cmd_classify(&args[2..]).await,
        "intents" => cmd_intents(&args[2..]),
        "health" => cmd_health().await,
        "version" | "--version" | "-V" => {
            cmd_version();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let default_level = if debug_enabled() { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_usage() {
    println!(
        r#"intentkeeper: local content intent classification

USAGE:
    intentkeeper <COMMAND> [OPTIONS]

COMMANDS:
    serve                       Run the HTTP API (default)
    classify <text...>          Classify one piece of text and print the result as JSON
    intents [--json]            Show the loaded intent catalog
    health                      Check whether Ollama is reachable
    version                     Show version information
    help                        Show this help message

ENVIRONMENT:
    OLLAMA_HOST                 Ollama base URL (default http://localhost:11434)
    OLLAMA_MODEL                Model name (default llama3.2)
    OLLAMA_TEMPERATURE          Sampling temperature (default 0.1)
    CACHE_MAX_SIZE              Cached classifications before LRU eviction (default 500)
    CACHE_TTL                   Cache time-to-live in seconds (default 300)
    INTENTS_PATH                Intent catalog YAML (default scenarios/intents.yaml)
    INTENTKEEPER_HOST           Bind host (default 127.0.0.1)
    INTENTKEEPER_PORT           Bind port (default 8420)
    DEBUG                       "true" for debug logging (RUST_LOG takes precedence)"#
    );
}

fn cmd_version() {
    println!("intentkeeper {}", env!("CARGO_PKG_VERSION"));
}

fn build_classifier() -> anyhow::Result<IntentClassifier> {
    let config = ClassifierConfig::from_env();
    IntentClassifier::from_config(&config).context("failed to build classifier")
}

async fn cmd_serve() -> anyhow::Result<()> {
    let server_config = ServerConfig::from_env();
    let classifier = Arc::new(build_classifier()?);

    tracing::info!(
        model = classifier.model(),
        intents = classifier.intents().len(),
        "Starting intentkeeper server"
    );
    if classifier.check_health().await {
        tracing::info!("Ollama connection OK");
    } else {
        tracing::warn!("Ollama not reachable; classifications will fail open until it is");
    }

    intentkeeper::server::serve(&server_config, classifier)
        .await
        .context("server error")
}

async fn cmd_classify(args: &[String]) -> anyhow::Result<()> {
    if args.is_empty() {
        eprintln!("Usage: intentkeeper classify <text...>");
        std::process::exit(1);
    }
    let content = args.join(" ");
    let classifier = build_classifier()?;
    let result = classifier.classify(&content).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn cmd_intents(args: &[String]) -> anyhow::Result<()> {
    let config = ClassifierConfig::from_env();
    let catalog = intentkeeper::IntentCatalog::load(&config.intents_path);

    if args.iter().any(|a| a == "--json") {
        println!("{}", serde_json::to_string_pretty(&catalog.to_document())?);
        return Ok(());
    }

    println!("{:<18} {:<6} {:>6}  DESCRIPTION", "INTENT", "ACTION", "WEIGHT");
    for intent in catalog.iter() {
        println!(
            "{:<18} {:<6} {:>6.2}  {}",
            intent.name, intent.action, intent.weight, intent.description
        );
    }
    if !catalog.rules().is_empty() {
        println!("\nRules:");
        for rule in catalog.rules() {
            println!("  - {rule}");
        }
    }
    Ok(())
}

async fn cmd_health() -> anyhow::Result<()> {
    let classifier = build_classifier()?;
    if classifier.check_health().await {
        println!("ok: Ollama reachable, model {}", classifier.model());
        Ok(())
    } else {
        eprintln!("degraded: Ollama not reachable");
        std::process::exit(2);
    }
}
