//! HTTP API for the browser extension.
//!
//! | Route | Description |
//! |-------|-------------|
//! | `GET /health` | Server and backend reachability |
//! | `POST /classify` | Classify one piece of content |
//! | `POST /classify/batch` | Classify up to 50 pieces concurrently |
//! | `GET /intents` | Current intent catalog |
//!
//! The classifier is built by the hosting process and handed to
//! [`build_router`]; handlers only ever see it through [`AppState`].

mod handlers;

pub use handlers::{
    BatchClassifyRequest, BatchClassifyResponse, ClassifyRequest, HealthResponse,
    MAX_BATCH_ITEMS,
};

use crate::classifier::IntentClassifier;
use crate::config::ServerConfig;
use crate::{Error, ErrorContext, Result};
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state accessible by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<IntentClassifier>,
}

/// Build the API router around an existing classifier.
pub fn build_router(classifier: Arc<IntentClassifier>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin: &HeaderValue, _: &Parts| {
            origin.to_str().map(is_allowed_origin).unwrap_or(false)
        }))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        .merge(handlers::api_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { classifier })
}

/// Extension pages and local development origins only.
fn is_allowed_origin(origin: &str) -> bool {
    if origin.starts_with("chrome-extension://") {
        return true;
    }
    ["http://localhost", "http://127.0.0.1"]
        .iter()
        .any(|base| match origin.strip_prefix(base) {
            Some("") => true,
            Some(rest) => rest
                .strip_prefix(':')
                .map(|port| !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()))
                .unwrap_or(false),
            None => false,
        })
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: &ServerConfig, classifier: Arc<IntentClassifier>) -> Result<()> {
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        Error::runtime_with_context(
            format!("Failed to bind listener: {}", e),
            ErrorContext::new().with_details(addr.clone()).with_source("server"),
        )
    })?;
    tracing::info!(addr = %addr, "intentkeeper server listening");

    axum::serve(listener, build_router(classifier))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down intentkeeper server");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
}
