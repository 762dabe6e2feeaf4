//! Runtime configuration.
//!
//! Every knob has a default and can be overridden from the environment.
//! Values that fail to parse are ignored in favour of the default.

use crate::cache::{CacheConfig, MAX_TTL};
use crate::gateway::{RetryPolicy, DEFAULT_MODEL, DEFAULT_OLLAMA_HOST};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_INTENTS_PATH: &str = "scenarios/intents.yaml";
pub const DEFAULT_TEMPERATURE: f64 = 0.1;
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";
pub const DEFAULT_SERVER_PORT: u16 = 8420;

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.trim().parse::<T>().ok())
}

fn env_string(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

/// Classifier construction settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    pub ollama_host: String,
    pub model: String,
    pub temperature: f64,
    pub intents_path: PathBuf,
    pub cache: CacheConfig,
    pub retry: RetryPolicy,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            ollama_host: DEFAULT_OLLAMA_HOST.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            intents_path: PathBuf::from(DEFAULT_INTENTS_PATH),
            cache: CacheConfig::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl ClassifierConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `OLLAMA_HOST`, `OLLAMA_MODEL`,
    /// `OLLAMA_TEMPERATURE`, `CACHE_MAX_SIZE`, `CACHE_TTL` (seconds) and
    /// `INTENTS_PATH`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let cache = CacheConfig {
            ttl: env_parse::<u64>("CACHE_TTL")
                .map(Duration::from_secs)
                .map(|ttl| ttl.min(MAX_TTL))
                .unwrap_or(defaults.cache.ttl),
            max_entries: env_parse::<usize>("CACHE_MAX_SIZE")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.cache.max_entries),
        };
        Self {
            ollama_host: env_string("OLLAMA_HOST").unwrap_or(defaults.ollama_host),
            model: env_string("OLLAMA_MODEL").unwrap_or(defaults.model),
            temperature: env_parse::<f64>("OLLAMA_TEMPERATURE")
                .filter(|t| t.is_finite() && *t >= 0.0)
                .unwrap_or(defaults.temperature),
            intents_path: env_string("INTENTS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.intents_path),
            cache,
            retry: defaults.retry,
        }
    }

    pub fn with_ollama_host(mut self, host: impl Into<String>) -> Self {
        self.ollama_host = host.into();
        self
    }
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
    pub fn with_intents_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.intents_path = path.into();
        self
    }
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `INTENTKEEPER_HOST` and `INTENTKEEPER_PORT`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_string("INTENTKEEPER_HOST").unwrap_or(defaults.host),
            port: env_parse::<u16>("INTENTKEEPER_PORT").unwrap_or(defaults.port),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// `DEBUG=true` switches the default log level to debug.
pub fn debug_enabled() -> bool {
    env::var("DEBUG")
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
