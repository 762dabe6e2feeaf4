//! # intentkeeper
//!
//! Local content intent classification backed by an Ollama model.
//!
//! ## Overview
//!
//! intentkeeper sits between a browser extension and a local language model.
//! It asks the model what a short piece of text is trying to do to its
//! reader (provoke outrage, manufacture urgency, farm engagement, or simply
//! inform) and maps the answer to a recommended action for the extension:
//! blur, tag, hide or pass.
//!
//! ## Core Behaviour
//!
//! - **Fail open**: classification never errors; outages degrade to `neutral` / `pass`
//! - **Cached**: successful results are kept per content fingerprint with a TTL and LRU bound
//! - **Bounded retry**: one retry after a fixed delay before failing open
//! - **Tolerant parsing**: model output is decoded leniently, then validated and clamped
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use intentkeeper::{ClassifierConfig, IntentClassifier};
//!
//! #[tokio::main]
//! async fn main() -> intentkeeper::Result<()> {
//!     let classifier = IntentClassifier::from_config(&ClassifierConfig::from_env())?;
//!
//!     let result = classifier
//!         .classify("This is EXACTLY why I hate them. Every. Single. Time.")
//!         .await;
//!     println!("{} ({:.2}) -> {}", result.intent, result.confidence, result.action);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`classifier`] | Orchestrator: short-circuit, cache, backend, fail-open |
//! | [`cache`] | TTL + LRU classification cache |
//! | [`gateway`] | Prompt construction, retry and the Ollama backend |
//! | [`interpret`] | Tolerant decoding of model output |
//! | [`intents`] | Intent catalog loading and lookup |
//! | [`server`] | axum HTTP API |
//! | [`config`] | Environment-driven configuration |
//! | [`types`] | Shared value types |

pub mod cache;
pub mod classifier;
pub mod config;
pub mod gateway;
pub mod intents;
pub mod interpret;
pub mod server;
pub mod types;

// Re-export main types for convenience
pub use cache::{CacheConfig, CacheKey, CacheStats, ClassificationCache};
pub use classifier::{IntentClassifier, IntentClassifierBuilder, MIN_CONTENT_CHARS};
pub use config::{ClassifierConfig, ServerConfig};
pub use gateway::{BackendError, InferenceBackend, OllamaBackend, RetryPolicy};
pub use intents::{Action, IntentCatalog, IntentDefinition};
pub use types::ClassificationResult;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
