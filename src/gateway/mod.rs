//! Inference gateway: everything between the classifier and the model server.
//!
//! # Inference Gateway Module
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`InferenceBackend`] | Seam for the model call and health probe |
//! | [`OllamaBackend`] | `reqwest` implementation against Ollama's `/api/generate` |
//! | [`PromptBuilder`] | Static prompt prefix plus per-call content framing |
//! | [`RetryPolicy`] | Bounded fixed-delay retry combinator |
//! | [`BackendError`] | Transport, timeout and status failures |
//!
//! ## Example
//!
//! ```rust,no_run
//! use intentkeeper::gateway::{InferenceBackend, OllamaBackend, RetryPolicy};
//!
//! # async fn run() -> intentkeeper::Result<()> {
//! let backend = OllamaBackend::builder()
//!     .host("http://localhost:11434")
//!     .model("llama3.2")
//!     .build()?;
//!
//! let raw = RetryPolicy::default()
//!     .run(|| backend.generate("Classify: ..."))
//!     .await?;
//! println!("{raw}");
//! # Ok(())
//! # }
//! ```

mod ollama;
mod prompt;
mod retry;

pub use ollama::{OllamaBackend, OllamaBackendBuilder, DEFAULT_OLLAMA_HOST, DEFAULT_MODEL};
pub use prompt::{PromptBuilder, MAX_CONTENT_CHARS, MAX_FEW_SHOT_EXAMPLES};
pub use retry::RetryPolicy;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single backend call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response envelope: {0}")]
    InvalidResponse(String),

    #[error("transport error: {0}")]
    Transport(String),
}

/// The model server as seen by the classifier.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Send a prompt and return the model's raw text output.
    async fn generate(&self, prompt: &str) -> Result<String, BackendError>;

    /// Lightweight reachability probe. Never fails; unreachable is `false`.
    async fn check_health(&self) -> bool;

    /// Model identifier used for generation.
    fn model(&self) -> &str;
}
