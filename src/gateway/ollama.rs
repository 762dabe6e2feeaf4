//! Ollama backend over HTTP.

use super::{BackendError, InferenceBackend};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.2";

const DEFAULT_TEMPERATURE: f64 = 0.1;
// JSON answers are typically 40-60 tokens; leave headroom for reasoning.
const DEFAULT_MAX_TOKENS: u32 = 150;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);
const ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f64,
    num_predict: u32,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    format: &'a str,
    options: GenerateOptions,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Client for a local Ollama server.
///
/// Holds one `reqwest::Client` for its whole lifetime so connections are
/// pooled across classification calls.
pub struct OllamaBackend {
    http_client: reqwest::Client,
    host: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
    timeout: Duration,
}

impl OllamaBackend {
    pub fn builder() -> OllamaBackendBuilder {
        OllamaBackendBuilder::new()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    fn map_send_error(&self, e: reqwest::Error) -> BackendError {
        if e.is_timeout() {
            BackendError::Timeout(self.timeout)
        } else if e.is_connect() {
            BackendError::Connection(e.to_string())
        } else {
            BackendError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl InferenceBackend for OllamaBackend {
    async fn generate(&self, prompt: &str) -> std::result::Result<String, BackendError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format: "json",
            options: GenerateOptions {
                temperature: self.temperature,
                num_predict: self.max_tokens,
            },
        };
        let endpoint = format!("{}/api/generate", self.host);
        let response = self
            .http_client
            .post(&endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_CHARS).collect(),
            });
        }

        let envelope: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
        Ok(envelope.response.trim().to_string())
    }

    async fn check_health(&self) -> bool {
        let endpoint = format!("{}/api/tags", self.host);
        match self
            .http_client
            .get(&endpoint)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
        {
            Ok(resp) => resp.status() == reqwest::StatusCode::OK,
            Err(e) => {
                tracing::debug!(host = %self.host, error = %e, "Ollama health probe failed");
                false
            }
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}

pub struct OllamaBackendBuilder {
    host: Option<String>,
    model: Option<String>,
    temperature: f64,
    max_tokens: u32,
    timeout: Duration,
    http_client: Option<reqwest::Client>,
}

impl OllamaBackendBuilder {
    pub fn new() -> Self {
        Self {
            host: None,
            model: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
            http_client: None,
        }
    }
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
    /// Share an existing client (its own timeout applies).
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn build(self) -> Result<OllamaBackend> {
        let host = self
            .host
            .unwrap_or_else(|| DEFAULT_OLLAMA_HOST.to_string());
        url::Url::parse(&host).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid Ollama host: {}", e),
                ErrorContext::new()
                    .with_field_path("ollama_host")
                    .with_details(host.clone())
                    .with_source("ollama_backend"),
            )
        })?;
        let http_client = match self.http_client {
            Some(c) => c,
            None => reqwest::Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(|e| {
                    Error::configuration(format!("Failed to create HTTP client: {}", e))
                })?,
        };
        Ok(OllamaBackend {
            http_client,
            host: host.trim_end_matches('/').to_string(),
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout: self.timeout,
        })
    }
}

impl Default for OllamaBackendBuilder {
    fn default() -> Self {
        Self::new()
    }
}
