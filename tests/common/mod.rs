//! Shared fixtures for integration tests

#![allow(dead_code)]

use intentkeeper::{IntentClassifier, OllamaBackend, RetryPolicy};
use mockito::{Matcher, Mock, Server, ServerGuard};
use std::sync::Arc;
use std::time::Duration;

pub const RAGEBAIT_TEXT: &str = "This is EXACTLY why I hate them. Every. Single. Time.";
pub const NEUTRAL_TEXT: &str = "The city council meets Tuesday at 7pm to discuss the new budget.";

/// Mock Ollama server
pub struct MockOllama {
    pub server: ServerGuard,
}

impl MockOllama {
    pub async fn new() -> Self {
        Self {
            server: Server::new_async().await,
        }
    }

    pub fn url(&self) -> String {
        self.server.url()
    }

    /// Backend pointed at the mock server
    pub fn backend(&self) -> OllamaBackend {
        OllamaBackend::builder()
            .host(self.url())
            .model("llama3.2")
            .timeout(Duration::from_secs(5))
            .build()
            .expect("mock backend")
    }

    /// Classifier with a short retry delay so failure paths stay fast
    pub fn classifier(&self) -> IntentClassifier {
        IntentClassifier::builder()
            .backend(Arc::new(self.backend()))
            .retry(RetryPolicy::new(1, Duration::from_millis(10)))
            .build()
            .expect("classifier")
    }

    /// `/api/generate` answering with `model_output` as the generated text
    pub async fn mock_generate(&mut self, model_output: &str, hits: usize) -> Mock {
        let envelope = serde_json::json!({
            "model": "llama3.2",
            "response": model_output,
            "done": true,
        });
        self.server
            .mock("POST", "/api/generate")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "llama3.2",
                "stream": false,
                "format": "json",
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(envelope.to_string())
            .expect(hits)
            .create_async()
            .await
    }

    pub async fn mock_generate_error(&mut self, status: usize, body: &str, hits: usize) -> Mock {
        self.server
            .mock("POST", "/api/generate")
            .with_status(status)
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }

    pub async fn mock_tags(&mut self, status: usize) -> Mock {
        self.server
            .mock("GET", "/api/tags")
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(r#"{"models":[{"name":"llama3.2:latest"}]}"#)
            .create_async()
            .await
    }
}

/// Model output for a classification
pub fn model_output(intent: &str, confidence: f64, reasoning: &str) -> String {
    serde_json::json!({
        "intent": intent,
        "confidence": confidence,
        "reasoning": reasoning,
    })
    .to_string()
}
