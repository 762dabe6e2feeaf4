//! Classification orchestrator.
//!
//! [`IntentClassifier`] ties the pieces together for each request:
//!
//! 1. content shorter than [`MIN_CONTENT_CHARS`] (after trimming) is neutral,
//!    without touching the cache or the backend
//! 2. a cache hit is returned unchanged
//! 3. on a miss the backend is called under the retry policy and its output
//!    is interpreted
//! 4. a backend failure that survives the retries yields a fail-open neutral
//!    result
//! 5. only results with positive confidence are cached
//!
//! `classify` never fails. Blocking content because classification is down
//! is worse than letting it through as neutral.

use crate::cache::{CacheKey, CacheStats, ClassificationCache};
use crate::config::ClassifierConfig;
use crate::gateway::{InferenceBackend, OllamaBackend, PromptBuilder, RetryPolicy};
use crate::intents::IntentCatalog;
use crate::interpret::ResponseInterpreter;
use crate::types::ClassificationResult;
use crate::{CacheConfig, Error, Result};
use std::sync::Arc;
use tracing::{debug, error};

/// Trimmed content shorter than this is not worth a model call.
pub const MIN_CONTENT_CHARS: usize = 20;

/// Classifies content intent through an inference backend, with caching.
pub struct IntentClassifier {
    backend: Arc<dyn InferenceBackend>,
    catalog: Arc<IntentCatalog>,
    prompt: PromptBuilder,
    interpreter: ResponseInterpreter,
    cache: ClassificationCache,
    retry: RetryPolicy,
}

impl IntentClassifier {
    pub fn builder() -> IntentClassifierBuilder {
        IntentClassifierBuilder::new()
    }

    /// Build an Ollama-backed classifier from configuration.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        let backend = OllamaBackend::builder()
            .host(config.ollama_host.as_str())
            .model(config.model.as_str())
            .temperature(config.temperature)
            .build()?;
        Self::builder()
            .backend(Arc::new(backend))
            .catalog(IntentCatalog::load(&config.intents_path))
            .cache_config(config.cache.clone())
            .retry(config.retry)
            .build()
    }

    /// Classify one piece of content. Always returns a usable result.
    pub async fn classify(&self, content: &str) -> ClassificationResult {
        if content.trim().chars().count() < MIN_CONTENT_CHARS {
            return ClassificationResult::too_short();
        }

        let key = CacheKey::from_content(content);
        if let Some(cached) = self.cache.get(&key) {
            debug!(key = %key, intent = %cached.intent, "classification cache hit");
            return cached;
        }

        let prompt = self.prompt.build(content);
        let classification = match self.retry.run(|| self.backend.generate(&prompt)).await {
            Ok(raw) => self.interpreter.parse(&raw),
            Err(e) => {
                error!(
                    error = %e,
                    model = self.backend.model(),
                    "classification error, failing open"
                );
                ClassificationResult::fail_open(&e)
            }
        };

        if classification.is_cacheable() {
            self.cache.put(key, classification.clone());
        }
        classification
    }

    /// Classify many contents concurrently. Results follow input order.
    pub async fn classify_batch<S>(&self, contents: &[S]) -> Vec<ClassificationResult>
    where
        S: AsRef<str> + Sync,
    {
        futures::future::join_all(contents.iter().map(|c| self.classify(c.as_ref()))).await
    }

    /// Whether the backend is reachable. Never fails.
    pub async fn check_health(&self) -> bool {
        self.backend.check_health().await
    }

    pub fn intents(&self) -> &IntentCatalog {
        &self.catalog
    }

    pub fn model(&self) -> &str {
        self.backend.model()
    }

    pub fn cache(&self) -> &ClassificationCache {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

/// Builder for [`IntentClassifier`], mainly for injecting a backend.
pub struct IntentClassifierBuilder {
    backend: Option<Arc<dyn InferenceBackend>>,
    catalog: Option<IntentCatalog>,
    cache_config: CacheConfig,
    retry: RetryPolicy,
}

impl IntentClassifierBuilder {
    pub fn new() -> Self {
        Self {
            backend: None,
            catalog: None,
            cache_config: CacheConfig::default(),
            retry: RetryPolicy::default(),
        }
    }
    pub fn backend(mut self, backend: Arc<dyn InferenceBackend>) -> Self {
        self.backend = Some(backend);
        self
    }
    pub fn catalog(mut self, catalog: IntentCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }
    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn build(self) -> Result<IntentClassifier> {
        let backend = self
            .backend
            .ok_or_else(|| Error::configuration("An inference backend must be specified"))?;
        let catalog = Arc::new(self.catalog.unwrap_or_default());
        let prompt = PromptBuilder::new(&catalog);
        let interpreter = ResponseInterpreter::new(catalog.clone());
        let cache = ClassificationCache::new(self.cache_config)?;
        Ok(IntentClassifier {
            backend,
            catalog,
            prompt,
            interpreter,
            cache,
            retry: self.retry,
        })
    }
}

impl Default for IntentClassifierBuilder {
    fn default() -> Self {
        Self::new()
    }
}
