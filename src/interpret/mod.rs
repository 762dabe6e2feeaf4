//! Response interpretation: turns free-form backend output into a
//! validated [`ClassificationResult`].
//!
//! Decoding is tolerant. The raw text is parsed as JSON directly, and when
//! that fails the first fenced code block or the outermost `{...}` span is
//! tried instead. The decoded object is read into a typed intermediate with
//! every field optional, then validated:
//!
//! - `intent` is trimmed and lowercased; unknown or missing names become `neutral`
//! - `confidence` defaults to `0.5` and is clamped into `[0.0, 1.0]`
//! - `action` and the score weight always come from the catalog
//!
//! Anything that cannot be decoded degrades to
//! [`ClassificationResult::parse_fallback`]. Interpretation never fails.

use crate::intents::IntentCatalog;
use crate::types::ClassificationResult;
use regex::Regex;
use serde::Deserialize;
use std::sync::Arc;

/// Confidence used when the model omits the field.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

const LOG_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawConfidence {
    Number(f64),
    Text(String),
}

#[derive(Debug, Default, Deserialize)]
struct RawClassification {
    #[serde(default)]
    intent: Option<String>,
    #[serde(default)]
    confidence: Option<RawConfidence>,
    #[serde(default)]
    reasoning: Option<String>,
}

/// Interprets raw backend text against an intent catalog.
#[derive(Debug, Clone)]
pub struct ResponseInterpreter {
    catalog: Arc<IntentCatalog>,
    extractors: Vec<Regex>,
}

impl ResponseInterpreter {
    pub fn new(catalog: Arc<IntentCatalog>) -> Self {
        let patterns = [
            r"```json\s*([\s\S]*?)\s*```",
            r"```\s*([\s\S]*?)\s*```",
            r"\{[\s\S]*\}",
        ];
        let extractors = patterns
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect();
        Self {
            catalog,
            extractors,
        }
    }

    pub fn catalog(&self) -> &IntentCatalog {
        &self.catalog
    }

    /// Parse backend output into a classification result.
    pub fn parse(&self, raw: &str) -> ClassificationResult {
        let Some(object) = self.extract_object(raw) else {
            tracing::warn!(response = %preview(raw), "Invalid JSON in classification response");
            return ClassificationResult::parse_fallback();
        };

        let decoded: RawClassification = match serde_json::from_value(object) {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    response = %preview(raw),
                    "Malformed fields in classification response"
                );
                return ClassificationResult::parse_fallback();
            }
        };

        let confidence = match decoded.confidence {
            None => DEFAULT_CONFIDENCE,
            Some(RawConfidence::Number(n)) => n,
            Some(RawConfidence::Text(s)) => match s.trim().parse::<f64>() {
                Ok(n) => n,
                Err(_) => {
                    tracing::warn!(
                        confidence = %s,
                        "Non-numeric confidence in classification response"
                    );
                    return ClassificationResult::parse_fallback();
                }
            },
        };
        if confidence.is_nan() {
            tracing::warn!("NaN confidence in classification response");
            return ClassificationResult::parse_fallback();
        }

        let intent = decoded
            .intent
            .map(|i| i.trim().to_lowercase())
            .unwrap_or_default();
        if !intent.is_empty() && !self.catalog.contains(&intent) {
            tracing::debug!(intent = %intent, "Unknown intent from model, using neutral");
        }
        let definition = self.catalog.get(&intent);

        ClassificationResult::for_intent(
            definition,
            confidence,
            decoded.reasoning.unwrap_or_default(),
        )
    }

    /// Find a JSON object in the text.
    fn extract_object(&self, text: &str) -> Option<serde_json::Value> {
        let trimmed = text.trim();
        if let Ok(value @ serde_json::Value::Object(_)) =
            serde_json::from_str::<serde_json::Value>(trimmed)
        {
            return Some(value);
        }

        for re in &self.extractors {
            let Some(captures) = re.captures(trimmed) else {
                continue;
            };
            let candidate = match captures.get(1) {
                Some(inner) => inner.as_str(),
                None => captures.get(0).map(|c| c.as_str()).unwrap_or(trimmed),
            };
            if let Ok(value @ serde_json::Value::Object(_)) =
                serde_json::from_str::<serde_json::Value>(candidate.trim())
            {
                return Some(value);
            }
        }

        None
    }
}

fn preview(text: &str) -> String {
    text.chars().take(LOG_PREVIEW_CHARS).collect()
}
