use crate::intents::{Action, IntentDefinition, NEUTRAL_INTENT};
use serde::{Deserialize, Serialize};

/// Outcome of classifying one piece of content.
///
/// Built only through the constructors below, which clamp `confidence` and
/// derive `action` and `manipulation_score` from the catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub intent: String,
    pub confidence: f64,
    pub reasoning: String,
    pub action: Action,
    pub manipulation_score: f64,
}

impl ClassificationResult {
    /// Assemble a result for a catalog entry.
    ///
    /// `confidence` is clamped into `[0.0, 1.0]` and the manipulation score is
    /// `weight * confidence`.
    pub fn for_intent(
        definition: &IntentDefinition,
        confidence: f64,
        reasoning: impl Into<String>,
    ) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            intent: definition.name.clone(),
            confidence,
            reasoning: reasoning.into(),
            action: definition.action,
            manipulation_score: (definition.weight * confidence).clamp(0.0, 1.0),
        }
    }

    fn neutral_pass(confidence: f64, reasoning: impl Into<String>) -> Self {
        Self {
            intent: NEUTRAL_INTENT.to_string(),
            confidence,
            reasoning: reasoning.into(),
            action: Action::Pass,
            manipulation_score: 0.0,
        }
    }

    /// Result for content below the minimum classifiable length.
    pub fn too_short() -> Self {
        Self::neutral_pass(1.0, "Content too short to classify")
    }

    /// Result when the backend output could not be interpreted.
    pub fn parse_fallback() -> Self {
        Self::neutral_pass(0.0, "Failed to parse classification")
    }

    /// Result when the backend could not be reached after retries.
    pub fn fail_open(detail: impl std::fmt::Display) -> Self {
        Self::neutral_pass(0.0, format!("Classification failed: {}", detail))
    }

    /// Only results carrying some confidence are worth remembering.
    pub fn is_cacheable(&self) -> bool {
        self.confidence > 0.0
    }
}
