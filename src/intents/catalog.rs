//! Intent catalog loading and lookup.

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Name of the intent every unknown or failed classification resolves to.
pub const NEUTRAL_INTENT: &str = "neutral";

/// Recommended action for content carrying a given intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Blur,
    Tag,
    Hide,
    Pass,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Blur => "blur",
            Action::Tag => "tag",
            Action::Hide => "hide",
            Action::Pass => "pass",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blur" => Ok(Action::Blur),
            "tag" => Ok(Action::Tag),
            "hide" => Ok(Action::Hide),
            "pass" => Ok(Action::Pass),
            other => Err(format!("Unknown action: {}", other)),
        }
    }
}

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntentDefinition {
    #[serde(skip)]
    pub name: String,
    pub description: String,
    pub action: Action,
    /// Severity weight in `[0.0, 1.0]`.
    pub weight: f64,
}

impl IntentDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        action: Action,
        weight: f64,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            action,
            weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FewShotExample {
    pub content: String,
    pub intent: String,
}

#[derive(Debug, Deserialize)]
struct RawIntent {
    #[serde(default)]
    description: String,
    action: Action,
    #[serde(default)]
    weight: f64,
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(default)]
    intents: serde_yaml::Mapping,
    #[serde(default)]
    rules: Vec<String>,
    #[serde(default)]
    few_shot_examples: Vec<FewShotExample>,
}

/// Read-only intent table.
///
/// Iteration order follows the source document so the generated prompt is
/// stable between runs. A `neutral` entry is always present.
#[derive(Debug, Clone)]
pub struct IntentCatalog {
    intents: Vec<IntentDefinition>,
    index: HashMap<String, usize>,
    neutral: usize,
    rules: Vec<String>,
    few_shot_examples: Vec<FewShotExample>,
}

impl IntentCatalog {
    /// Load the catalog from a YAML file, falling back to the built-in set.
    ///
    /// Never fails: a missing file or an invalid document is logged at warn
    /// level and the defaults are used instead.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Intents file not found, using built-in defaults"
            );
            return Self::builtin();
        }
        match Self::try_load(path) {
            Ok(catalog) => {
                tracing::debug!(
                    path = %path.display(),
                    intents = catalog.len(),
                    "Loaded intent catalog"
                );
                catalog
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to load intents file, using built-in defaults"
                );
                Self::builtin()
            }
        }
    }

    /// Load the catalog from a YAML file, surfacing any failure.
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate a catalog document.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let raw: RawCatalog = serde_yaml::from_str(content)?;
        if raw.intents.is_empty() {
            return Err(Error::validation_with_context(
                "intent catalog defines no intents",
                ErrorContext::new()
                    .with_field_path("intents")
                    .with_source("intent_catalog"),
            ));
        }

        let mut intents: Vec<IntentDefinition> = Vec::with_capacity(raw.intents.len() + 1);
        for (key, value) in raw.intents {
            let name = key
                .as_str()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    Error::validation_with_context(
                        "intent names must be non-empty strings",
                        ErrorContext::new()
                            .with_field_path("intents")
                            .with_details(format!("{:?}", key))
                            .with_source("intent_catalog"),
                    )
                })?;
            if intents.iter().any(|i| i.name == name) {
                return Err(Error::validation_with_context(
                    "duplicate intent name",
                    ErrorContext::new()
                        .with_field_path(format!("intents.{}", name))
                        .with_details(format!("{:?}", key))
                        .with_source("intent_catalog"),
                ));
            }
            let entry: RawIntent = serde_yaml::from_value(value).map_err(|e| {
                Error::validation_with_context(
                    e.to_string(),
                    ErrorContext::new()
                        .with_field_path(format!("intents.{}", name))
                        .with_source("intent_catalog"),
                )
            })?;
            if !entry.weight.is_finite() {
                return Err(Error::validation_with_context(
                    "weight must be a finite number",
                    ErrorContext::new()
                        .with_field_path(format!("intents.{}.weight", name))
                        .with_source("intent_catalog"),
                ));
            }
            intents.push(IntentDefinition::new(
                name,
                entry.description,
                entry.action,
                entry.weight.clamp(0.0, 1.0),
            ));
        }

        if !intents.iter().any(|i| i.name == NEUTRAL_INTENT) {
            intents.push(builtin_neutral());
        }

        Ok(Self::from_parts(intents, raw.rules, raw.few_shot_examples))
    }

    /// The built-in seven-intent catalog.
    pub fn builtin() -> Self {
        let intents = vec![
            IntentDefinition::new(
                "ragebait",
                "Content designed to provoke anger or outrage",
                Action::Blur,
                0.9,
            ),
            IntentDefinition::new(
                "fearmongering",
                "Exaggerated threats or doom content",
                Action::Tag,
                0.7,
            ),
            IntentDefinition::new(
                "hype",
                "Manufactured urgency or FOMO triggers",
                Action::Tag,
                0.5,
            ),
            IntentDefinition::new(
                "engagement_bait",
                "Empty interaction requests",
                Action::Hide,
                0.6,
            ),
            IntentDefinition::new(
                "divisive",
                "Us-vs-them framing, tribal triggers",
                Action::Tag,
                0.7,
            ),
            IntentDefinition::new(
                "genuine",
                "Authentic insight or honest perspective",
                Action::Pass,
                0.0,
            ),
            builtin_neutral(),
        ];
        Self::from_parts(intents, Vec::new(), Vec::new())
    }

    fn from_parts(
        intents: Vec<IntentDefinition>,
        rules: Vec<String>,
        few_shot_examples: Vec<FewShotExample>,
    ) -> Self {
        let mut index = HashMap::with_capacity(intents.len());
        for (i, intent) in intents.iter().enumerate() {
            index.insert(intent.name.clone(), i);
        }
        let neutral = index.get(NEUTRAL_INTENT).copied().unwrap_or(0);
        Self {
            intents,
            index,
            neutral,
            rules,
            few_shot_examples,
        }
    }

    /// Look up an intent, resolving unknown names to the neutral entry.
    pub fn get(&self, name: &str) -> &IntentDefinition {
        self.index
            .get(name)
            .map(|&i| &self.intents[i])
            .unwrap_or_else(|| self.neutral())
    }

    pub fn neutral(&self) -> &IntentDefinition {
        &self.intents[self.neutral]
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IntentDefinition> {
        self.intents.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.intents.iter().map(|i| i.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    pub fn few_shot_examples(&self) -> &[FewShotExample] {
        &self.few_shot_examples
    }

    /// Render the catalog in its document shape, for the `/intents` endpoint.
    pub fn to_document(&self) -> serde_json::Value {
        let intents: serde_json::Map<String, serde_json::Value> = self
            .intents
            .iter()
            .map(|i| {
                (
                    i.name.clone(),
                    serde_json::json!({
                        "description": i.description,
                        "action": i.action,
                        "weight": i.weight,
                    }),
                )
            })
            .collect();
        serde_json::json!({
            "intents": intents,
            "rules": self.rules,
            "few_shot_examples": self.few_shot_examples,
        })
    }
}

impl Default for IntentCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_neutral() -> IntentDefinition {
    IntentDefinition::new(
        NEUTRAL_INTENT,
        "Informational content, no manipulation",
        Action::Pass,
        0.0,
    )
}
