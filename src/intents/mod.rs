//! Intent catalog: the static table of intents the classifier can report.
//!
//! # Intent Catalog Module
//!
//! Each intent maps to a human-readable description, a recommended
//! [`Action`] for the consumer (blur, tag, hide or pass) and a severity
//! weight used to compute the manipulation score.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`IntentCatalog`] | Ordered, read-only intent table with neutral fallback lookup |
//! | [`IntentDefinition`] | One catalog entry |
//! | [`Action`] | Closed set of recommended consumer actions |
//! | [`FewShotExample`] | Example used to prime the classification prompt |
//!
//! ## Example
//!
//! ```rust
//! use intentkeeper::intents::{Action, IntentCatalog};
//!
//! let catalog = IntentCatalog::default();
//! assert_eq!(catalog.get("ragebait").action, Action::Blur);
//!
//! // Unknown names resolve to the neutral entry.
//! assert_eq!(catalog.get("no_such_intent").name, "neutral");
//! ```
//!
//! The catalog is loaded once from a YAML document (see
//! [`IntentCatalog::load`]); a missing or malformed document falls back to
//! the built-in seven-intent set.

mod catalog;

pub use catalog::{Action, FewShotExample, IntentCatalog, IntentDefinition, NEUTRAL_INTENT};
