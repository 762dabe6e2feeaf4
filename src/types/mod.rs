//! Core value types shared across the classifier.

pub mod classification;

pub use classification::ClassificationResult;
