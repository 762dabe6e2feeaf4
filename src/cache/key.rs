//! Content fingerprints.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Cache key: lowercase hex SHA-256 of the exact content bytes.
///
/// No normalization is applied, so contents that differ only in whitespace
/// or case get different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn from_content(content: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        let hash: String = hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_content_same_key() {
        let a = CacheKey::from_content("This is EXACTLY why I hate them.");
        let b = CacheKey::from_content("This is EXACTLY why I hate them.");
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);
    }

    #[test]
    fn test_no_normalization() {
        let a = CacheKey::from_content("hello world");
        assert_ne!(a, CacheKey::from_content("hello world "));
        assert_ne!(a, CacheKey::from_content("Hello world"));
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(
            CacheKey::from_content("").to_string(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
