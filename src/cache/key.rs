//! Cache key derivation.

use sha2::{Digest, Sha256};

/// Namespace for tone adjustment results.
pub const TONE_NAMESPACE: &str = "tone";

/// Byte placed between the text and the tone value before hashing.
const SEPARATOR: u8 = 0x1f;

// == Key Deriver ==
/// Maps `(text, tone_value)` to a namespaced SHA-256 cache key.
///
/// The tone value is written in decimal after the separator and never
/// contains it, so the hashed input is unambiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDeriver {
    namespace: String,
}

impl KeyDeriver {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// Deriver for tone adjustment entries.
    pub fn tone() -> Self {
        Self::new(TONE_NAMESPACE)
    }

    pub fn derive_key(&self, text: &str, tone_value: u8) -> String {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        hasher.update([SEPARATOR]);
        hasher.update(tone_value.to_string().as_bytes());
        format!("{}:{:x}", self.namespace, hasher.finalize())
    }
}

impl Default for KeyDeriver {
    fn default() -> Self {
        Self::tone()
    }
}
