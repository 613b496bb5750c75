//! Cipher Contract
//!
//! Every cipher family encrypts, decrypts, and knows how to crack itself.
//! Text is handled as bytes: letter ciphers only touch ASCII letters, the
//! stream ciphers touch every byte.

use crate::key::Key;
use crate::{CipherKind, Result};
use serde::{Deserialize, Serialize};

/// Best key a cracker found and its chi-squared score (lower is better)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrackOutcome {
    /// `None` when no key survived the search
    pub key: Option<Key>,
    pub score: f64,
}

impl CrackOutcome {
    pub fn new(key: Key, score: f64) -> Self {
        Self { key: Some(key), score }
    }

    /// Nothing survived the search
    pub fn none() -> Self {
        Self { key: None, score: f64::INFINITY }
    }

    pub fn is_found(&self) -> bool {
        self.key.is_some()
    }
}

pub trait Cipher: Send + Sync {
    fn kind(&self) -> CipherKind;

    fn encrypt(&self, text: &[u8], key: &Key) -> Result<Vec<u8>>;

    fn decrypt(&self, text: &[u8], key: &Key) -> Result<Vec<u8>>;

    /// Most likely key for `text` and the chi-squared value of its decryption
    fn crack(&self, text: &[u8]) -> CrackOutcome;

    /// Display name, more specific when the key is known
    fn name(&self, _key: Option<&Key>) -> String {
        self.kind().name().to_string()
    }

    /// What a key for this cipher looks like
    fn usage(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crack_outcome() {
        let found = CrackOutcome::new(Key::Xor(7), 12.5);
        assert!(found.is_found());

        let none = CrackOutcome::none();
        assert!(!none.is_found());
        assert!(none.score > found.score);
    }
}
