//! Identity cipher, the "already plaintext" hypothesis every other crack is
//! measured against.

use crate::cipher::{Cipher, CrackOutcome};
use crate::key::Key;
use crate::scoring::Scorer;
use crate::{CipherKind, Result};
use std::sync::Arc;

pub struct Nothing {
    scorer: Arc<Scorer>,
}

impl Nothing {
    pub fn new(scorer: Arc<Scorer>) -> Self {
        Self { scorer }
    }
}

impl Cipher for Nothing {
    fn kind(&self) -> CipherKind {
        CipherKind::Nothing
    }

    fn encrypt(&self, text: &[u8], _key: &Key) -> Result<Vec<u8>> {
        Ok(text.to_vec())
    }

    fn decrypt(&self, text: &[u8], _key: &Key) -> Result<Vec<u8>> {
        Ok(text.to_vec())
    }

    fn crack(&self, text: &[u8]) -> CrackOutcome {
        CrackOutcome::new(Key::Identity, self.scorer.chi_squared(text))
    }

    fn usage(&self) -> &'static str {
        "Key is ignored. Checks whether the text is already plaintext"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let cipher = Nothing::new(Scorer::english().unwrap());
        assert_eq!(cipher.encrypt(b"abc", &Key::Identity).unwrap(), b"abc");
        assert_eq!(cipher.decrypt(b"abc", &Key::Affine { a: 1, b: 1 }).unwrap(), b"abc");
    }

    #[test]
    fn test_crack_scores_text_as_is() {
        let scorer = Scorer::english().unwrap();
        let cipher = Nothing::new(Arc::clone(&scorer));
        let text = b"it was the best of times";

        let outcome = cipher.crack(text);
        assert_eq!(outcome.key, Some(Key::Identity));
        assert_eq!(outcome.score, scorer.chi_squared(text));
        assert_eq!(cipher.name(outcome.key.as_ref()), "Nothing");
    }
}
