//! Single-byte XOR
//!
//! The degenerate stream: the PRF never changes state, so every byte is
//! XOR'd with the seed. Encryption and decryption are the same operation.

use super::stream::Stream;
use crate::brute_force::BruteForce;
use crate::cipher::{Cipher, CrackOutcome};
use crate::key::Key;
use crate::scoring::Scorer;
use crate::{CipherKind, Error, Result};
use std::sync::Arc;

/// Candidates with fewer lowercase letters than this are discarded unscored
pub const DEFAULT_MIN_READABLE_RATIO: f64 = 0.4;

pub struct Xor {
    scorer: Arc<Scorer>,
    min_readable_ratio: Option<f64>,
}

impl Xor {
    pub fn new(scorer: Arc<Scorer>) -> Self {
        Self {
            scorer,
            min_readable_ratio: Some(DEFAULT_MIN_READABLE_RATIO),
        }
    }

    /// `None` scores every key, however noisy its output
    pub fn with_min_readable_ratio(mut self, ratio: Option<f64>) -> Self {
        self.min_readable_ratio = ratio;
        self
    }

    fn seed(key: &Key) -> Result<u8> {
        match key {
            Key::Xor(k) => Ok(*k),
            other => Err(Error::InvalidKey(format!(
                "XOR cipher needs a byte key, got {} key",
                other.kind()
            ))),
        }
    }
}

impl Stream for Xor {
    type State = u8;

    fn init_state(&self, seed: u8) -> u8 {
        seed
    }

    fn prf(&self, state: u8) -> (u8, u8) {
        (state, state)
    }
}

impl Cipher for Xor {
    fn kind(&self) -> CipherKind {
        CipherKind::Xor
    }

    fn encrypt(&self, text: &[u8], key: &Key) -> Result<Vec<u8>> {
        let state = self.init_state(Self::seed(key)?);
        Ok(self.apply_prf(text, state))
    }

    fn decrypt(&self, text: &[u8], key: &Key) -> Result<Vec<u8>> {
        self.encrypt(text, key)
    }

    fn crack(&self, text: &[u8]) -> CrackOutcome {
        self.brute_force(text, self.min_readable_ratio)
    }

    fn usage(&self) -> &'static str {
        "Key should be a number 0-255 (decimal or 0x hex)"
    }
}

impl BruteForce for Xor {
    fn candidate_keys(&self) -> Vec<Key> {
        (0..=u8::MAX).map(Key::Xor).collect()
    }

    fn lowercase_only(&self) -> bool {
        false
    }

    fn scorer(&self) -> &Scorer {
        &self.scorer
    }
}
