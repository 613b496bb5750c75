//! Brute Force
//!
//! Exhaustive key search shared by every cipher with a small key space.
//! The decryption with the lowest chi-squared wins.

use crate::alphabet::fold_case;
use crate::cipher::{Cipher, CrackOutcome};
use crate::key::Key;
use crate::scoring::Scorer;

/// Share of `text` made of lowercase ASCII letters (0 for empty text)
pub fn readable_ratio(text: &[u8]) -> f64 {
    if text.is_empty() {
        return 0.0;
    }
    let readable = text.iter().filter(|c| c.is_ascii_lowercase()).count();
    readable as f64 / text.len() as f64
}

pub trait BruteForce: Cipher {
    /// Every key worth trying, in search order
    fn candidate_keys(&self) -> Vec<Key>;

    /// Whether the ciphertext is case-folded before the search.
    ///
    /// Letter ciphers say yes; stream ciphers work on raw bytes and say no.
    fn lowercase_only(&self) -> bool;

    fn scorer(&self) -> &Scorer;

    /// Try every candidate key and keep the best fit.
    ///
    /// With `min_readable_ratio` set, candidates whose share of lowercase
    /// letters falls below it are dropped before scoring. The first key to
    /// reach the minimum score wins ties.
    fn brute_force(&self, text: &[u8], min_readable_ratio: Option<f64>) -> CrackOutcome {
        let folded;
        let text = if self.lowercase_only() {
            folded = fold_case(text);
            &folded[..]
        } else {
            text
        };

        let mut best = CrackOutcome::none();
        let mut tried = 0usize;
        let mut rejected = 0usize;

        for key in self.candidate_keys() {
            tried += 1;
            let candidate = match self.decrypt(text, &key) {
                Ok(c) => c,
                Err(e) => {
                    tracing::warn!(%key, "skipping key: {}", e);
                    continue;
                }
            };

            if let Some(min) = min_readable_ratio {
                if readable_ratio(&candidate) < min {
                    rejected += 1;
                    continue;
                }
            }

            let score = self.scorer().chi_squared(&candidate);
            if score < best.score {
                best = CrackOutcome::new(key, score);
            }
        }

        tracing::debug!(
            cipher = %self.kind(),
            tried,
            rejected,
            score = best.score,
            "brute force finished"
        );
        best
    }
}
