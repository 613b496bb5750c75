//! Scoring Engine
//!
//! How English does a candidate plaintext look? Two statistics:
//! - chi-squared against expected letter frequencies (lower is better)
//! - trigram log-fitness (higher is better)
//!
//! Scoring always case-folds its input; the cipher transforms never do.

use crate::alphabet::{letters_only, ALPHABET_SIZE};
use crate::frequency::{EmbeddedEnglish, FrequencySource, FrequencyTable, TrigramTable};
use crate::{Error, Result};
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::Arc;

lazy_static! {
    static ref ENGLISH: std::result::Result<Arc<Scorer>, String> = Scorer::load(&EmbeddedEnglish)
        .map(Arc::new)
        .map_err(|e| e.to_string());
}

/// Relative frequency of each letter in `text`, plus the number of letters counted.
///
/// Letters are counted case-insensitively; with no letters at all every
/// frequency is 0.
pub fn letter_frequencies(text: &[u8]) -> ([f64; ALPHABET_SIZE], usize) {
    let mut counts = [0usize; ALPHABET_SIZE];
    let mut total = 0;

    for &c in text {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_lowercase() {
            counts[(c - b'a') as usize] += 1;
            total += 1;
        }
    }

    let mut freqs = [0.0f64; ALPHABET_SIZE];
    if total > 0 {
        for (f, &n) in freqs.iter_mut().zip(counts.iter()) {
            *f = n as f64 / total as f64;
        }
    }
    (freqs, total)
}

/// Index of coincidence between two aligned texts.
///
/// Counts the positions where both texts hold the same byte and normalises
/// `Σ n(n-1)` over those matches by `26 / (L(L-1))`, `L` being the length of
/// `a`. Texts shorter than two bytes score 0.
pub fn index_of_coincidence(a: &[u8], b: &[u8]) -> f64 {
    let len = a.len();
    if len < 2 {
        return 0.0;
    }

    let mut matches: HashMap<u8, usize> = HashMap::new();
    for (x, y) in a.iter().zip(b.iter()) {
        if x == y {
            *matches.entry(*x).or_insert(0) += 1;
        }
    }

    let sum: usize = matches.values().map(|&n| n * (n - 1)).sum();
    ALPHABET_SIZE as f64 * sum as f64 / (len * (len - 1)) as f64
}

/// Statistical scorer backed by immutable reference tables
#[derive(Debug, Clone)]
pub struct Scorer {
    letters: Arc<FrequencyTable>,
    trigrams: Arc<TrigramTable>,
}

impl Scorer {
    pub fn new(letters: FrequencyTable, trigrams: TrigramTable) -> Self {
        Self {
            letters: Arc::new(letters),
            trigrams: Arc::new(trigrams),
        }
    }

    /// Build a scorer from any frequency data provider
    pub fn load(source: &dyn FrequencySource) -> Result<Self> {
        Ok(Self::new(source.letters()?, source.trigrams()?))
    }

    /// Shared scorer over the embedded English tables, parsed on first use
    pub fn english() -> Result<Arc<Scorer>> {
        match &*ENGLISH {
            Ok(scorer) => Ok(Arc::clone(scorer)),
            Err(e) => Err(Error::ResourceUnavailable(e.clone())),
        }
    }

    pub fn letters(&self) -> &FrequencyTable {
        &self.letters
    }

    pub fn trigrams(&self) -> &TrigramTable {
        &self.trigrams
    }

    /// Chi-squared fit of `text` against the expected letter frequencies.
    ///
    /// `Σ (actual - expected)² / expected` over the 26 letters, scaled by the
    /// number of letters in the sample. 0 is a perfect fit; text without
    /// letters scores 0.
    pub fn chi_squared(&self, text: &[u8]) -> f64 {
        let (actual, total) = letter_frequencies(text);

        // Frequencies are relative, so the sample size is applied once at the end.
        let sum: f64 = actual
            .iter()
            .enumerate()
            .map(|(i, &observed)| {
                let expected = self.letters.expected(i);
                (observed - expected).powi(2) / expected
            })
            .sum();

        sum * total as f64
    }

    /// Mean trigram log10 probability per letter of `text`.
    ///
    /// Non-letters are stripped first. Returns `None` when fewer than three
    /// letters remain.
    pub fn trigram_fitness(&self, text: &[u8]) -> Option<f64> {
        let stripped = letters_only(text);
        if stripped.len() < 3 {
            return None;
        }

        let total: f64 = stripped
            .windows(3)
            .map(|w| self.trigrams.log_probability(&[w[0], w[1], w[2]]))
            .sum();

        Some(total / stripped.len() as f64)
    }
}
