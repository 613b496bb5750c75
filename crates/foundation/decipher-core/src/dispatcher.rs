//! Dispatcher
//!
//! Runs every registered cracker over the same ciphertext and keeps the
//! hypothesis whose decryption looks most like English. The registry is a
//! fixed list; the order matters because ties go to the earliest cipher.

use crate::cipher::Cipher;
use crate::ciphers::{Affine, Nothing, Vigenere, Xor};
use crate::config::CrackConfig;
use crate::key::Key;
use crate::scoring::Scorer;
use crate::{CipherKind, Result};
use serde::{Serialize, Serializer};
use std::sync::Arc;

/// One cipher's best guess
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub kind: CipherKind,
    /// Display name, refined by the recovered key (e.g. "Atbash")
    pub name: String,
    pub key: Option<Key>,
    /// Lower is better; infinite when no key survived
    pub chi_squared: f64,
    /// Trigram log-fitness of the decryption, higher is better
    pub fitness: Option<f64>,
}

impl Candidate {
    pub fn is_found(&self) -> bool {
        self.key.is_some()
    }
}

/// Every candidate plus the winning decryption
#[derive(Debug, Clone, Serialize)]
pub struct CrackReport {
    pub candidates: Vec<Candidate>,
    /// Index into `candidates`; `None` if no cipher produced a key
    pub winner: Option<usize>,
    #[serde(serialize_with = "serialize_lossy")]
    pub plaintext: Vec<u8>,
}

impl CrackReport {
    pub fn best(&self) -> Option<&Candidate> {
        self.winner.and_then(|i| self.candidates.get(i))
    }

    /// Candidate indices from lowest to highest chi-squared; stable on ties
    pub fn ranking(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.candidates.len()).collect();
        order.sort_by(|&a, &b| {
            self.candidates[a]
                .chi_squared
                .total_cmp(&self.candidates[b].chi_squared)
        });
        order
    }

    pub fn plaintext_lossy(&self) -> String {
        String::from_utf8_lossy(&self.plaintext).into_owned()
    }

    /// Candidates ranked by chi-squared (best first), followed by the verdict.
    ///
    /// Equal scores keep registry order; the winner is marked with `*`.
    pub fn render_table(&self) -> String {
        let mut lines = Vec::new();
        lines.push(format!(
            "{:<20}| {:<18}| {:<14}| {}",
            "Type of Cipher", "Key", "Chi-Squared", "Fitness"
        ));
        lines.push("-".repeat(66));

        for i in self.ranking() {
            let c = &self.candidates[i];
            let key = c.key.as_ref().map_or_else(|| "-".to_string(), Key::to_string);
            let chi2 = if c.chi_squared.is_finite() {
                format!("{:.4}", c.chi_squared)
            } else {
                "-".to_string()
            };
            let fitness = c.fitness.map_or_else(|| "-".to_string(), |f| format!("{:.4}", f));
            let marker = if Some(i) == self.winner { " *" } else { "" };
            lines.push(format!(
                "{:<20}| {:<18}| {:<14}| {}{}",
                c.name, key, chi2, fitness, marker
            ));
        }

        lines.push(String::new());
        match self.best() {
            Some(best) => lines.push(format!("Best cipher was: {}", best.name)),
            None => lines.push("No cipher produced a key".to_string()),
        }
        lines.join("\n")
    }
}

fn serialize_lossy<S>(bytes: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&String::from_utf8_lossy(bytes))
}

pub struct Dispatcher {
    ciphers: Vec<Box<dyn Cipher>>,
    scorer: Arc<Scorer>,
}

impl Dispatcher {
    /// Empty registry; add ciphers with [`Dispatcher::with_cipher`]
    pub fn new(scorer: Arc<Scorer>) -> Self {
        Self { ciphers: Vec::new(), scorer }
    }

    /// Nothing, Affine, Vigenère, XOR with default tunables
    pub fn with_default_ciphers(scorer: Arc<Scorer>) -> Self {
        Self::with_tunables(scorer, &CrackConfig::default())
    }

    /// Default registry over the embedded English tables
    pub fn english() -> Result<Self> {
        Ok(Self::with_default_ciphers(Scorer::english()?))
    }

    pub fn from_config(config: &CrackConfig) -> Result<Self> {
        Ok(Self::with_tunables(config.scorer()?, config))
    }

    /// The fixed registry, in tie-breaking order
    fn with_tunables(scorer: Arc<Scorer>, config: &CrackConfig) -> Self {
        Self::new(Arc::clone(&scorer))
            .with_cipher(Nothing::new(Arc::clone(&scorer)))
            .with_cipher(Affine::new(Arc::clone(&scorer)))
            .with_cipher(
                Vigenere::new(Arc::clone(&scorer))
                    .with_key_length_upper_bound(config.vigenere_key_length_bound),
            )
            .with_cipher(Xor::new(scorer).with_min_readable_ratio(config.xor_min_readable_ratio))
    }

    pub fn with_cipher(mut self, cipher: impl Cipher + 'static) -> Self {
        self.ciphers.push(Box::new(cipher));
        self
    }

    pub fn ciphers(&self) -> impl Iterator<Item = &dyn Cipher> {
        self.ciphers.iter().map(|c| c.as_ref())
    }

    pub fn cipher(&self, kind: CipherKind) -> Option<&dyn Cipher> {
        self.ciphers().find(|c| c.kind() == kind)
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    /// Crack `text` with every registered cipher and decrypt with the best.
    ///
    /// Strict `<` on chi-squared: a later cipher must do strictly better to
    /// take over. A candidate without a key never wins.
    pub fn find_best_cipher(&self, text: &[u8]) -> Result<CrackReport> {
        let mut candidates = Vec::with_capacity(self.ciphers.len());
        let mut winner: Option<usize> = None;
        let mut lowest = f64::INFINITY;

        for (i, cipher) in self.ciphers.iter().enumerate() {
            let outcome = cipher.crack(text);

            let fitness = match &outcome.key {
                Some(key) => match cipher.decrypt(text, key) {
                    Ok(candidate) => self.scorer.trigram_fitness(&candidate),
                    Err(e) => {
                        tracing::warn!(cipher = %cipher.kind(), "cracked key does not decrypt: {}", e);
                        None
                    }
                },
                None => None,
            };

            tracing::debug!(
                cipher = %cipher.kind(),
                key = ?outcome.key,
                chi_squared = outcome.score,
                fitness = ?fitness,
                "candidate"
            );

            if outcome.key.is_some() && outcome.score < lowest {
                lowest = outcome.score;
                winner = Some(i);
            }

            candidates.push(Candidate {
                kind: cipher.kind(),
                name: cipher.name(outcome.key.as_ref()),
                key: outcome.key,
                chi_squared: outcome.score,
                fitness,
            });
        }

        let plaintext = match winner.map(|i| (&self.ciphers[i], &candidates[i])) {
            Some((cipher, Candidate { key: Some(key), name, .. })) => {
                tracing::info!(cipher = %name, %key, chi_squared = lowest, "best cipher");
                cipher.decrypt(text, key)?
            }
            _ => {
                tracing::info!("no cipher produced a key");
                text.to_vec()
            }
        };

        Ok(CrackReport { candidates, winner, plaintext })
    }
}
