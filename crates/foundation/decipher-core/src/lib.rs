//! Decipher Core: classical ciphers and their cryptanalysis
//!
//! Affine, Vigenère, XOR-stream and the identity "Nothing" cipher behind one
//! [`Cipher`] contract, plus the statistics used to break them.
//!
//! ```text
//! ciphertext ──► crack() per cipher ──► (key, chi²) ──► Dispatcher ──► plaintext
//!                      │
//!                      └── Scorer (letter + trigram tables, loaded once)
//! ```
//!
//! # Modules
//! - `alphabet` - 26-letter arithmetic, modular inverse, rotation
//! - `frequency` - Expected letter and trigram tables
//! - `scoring` - Chi-squared, trigram fitness, index of coincidence
//! - `key` - Keys for every cipher family
//! - `cipher` - The shared cipher contract
//! - `brute_force` - Exhaustive key search over a cipher's key space
//! - `ciphers` - Affine, Vigenère, Stream/XOR, Nothing
//! - `dispatcher` - Runs every cracker and picks the best fit
//! - `config` - Tunables for the key searches

pub mod alphabet;
pub mod brute_force;
pub mod cipher;
pub mod ciphers;
pub mod config;
pub mod dispatcher;
pub mod frequency;
pub mod key;
pub mod scoring;

pub use brute_force::BruteForce;
pub use cipher::{Cipher, CrackOutcome};
pub use ciphers::{Affine, Nothing, Stream, Vigenere, Xor};
pub use config::CrackConfig;
pub use dispatcher::{Candidate, CrackReport, Dispatcher};
pub use frequency::{EmbeddedEnglish, FileSource, FrequencySource, FrequencyTable, TrigramTable};
pub use key::Key;
pub use scoring::Scorer;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Frequency data unavailable: {0}")]
    ResourceUnavailable(String),

    #[error("Malformed frequency table at line {line}: {reason}")]
    MalformedTable { line: usize, reason: String },

    #[error("Frequency table has no positive entry for '{0}'")]
    MissingLetter(char),

    #[error("Trigram table has no samples")]
    EmptyTable,

    #[error("Unknown cipher: {0}")]
    UnknownCipher(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Cipher families known to the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CipherKind {
    Nothing,
    Affine,
    Vigenere,
    Xor,
}

impl CipherKind {
    pub const ALL: [CipherKind; 4] = [
        CipherKind::Nothing,
        CipherKind::Affine,
        CipherKind::Vigenere,
        CipherKind::Xor,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CipherKind::Nothing => "Nothing",
            CipherKind::Affine => "Affine",
            CipherKind::Vigenere => "Vigenère",
            CipherKind::Xor => "XOR (Stream)",
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            CipherKind::Nothing => "Plaintext",
            CipherKind::Affine => "Substitution",
            CipherKind::Vigenere => "Polyalphabetic",
            CipherKind::Xor => "Stream",
        }
    }
}

impl fmt::Display for CipherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CipherKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "nothing" | "none" | "identity" => Ok(CipherKind::Nothing),
            "affine" => Ok(CipherKind::Affine),
            "vigenere" | "vigenère" => Ok(CipherKind::Vigenere),
            "xor" => Ok(CipherKind::Xor),
            _ => Err(Error::UnknownCipher(s.to_string())),
        }
    }
}
