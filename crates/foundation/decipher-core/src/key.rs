//! Cipher Keys
//!
//! One tagged union for every cipher family so the dispatcher can carry keys
//! around without knowing which cipher produced them.

use crate::alphabet::{gcd, ALPHABET_SIZE};
use crate::{CipherKind, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "cipher", content = "value", rename_all = "lowercase")]
pub enum Key {
    /// `x -> (a*x + b) mod 26`, with `gcd(a, 26) = 1`
    Affine { a: u8, b: u8 },
    /// Repeating lowercase keystream
    Vigenere(String),
    /// Single byte XOR'd over the whole text
    Xor(u8),
    /// The identity cipher takes no key
    Identity,
}

impl Key {
    pub fn affine(a: u8, b: u8) -> Result<Self> {
        validate_affine(a, b)?;
        Ok(Key::Affine { a, b })
    }

    /// Non-empty alphabetic key, stored lowercase
    pub fn vigenere(key: &str) -> Result<Self> {
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(Error::InvalidKey("Key must be non-empty alphabetic".into()));
        }
        Ok(Key::Vigenere(key.to_ascii_lowercase()))
    }

    /// Parse a key written on the command line for the given cipher.
    ///
    /// - affine: `a,b` (e.g. `7,2`)
    /// - vigenere: letters (e.g. `lemon`)
    /// - xor: decimal or `0x` hex byte (e.g. `65`, `0x41`)
    /// - nothing: anything, ignored
    pub fn parse(kind: CipherKind, input: &str) -> Result<Self> {
        let input = input.trim();
        match kind {
            CipherKind::Nothing => Ok(Key::Identity),
            CipherKind::Affine => {
                let parts: Vec<&str> = input
                    .trim_matches(|c| c == '(' || c == ')')
                    .split(',')
                    .map(str::trim)
                    .collect();
                if parts.len() != 2 {
                    return Err(Error::InvalidKey("Affine key must be 'a,b' format".into()));
                }
                let a = parse_number(parts[0])?;
                let b = parse_number(parts[1])?;
                Key::affine(a, b)
            }
            CipherKind::Vigenere => Key::vigenere(input),
            CipherKind::Xor => Ok(Key::Xor(parse_number(input)?)),
        }
    }

    /// Which cipher family this key belongs to
    pub fn kind(&self) -> CipherKind {
        match self {
            Key::Affine { .. } => CipherKind::Affine,
            Key::Vigenere(_) => CipherKind::Vigenere,
            Key::Xor(_) => CipherKind::Xor,
            Key::Identity => CipherKind::Nothing,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Affine { a, b } => write!(f, "({}, {})", a, b),
            Key::Vigenere(k) => f.write_str(k),
            Key::Xor(k) => write!(f, "{}", k),
            Key::Identity => f.write_str("None"),
        }
    }
}

pub(crate) fn validate_affine(a: u8, b: u8) -> Result<()> {
    let m = ALPHABET_SIZE as u8;
    if a == 0 || a >= m || gcd(a as i64, m as i64) != 1 {
        return Err(Error::InvalidKey(format!(
            "'a' must be in 1..26 and coprime to 26, got {}",
            a
        )));
    }
    if b >= m {
        return Err(Error::InvalidKey(format!("'b' must be in 0..26, got {}", b)));
    }
    Ok(())
}

fn parse_number(s: &str) -> Result<u8> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|_| Error::InvalidKey(format!("'{}' is not a number in 0..=255", s)))
}
