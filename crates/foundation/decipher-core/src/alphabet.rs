//! Alphabet Arithmetic
//!
//! The 26-letter alphabet mapped onto 0..25, plus the modular helpers the
//! letter ciphers share.

use crate::{Error, Result};

pub const ALPHABET_SIZE: usize = 26;

/// Split an ASCII letter into its case base (`b'a'` or `b'A'`) and index 0..25.
///
/// Anything that is not an ASCII letter returns `None` and is left alone by
/// the letter ciphers.
pub fn letter_index(byte: u8) -> Option<(u8, u8)> {
    if byte.is_ascii_lowercase() {
        Some((b'a', byte - b'a'))
    } else if byte.is_ascii_uppercase() {
        Some((b'A', byte - b'A'))
    } else {
        None
    }
}

pub fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 { a.abs() } else { gcd(b, a % b) }
}

/// Multiplicative inverse of `a` modulo `modulus` (extended Euclid)
pub fn multiplicative_inverse(a: i64, modulus: i64) -> Result<i64> {
    let mut mn = (modulus, a.rem_euclid(modulus));
    let mut xy = (0i64, 1i64);

    while mn.1 != 0 {
        xy = (xy.1, xy.0 - (mn.0 / mn.1) * xy.1);
        mn = (mn.1, mn.0 % mn.1);
    }

    if mn.0 == 1 {
        Ok(xy.0.rem_euclid(modulus))
    } else {
        Err(Error::InvalidKey(format!(
            "{} has no multiplicative inverse mod {}",
            a, modulus
        )))
    }
}

/// Caesar-rotate every letter by `shift`, keeping its case
pub fn rot(text: &[u8], shift: i64) -> Vec<u8> {
    text.iter()
        .map(|&c| match letter_index(c) {
            Some((base, x)) => {
                base + (x as i64 + shift).rem_euclid(ALPHABET_SIZE as i64) as u8
            }
            None => c,
        })
        .collect()
}

/// ASCII lowercase copy of `text`
pub fn fold_case(text: &[u8]) -> Vec<u8> {
    text.to_ascii_lowercase()
}

/// Lowercased letters of `text`, everything else dropped
pub fn letters_only(text: &[u8]) -> Vec<u8> {
    text.iter()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
