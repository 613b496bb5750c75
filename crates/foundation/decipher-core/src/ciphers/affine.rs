//! Affine Cipher
//!
//! `E(x) = (a*x + b) mod 26`, `D(y) = a⁻¹ * (y - b) mod 26`.
//! Caesar (`a = 1`), ROT13 (`1, 13`) and Atbash (`25, 25`) are special cases.

use crate::alphabet::{letter_index, multiplicative_inverse, ALPHABET_SIZE};
use crate::brute_force::BruteForce;
use crate::cipher::{Cipher, CrackOutcome};
use crate::key::{validate_affine, Key};
use crate::scoring::Scorer;
use crate::{CipherKind, Error, Result};
use std::sync::Arc;

/// Values of `a` that have an inverse mod 26
pub const VALID_A: [u8; 12] = [1, 3, 5, 7, 9, 11, 15, 17, 19, 21, 23, 25];

pub struct Affine {
    scorer: Arc<Scorer>,
}

impl Affine {
    pub fn new(scorer: Arc<Scorer>) -> Self {
        Self { scorer }
    }

    fn key_parts(key: &Key) -> Result<(u8, u8)> {
        match key {
            Key::Affine { a, b } => {
                validate_affine(*a, *b)?;
                Ok((*a, *b))
            }
            other => Err(Error::InvalidKey(format!(
                "Affine cipher needs an (a, b) key, got {} key",
                other.kind()
            ))),
        }
    }

    fn map_letters(text: &[u8], f: impl Fn(i64) -> i64) -> Vec<u8> {
        text.iter()
            .map(|&c| match letter_index(c) {
                Some((base, x)) => base + f(x as i64).rem_euclid(ALPHABET_SIZE as i64) as u8,
                None => c,
            })
            .collect()
    }
}

impl Cipher for Affine {
    fn kind(&self) -> CipherKind {
        CipherKind::Affine
    }

    fn encrypt(&self, text: &[u8], key: &Key) -> Result<Vec<u8>> {
        let (a, b) = Self::key_parts(key)?;
        let (a, b) = (a as i64, b as i64);
        Ok(Self::map_letters(text, |x| a * x + b))
    }

    fn decrypt(&self, text: &[u8], key: &Key) -> Result<Vec<u8>> {
        let (a, b) = Self::key_parts(key)?;
        let a_inv = multiplicative_inverse(a as i64, ALPHABET_SIZE as i64)?;
        let b = b as i64;
        Ok(Self::map_letters(text, |y| a_inv * (y - b)))
    }

    fn crack(&self, text: &[u8]) -> CrackOutcome {
        self.brute_force(text, None)
    }

    fn name(&self, key: Option<&Key>) -> String {
        let name = match key {
            Some(Key::Affine { a: 25, b: 25 }) => "Atbash",
            Some(Key::Affine { a: 1, b: 13 }) => "Rot13/Caesar",
            Some(Key::Affine { a: 1, .. }) => "Caesar",
            _ => "Affine",
        };
        name.to_string()
    }

    fn usage(&self) -> &'static str {
        "Key is in the form a,b where 1 <= a < 26, 0 <= b < 26, and gcd(a, 26) = 1"
    }
}

impl BruteForce for Affine {
    /// All 12 * 26 = 312 valid keys
    fn candidate_keys(&self) -> Vec<Key> {
        VALID_A
            .iter()
            .flat_map(|&a| (0..ALPHABET_SIZE as u8).map(move |b| Key::Affine { a, b }))
            .collect()
    }

    fn lowercase_only(&self) -> bool {
        true
    }

    fn scorer(&self) -> &Scorer {
        &self.scorer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ciphers::fixtures::PROSE;

    fn affine() -> Affine {
        Affine::new(Scorer::english().unwrap())
    }

    fn key(a: u8, b: u8) -> Key {
        Key::affine(a, b).unwrap()
    }

    #[test]
    fn test_encrypt() {
        let cipher = affine();
        assert_eq!(cipher.encrypt(b"abc", &key(1, 1)).unwrap(), b"bcd");
        assert_eq!(cipher.encrypt(b"xyz", &key(1, 1)).unwrap(), b"yza");
        assert_eq!(cipher.encrypt(b"affine cipher", &key(5, 8)).unwrap(), b"ihhwvc swfrcp");
    }

    #[test]
    fn test_encrypt_preserves_case() {
        let cipher = affine();
        assert_eq!(cipher.encrypt(b"aBc", &key(1, 1)).unwrap(), b"bCd");
        assert_eq!(cipher.encrypt(b"Affine Cipher!", &key(5, 8)).unwrap(), b"Ihhwvc Swfrcp!");
    }

    #[test]
    fn test_decrypt() {
        let cipher = affine();
        assert_eq!(cipher.decrypt(b"bcd", &key(1, 1)).unwrap(), b"abc");
        assert_eq!(cipher.decrypt(b"ihhwvc swfrcp", &key(5, 8)).unwrap(), b"affine cipher");
    }

    #[test]
    fn test_roundtrip_all_keys() {
        let cipher = affine();
        let text = b"Random text, hi there! zzz 123";
        for k in cipher.candidate_keys() {
            let enc = cipher.encrypt(text, &k).unwrap();
            assert_eq!(cipher.decrypt(&enc, &k).unwrap(), text, "key {}", k);
            let dec = cipher.decrypt(text, &k).unwrap();
            assert_eq!(cipher.encrypt(&dec, &k).unwrap(), text, "key {}", k);
        }
    }

    #[test]
    fn test_invalid_key() {
        let cipher = affine();
        let bad = Key::Affine { a: 13, b: 1 };
        assert!(matches!(cipher.encrypt(b"abc", &bad), Err(Error::InvalidKey(_))));
        assert!(matches!(cipher.decrypt(b"abc", &bad), Err(Error::InvalidKey(_))));
        assert!(matches!(
            cipher.decrypt(b"abc", &Key::Xor(3)),
            Err(Error::InvalidKey(_))
        ));
    }

    #[test]
    fn test_names() {
        let cipher = affine();
        assert_eq!(cipher.name(Some(&key(25, 25))), "Atbash");
        assert_eq!(cipher.name(Some(&key(1, 13))), "Rot13/Caesar");
        assert_eq!(cipher.name(Some(&key(1, 3))), "Caesar");
        assert_eq!(cipher.name(Some(&key(7, 2))), "Affine");
        assert_eq!(cipher.name(None), "Affine");
    }

    #[test]
    fn test_key_space() {
        let keys = affine().candidate_keys();
        assert_eq!(keys.len(), 312);
        assert_eq!(keys[0], key(1, 0));
    }

    #[test]
    fn test_crack_recovers_key() {
        let cipher = affine();
        let ciphertext = cipher.encrypt(PROSE.as_bytes(), &key(7, 2)).unwrap();

        let outcome = cipher.crack(&ciphertext);
        let found = outcome.key.unwrap();
        assert_eq!(found, key(7, 2));
        assert_eq!(cipher.decrypt(&ciphertext, &found).unwrap(), PROSE.as_bytes());
    }

    #[test]
    fn test_crack_empty_text() {
        let outcome = affine().crack(b"");
        assert_eq!(outcome.key, Some(key(1, 0)));
        assert_eq!(outcome.score, 0.0);
    }
}
