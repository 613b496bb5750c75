//! Vigenère Cipher
//!
//! Repeating-key shift cipher. The keystream only advances on letters, so
//! punctuation and spaces reuse the key position for the next letter.
//!
//! Cracking is a two stage attack rather than a search over key strings:
//! 1. Key length: rotate the ciphertext against itself and keep the shift with
//!    the highest index of coincidence
//! 2. Columns: every `key_len`-th letter forms a Caesar text, solved by a
//!    26-way chi-squared search
//!
//! The assembled key is then reduced to its shortest repeating unit.

use crate::alphabet::{letter_index, letters_only, rot, ALPHABET_SIZE};
use crate::cipher::{Cipher, CrackOutcome};
use crate::key::Key;
use crate::scoring::{index_of_coincidence, Scorer};
use crate::{CipherKind, Error, Result};
use std::sync::Arc;

pub const DEFAULT_KEY_LENGTH_UPPER_BOUND: usize = 20;

pub struct Vigenere {
    scorer: Arc<Scorer>,
    key_length_upper_bound: usize,
}

impl Vigenere {
    pub fn new(scorer: Arc<Scorer>) -> Self {
        Self {
            scorer,
            key_length_upper_bound: DEFAULT_KEY_LENGTH_UPPER_BOUND,
        }
    }

    /// Key lengths tried during cracking are `1..bound`
    pub fn with_key_length_upper_bound(mut self, bound: usize) -> Self {
        self.key_length_upper_bound = bound;
        self
    }

    pub fn key_length_upper_bound(&self) -> usize {
        self.key_length_upper_bound
    }

    /// Most likely key length (or a multiple of it) for `text`.
    ///
    /// Tries every shift in `1..upper_bound`; the first shift reaching the
    /// highest index of coincidence wins. Returns 1 when nothing is tried.
    pub fn find_key_length(text: &[u8], upper_bound: usize) -> usize {
        let mut highest = -1.0;
        let mut best_shift = 1;

        for shift in 1..upper_bound {
            let shifted = Self::shift_string(text, shift);
            let ioc = index_of_coincidence(text, &shifted);
            if ioc > highest {
                highest = ioc;
                best_shift = shift;
            }
        }

        best_shift
    }

    /// Cyclic rotation: byte `i` moves to position `(i + shift) mod len`.
    ///
    /// Not a Caesar shift; the bytes themselves are unchanged.
    pub fn shift_string(text: &[u8], shift: usize) -> Vec<u8> {
        if text.is_empty() {
            return Vec::new();
        }
        let split = text.len() - shift % text.len();
        let mut out = Vec::with_capacity(text.len());
        out.extend_from_slice(&text[split..]);
        out.extend_from_slice(&text[..split]);
        out
    }

    /// Shortest unit whose repetition rebuilds `key` ("lemonlemon" -> "lemon")
    pub fn refine_key(key: &str) -> String {
        let bytes = key.as_bytes();
        let len = bytes.len();
        for unit in 1..len {
            if len % unit != 0 || !bytes.chunks(unit).all(|chunk| chunk == &bytes[..unit]) {
                continue;
            }
            if let Some(prefix) = key.get(..unit) {
                return prefix.to_string();
            }
        }
        key.to_string()
    }

    /// Encryption key letter for one Caesar column of lowercase letters
    fn solve_column(&self, column: &[u8]) -> u8 {
        let mut lowest_shift = 0;
        let mut lowest_chi2 = f64::INFINITY;

        for shift in 0..ALPHABET_SIZE as i64 {
            let chi2 = self.scorer.chi_squared(&rot(column, shift));
            if chi2 < lowest_chi2 {
                lowest_shift = shift;
                lowest_chi2 = chi2;
            }
        }

        // The winning shift decrypts; the key letter is its inverse.
        b'a' + ((ALPHABET_SIZE as i64 - lowest_shift) % ALPHABET_SIZE as i64) as u8
    }

    fn key_shifts(key: &Key) -> Result<Vec<i64>> {
        match key {
            Key::Vigenere(k) if !k.is_empty() && k.bytes().all(|c| c.is_ascii_alphabetic()) => {
                Ok(k.bytes().map(|c| (c.to_ascii_lowercase() - b'a') as i64).collect())
            }
            Key::Vigenere(_) => Err(Error::InvalidKey("Key must be non-empty alphabetic".into())),
            other => Err(Error::InvalidKey(format!(
                "Vigenère cipher needs a letter key, got {} key",
                other.kind()
            ))),
        }
    }

    fn apply(text: &[u8], shifts: &[i64], direction: i64) -> Vec<u8> {
        let mut index = 0;
        text.iter()
            .map(|&c| match letter_index(c) {
                Some((base, x)) => {
                    let shift = shifts[index % shifts.len()] * direction;
                    index += 1;
                    base + (x as i64 + shift).rem_euclid(ALPHABET_SIZE as i64) as u8
                }
                None => c,
            })
            .collect()
    }
}

impl Cipher for Vigenere {
    fn kind(&self) -> CipherKind {
        CipherKind::Vigenere
    }

    fn encrypt(&self, text: &[u8], key: &Key) -> Result<Vec<u8>> {
        let shifts = Self::key_shifts(key)?;
        Ok(Self::apply(text, &shifts, 1))
    }

    fn decrypt(&self, text: &[u8], key: &Key) -> Result<Vec<u8>> {
        let shifts = Self::key_shifts(key)?;
        Ok(Self::apply(text, &shifts, -1))
    }

    fn crack(&self, text: &[u8]) -> CrackOutcome {
        // Columns must line up with the keystream, which skips non-letters.
        let letters = letters_only(text);
        let key_len = Self::find_key_length(&letters, self.key_length_upper_bound);

        let raw_key: String = (0..key_len)
            .map(|i| {
                let column: Vec<u8> = letters.iter().skip(i).step_by(key_len).copied().collect();
                self.solve_column(&column) as char
            })
            .collect();
        let key = Key::Vigenere(Self::refine_key(&raw_key));

        tracing::debug!(key_len, raw_key = %raw_key, refined = %key, "vigenere key recovered");

        match self.decrypt(text, &key) {
            Ok(plaintext) => CrackOutcome::new(key, self.scorer.chi_squared(&plaintext)),
            Err(e) => {
                tracing::warn!("recovered key {} was rejected: {}", key, e);
                CrackOutcome::none()
            }
        }
    }

    fn name(&self, key: Option<&Key>) -> String {
        match key {
            Some(Key::Vigenere(k)) if k.len() == 1 => "Caesar (Vigenère)".to_string(),
            _ => "Vigenère".to_string(),
        }
    }

    fn usage(&self) -> &'static str {
        "Key must be a string of letters, e.g. lemon"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ciphers::fixtures::{CORPUS_CIPHERTEXT, CORPUS_PLAINTEXT};

    fn vigenere() -> Vigenere {
        Vigenere::new(Scorer::english().unwrap())
    }

    fn key(k: &str) -> Key {
        Key::vigenere(k).unwrap()
    }

    #[test]
    fn test_encrypt() {
        let cipher = vigenere();
        assert_eq!(cipher.encrypt(b"abcde", &key("b")).unwrap(), b"bcdef");
        assert_eq!(cipher.encrypt(b"abcde", &key("a")).unwrap(), b"abcde");
        assert_eq!(cipher.encrypt(b"wxyza", &key("b")).unwrap(), b"xyzab");
        assert_eq!(cipher.encrypt(b"a c", &key("b")).unwrap(), b"b d");
        assert_eq!(
            cipher
                .encrypt(b"to be or not to be that is the question", &key("relations"))
                .unwrap(),
            b"ks me hz bbl ks me mpog aj xse jcsflzsy"
        );
    }

    #[test]
    fn test_decrypt() {
        let cipher = vigenere();
        assert_eq!(cipher.decrypt(b"bcdef", &key("b")).unwrap(), b"abcde");
        assert_eq!(cipher.decrypt(b"xyzab", &key("b")).unwrap(), b"wxyza");
        assert_eq!(cipher.decrypt(b"b d", &key("b")).unwrap(), b"a c");
        assert_eq!(
            cipher
                .decrypt(b"ks me hz bbl ks me mpog aj xse jcsflzsy", &key("relations"))
                .unwrap(),
            b"to be or not to be that is the question"
        );
    }

    #[test]
    fn test_keystream_skips_non_letters() {
        let cipher = vigenere();
        assert_eq!(cipher.encrypt(b"Hello, World", &key("key")).unwrap(), b"Rijvs, Uyvjn");
        assert_eq!(cipher.decrypt(b"Rijvs, Uyvjn", &key("KEY")).unwrap(), b"Hello, World");
    }

    #[test]
    fn test_roundtrip() {
        let cipher = vigenere();
        let text = b"hello there! 42 Times";
        let k = key("key");
        let enc = cipher.encrypt(text, &k).unwrap();
        assert_eq!(cipher.decrypt(&enc, &k).unwrap(), text);
        let dec = cipher.decrypt(text, &k).unwrap();
        assert_eq!(cipher.encrypt(&dec, &k).unwrap(), text);
    }

    #[test]
    fn test_invalid_key() {
        let cipher = vigenere();
        assert!(matches!(
            cipher.encrypt(b"abc", &Key::Vigenere(String::new())),
            Err(Error::InvalidKey(_))
        ));
        assert!(matches!(
            cipher.encrypt(b"abc", &Key::Vigenere("le mon".into())),
            Err(Error::InvalidKey(_))
        ));
        assert!(matches!(cipher.decrypt(b"abc", &Key::Xor(1)), Err(Error::InvalidKey(_))));
    }

    #[test]
    fn test_shift_string() {
        assert_eq!(Vigenere::shift_string(b"abcdefgh", 2), b"ghabcdef");
        assert_eq!(Vigenere::shift_string(b"abcdefgh", 0), b"abcdefgh");
        assert_eq!(Vigenere::shift_string(b"abcdefgh", 10), b"ghabcdef");
        assert!(Vigenere::shift_string(b"", 3).is_empty());
    }

    #[test]
    fn test_refine_key() {
        assert_eq!(Vigenere::refine_key("lemonlemonlemon"), "lemon");
        assert_eq!(Vigenere::refine_key("lemon"), "lemon");
        assert_eq!(Vigenere::refine_key("lemonlemonorange"), "lemonlemonorange");
        assert_eq!(Vigenere::refine_key("aaaaaaaaaaa"), "a");
        assert_eq!(Vigenere::refine_key(""), "");
    }

    #[test]
    fn test_refine_key_multibyte() {
        assert_eq!(Vigenere::refine_key("éé"), "é");
        assert_eq!(Vigenere::refine_key("éa"), "éa");
        assert_eq!(Vigenere::refine_key("aéaé"), "aé");
    }

    #[test]
    fn test_find_key_length() {
        // True period is 7; the coincidence peak lands on a multiple of it.
        let len = Vigenere::find_key_length(
            CORPUS_CIPHERTEXT.as_bytes(),
            DEFAULT_KEY_LENGTH_UPPER_BOUND,
        );
        assert_eq!(len, 14);
        assert_eq!(len % 7, 0);
    }

    #[test]
    fn test_find_key_length_degenerate() {
        assert_eq!(Vigenere::find_key_length(b"", 20), 1);
        assert_eq!(Vigenere::find_key_length(b"abc", 1), 1);
    }

    #[test]
    fn test_crack() {
        let cipher = vigenere();
        let outcome = cipher.crack(CORPUS_CIPHERTEXT.as_bytes());

        let found = outcome.key.unwrap();
        assert_eq!(found, key("surveil"));
        assert_eq!(
            cipher.decrypt(CORPUS_CIPHERTEXT.as_bytes(), &found).unwrap(),
            CORPUS_PLAINTEXT.as_bytes()
        );
    }

    #[test]
    fn test_crack_ignores_case_and_spacing() {
        let cipher = vigenere();
        let spaced: Vec<u8> = CORPUS_CIPHERTEXT
            .to_ascii_uppercase()
            .as_bytes()
            .chunks(5)
            .flat_map(|chunk| chunk.iter().copied().chain(std::iter::once(b' ')))
            .collect();

        let outcome = cipher.crack(&spaced);
        assert_eq!(outcome.key, Some(key("surveil")));
    }

    #[test]
    fn test_crack_empty_text() {
        let outcome = vigenere().crack(b"");
        assert_eq!(outcome.key, Some(key("a")));
        assert_eq!(outcome.score, 0.0);
    }

    #[test]
    fn test_names() {
        let cipher = vigenere();
        assert_eq!(cipher.name(Some(&key("k"))), "Caesar (Vigenère)");
        assert_eq!(cipher.name(Some(&key("lemon"))), "Vigenère");
        assert_eq!(cipher.name(None), "Vigenère");
    }

    #[test]
    fn test_upper_bound_is_configurable() {
        let cipher = vigenere().with_key_length_upper_bound(8);
        assert_eq!(cipher.key_length_upper_bound(), 8);
    }
}
