//! Frequency Model
//!
//! Expected single-letter and trigram frequencies for English. Tables are
//! parsed once, validated, and shared read-only for the rest of the process.
//!
//! Letter file format (26 lines):
//! ```text
//! a 0.08167
//! b 0.01492
//! ```
//!
//! Trigram file format (raw counts, normalised on load):
//! ```text
//! the 3997
//! ion 2137
//! ```

use crate::alphabet::ALPHABET_SIZE;
use crate::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const ENGLISH_LETTERS: &str = include_str!("../data/english_letters.txt");
const ENGLISH_TRIGRAMS: &str = include_str!("../data/english_trigrams.txt");

/// Tolerated drift of the letter frequencies away from a total of 1.0
const SUM_TOLERANCE: f64 = 0.01;

/// Expected relative frequency of each letter a..z
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyTable {
    freqs: [f64; ALPHABET_SIZE],
}

impl FrequencyTable {
    /// Parse `<letter> <frequency>` lines.
    ///
    /// Every letter must appear with a frequency above zero, otherwise the
    /// chi-squared statistic would divide by zero.
    pub fn parse(data: &str) -> Result<Self> {
        let mut freqs = [0.0f64; ALPHABET_SIZE];
        let mut seen = [false; ALPHABET_SIZE];

        for (i, line) in data.lines().enumerate() {
            let line_no = i + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.split_whitespace();
            let (letter, value) = match (parts.next(), parts.next()) {
                (Some(l), Some(v)) => (l, v),
                _ => return Err(malformed(line_no, "expected '<letter> <frequency>'")),
            };

            let index = match letter.as_bytes() {
                [c] if c.is_ascii_alphabetic() => (c.to_ascii_lowercase() - b'a') as usize,
                _ => return Err(malformed(line_no, format!("'{}' is not a letter", letter))),
            };
            if seen[index] {
                return Err(malformed(line_no, format!("duplicate entry for '{}'", letter)));
            }

            let freq: f64 = value
                .parse()
                .map_err(|_| malformed(line_no, format!("'{}' is not a number", value)))?;
            if !freq.is_finite() || freq <= 0.0 {
                return Err(malformed(line_no, format!("frequency {} must be positive", freq)));
            }

            freqs[index] = freq;
            seen[index] = true;
        }

        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(Error::MissingLetter((b'a' + missing as u8) as char));
        }

        let sum: f64 = freqs.iter().sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            tracing::warn!(sum, "letter frequencies do not sum to 1.0");
        }

        Ok(Self { freqs })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading letter frequencies from {}", path.display());
        Self::parse(&read_resource(path)?)
    }

    /// Built-in English letter frequencies
    pub fn english() -> Result<Self> {
        Self::parse(ENGLISH_LETTERS)
    }

    /// Expected frequency of the letter at index 0..25
    pub fn expected(&self, index: usize) -> f64 {
        self.freqs[index]
    }

    pub fn get(&self, letter: char) -> Option<f64> {
        let c = letter.to_ascii_lowercase();
        c.is_ascii_lowercase().then(|| self.freqs[(c as u8 - b'a') as usize])
    }

    pub fn as_array(&self) -> &[f64; ALPHABET_SIZE] {
        &self.freqs
    }
}

/// Relative trigram frequencies plus the sample size they came from
#[derive(Debug, Clone)]
pub struct TrigramTable {
    freqs: HashMap<[u8; 3], f64>,
    total: u64,
}

impl TrigramTable {
    /// Parse `<trigram> <count>` lines and normalise the counts
    pub fn parse(data: &str) -> Result<Self> {
        let mut counts: HashMap<[u8; 3], u64> = HashMap::new();

        for (i, line) in data.lines().enumerate() {
            let line_no = i + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.split_whitespace();
            let (gram, value) = match (parts.next(), parts.next()) {
                (Some(g), Some(v)) => (g, v),
                _ => return Err(malformed(line_no, "expected '<trigram> <count>'")),
            };

            let key: [u8; 3] = match gram.as_bytes() {
                [a, b, c] if [a, b, c].iter().all(|x| x.is_ascii_alphabetic()) => [
                    a.to_ascii_lowercase(),
                    b.to_ascii_lowercase(),
                    c.to_ascii_lowercase(),
                ],
                _ => return Err(malformed(line_no, format!("'{}' is not a trigram", gram))),
            };

            let count: u64 = value
                .parse()
                .map_err(|_| malformed(line_no, format!("'{}' is not a count", value)))?;

            *counts.entry(key).or_insert(0) += count;
        }

        let total: u64 = counts.values().sum();
        if total == 0 {
            return Err(Error::EmptyTable);
        }

        let freqs = counts
            .into_iter()
            .map(|(k, n)| (k, n as f64 / total as f64))
            .collect();

        Ok(Self { freqs, total })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading trigram counts from {}", path.display());
        Self::parse(&read_resource(path)?)
    }

    /// Built-in English trigram counts
    pub fn english() -> Result<Self> {
        Self::parse(ENGLISH_TRIGRAMS)
    }

    pub fn frequency(&self, trigram: &[u8; 3]) -> Option<f64> {
        self.freqs.get(trigram).copied()
    }

    /// log10 probability of `trigram`, floored at `log10(0.01 / total)` when unseen
    pub fn log_probability(&self, trigram: &[u8; 3]) -> f64 {
        match self.freqs.get(trigram) {
            Some(&f) => f.log10(),
            None => self.floor(),
        }
    }

    pub fn floor(&self) -> f64 {
        (0.01 / self.total as f64).log10()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.freqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.freqs.is_empty()
    }
}

/// Provider of the reference tables the scorer is built from
pub trait FrequencySource {
    fn letters(&self) -> Result<FrequencyTable>;
    fn trigrams(&self) -> Result<TrigramTable>;
}

/// English tables compiled into the crate
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedEnglish;

impl FrequencySource for EmbeddedEnglish {
    fn letters(&self) -> Result<FrequencyTable> {
        FrequencyTable::english()
    }

    fn trigrams(&self) -> Result<TrigramTable> {
        TrigramTable::english()
    }
}

/// Tables read from disk; a missing path falls back to the embedded English data
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    pub letters: Option<PathBuf>,
    pub trigrams: Option<PathBuf>,
}

impl FileSource {
    pub fn new(letters: Option<PathBuf>, trigrams: Option<PathBuf>) -> Self {
        Self { letters, trigrams }
    }
}

impl FrequencySource for FileSource {
    fn letters(&self) -> Result<FrequencyTable> {
        match &self.letters {
            Some(path) => FrequencyTable::from_file(path),
            None => FrequencyTable::english(),
        }
    }

    fn trigrams(&self) -> Result<TrigramTable> {
        match &self.trigrams {
            Some(path) => TrigramTable::from_file(path),
            None => TrigramTable::english(),
        }
    }
}

fn read_resource(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::ResourceUnavailable(format!("{}: {}", path.display(), e)))
}

fn malformed(line: usize, reason: impl Into<String>) -> Error {
    Error::MalformedTable { line, reason: reason.into() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_english_tables_load() {
        let letters = FrequencyTable::english().unwrap();
        assert!((letters.get('e').unwrap() - 0.12702).abs() < 1e-9);
        assert!(letters.as_array().iter().all(|&f| f > 0.0));

        let trigrams = TrigramTable::english().unwrap();
        assert!(!trigrams.is_empty());
        assert!(trigrams.total() > 0);
        assert!(trigrams.frequency(b"the").unwrap() > trigrams.frequency(b"ing").unwrap());
    }

    #[test]
    fn test_missing_letter_rejected() {
        let data: String = ('a'..='y').map(|c| format!("{} 0.04\n", c)).collect();
        assert!(matches!(FrequencyTable::parse(&data), Err(Error::MissingLetter('z'))));
    }

    #[test]
    fn test_zero_frequency_rejected() {
        let mut data: String = ('a'..='y').map(|c| format!("{} 0.04\n", c)).collect();
        data.push_str("z 0\n");
        assert!(matches!(
            FrequencyTable::parse(&data),
            Err(Error::MalformedTable { line: 26, .. })
        ));
    }

    #[test]
    fn test_garbage_line_rejected() {
        assert!(matches!(
            FrequencyTable::parse("a 0.5\nbogus\n"),
            Err(Error::MalformedTable { line: 2, .. })
        ));
        assert!(matches!(
            TrigramTable::parse("the lots\n"),
            Err(Error::MalformedTable { line: 1, .. })
        ));
        assert!(matches!(TrigramTable::parse("# nothing\n"), Err(Error::EmptyTable)));
    }

    #[test]
    fn test_trigram_normalisation_and_floor() {
        let table = TrigramTable::parse("the 3\nand 1\n").unwrap();
        assert_eq!(table.total(), 4);
        assert!((table.frequency(b"the").unwrap() - 0.75).abs() < 1e-12);
        assert!((table.log_probability(b"and") - 0.25f64.log10()).abs() < 1e-12);
        assert!((table.log_probability(b"zzz") - (0.01f64 / 4.0).log10()).abs() < 1e-12);
    }

    #[test]
    fn test_missing_file_is_resource_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("letters.txt");
        assert!(matches!(
            FrequencyTable::from_file(&missing),
            Err(Error::ResourceUnavailable(_))
        ));
    }

    #[test]
    fn test_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trigrams.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "abc 10").unwrap();
        writeln!(file, "ABC 10").unwrap();

        let source = FileSource::new(None, Some(path));
        let trigrams = source.trigrams().unwrap();
        assert_eq!(trigrams.len(), 1);
        assert_eq!(trigrams.total(), 20);

        // letters fall back to the embedded table
        assert_eq!(source.letters().unwrap(), FrequencyTable::english().unwrap());
    }
}
