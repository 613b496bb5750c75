//! Crack configuration
//!
//! Tunables for the key searches and optional replacement frequency tables,
//! read from a JSON file (by default `<config dir>/decipher/config.json`).

use crate::ciphers::vigenere::DEFAULT_KEY_LENGTH_UPPER_BOUND;
use crate::ciphers::xor::DEFAULT_MIN_READABLE_RATIO;
use crate::frequency::FileSource;
use crate::scoring::Scorer;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrackConfig {
    /// Vigenère key lengths tried are `1..bound`
    pub vigenere_key_length_bound: usize,
    /// XOR candidates below this share of lowercase letters are dropped
    pub xor_min_readable_ratio: Option<f64>,
    /// `<letter> <frequency>` file replacing the built-in English table
    pub letter_table: Option<PathBuf>,
    /// `<trigram> <count>` file replacing the built-in English table
    pub trigram_table: Option<PathBuf>,
}

impl Default for CrackConfig {
    fn default() -> Self {
        Self {
            vigenere_key_length_bound: DEFAULT_KEY_LENGTH_UPPER_BOUND,
            xor_min_readable_ratio: Some(DEFAULT_MIN_READABLE_RATIO),
            letter_table: None,
            trigram_table: None,
        }
    }
}

impl CrackConfig {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("decipher")
            .join("config.json")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        let config: CrackConfig = serde_json::from_str(&data)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Config at the default path, or the defaults when that file is absent
    pub fn load_default() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.vigenere_key_length_bound < 2 {
            return Err(Error::Config(format!(
                "vigenere_key_length_bound must be at least 2, got {}",
                self.vigenere_key_length_bound
            )));
        }
        if let Some(ratio) = self.xor_min_readable_ratio {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(Error::Config(format!(
                    "xor_min_readable_ratio must be within 0..=1, got {}",
                    ratio
                )));
            }
        }
        Ok(())
    }

    /// Scorer over the configured tables; the shared English scorer when
    /// neither table is overridden.
    pub fn scorer(&self) -> Result<Arc<Scorer>> {
        if self.letter_table.is_none() && self.trigram_table.is_none() {
            return Scorer::english();
        }
        let source = FileSource::new(self.letter_table.clone(), self.trigram_table.clone());
        Ok(Arc::new(Scorer::load(&source)?))
    }
}
