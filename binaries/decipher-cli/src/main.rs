//! Decipher CLI
//!
//! Crack unknown ciphertext, or encrypt/decrypt with a known cipher and key.
//!
//! ```bash
//! decipher crack -c "ihhwvc swfrcp"           # Rank every cipher, print the best decryption
//! decipher crack -c 5e4243 --hex --json       # Hex input, JSON report
//! decipher encrypt --cipher affine --key 5,8 "affine cipher"
//! decipher decrypt --cipher xor --key 0x41 --hex 000302
//! decipher ciphers                            # Key formats
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use decipher_core::{CipherKind, CrackConfig, Dispatcher, Key};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "decipher")]
#[command(about = "Classical cipher cryptanalysis by letter-frequency statistics")]
#[command(version)]
struct Cli {
    /// Config file (default: <config dir>/decipher/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Try every cipher against the ciphertext and decrypt with the best fit
    Crack {
        /// Text to analyse
        #[arg(short, long)]
        ciphertext: String,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,

        /// Ciphertext is hex encoded
        #[arg(long)]
        hex: bool,
    },

    /// Encrypt text with a known cipher and key
    Encrypt {
        /// nothing, affine, vigenere, xor
        #[arg(short, long)]
        cipher: CipherKind,

        /// Key in the cipher's format (see `decipher ciphers`)
        #[arg(short, long, default_value = "")]
        key: String,

        text: String,

        /// Input is hex encoded and output is printed as hex
        #[arg(long)]
        hex: bool,
    },

    /// Decrypt text with a known cipher and key
    Decrypt {
        /// nothing, affine, vigenere, xor
        #[arg(short, long)]
        cipher: CipherKind,

        /// Key in the cipher's format (see `decipher ciphers`)
        #[arg(short, long, default_value = "")]
        key: String,

        text: String,

        /// Input is hex encoded and output is printed as hex
        #[arg(long)]
        hex: bool,
    },

    /// List the registered ciphers and their key formats
    Ciphers,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let config = load_config(cli.config.as_deref())?;
    let dispatcher = Dispatcher::from_config(&config).context("failed to build the cipher registry")?;

    match cli.command {
        Commands::Crack { ciphertext, json, hex } => cmd_crack(&dispatcher, &ciphertext, json, hex),
        Commands::Encrypt { cipher, key, text, hex } => {
            cmd_transform(&dispatcher, Direction::Encrypt, cipher, &key, &text, hex)
        }
        Commands::Decrypt { cipher, key, text, hex } => {
            cmd_transform(&dispatcher, Direction::Decrypt, cipher, &key, &text, hex)
        }
        Commands::Ciphers => {
            cmd_ciphers(&dispatcher);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool, json: bool) {
    let default = if verbose {
        "decipher=debug,decipher_core=debug"
    } else {
        "decipher=warn,decipher_core=warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<&Path>) -> Result<CrackConfig> {
    let config = match path {
        Some(path) => CrackConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => CrackConfig::load_default().context("failed to load default config")?,
    };
    tracing::debug!(?config, "configuration");
    Ok(config)
}

fn cmd_crack(dispatcher: &Dispatcher, ciphertext: &str, json: bool, hex: bool) -> Result<()> {
    let input = decode_input(ciphertext, hex)?;
    let report = dispatcher.find_best_cipher(&input)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", report.render_table());
    println!();
    println!("Decrypted text:");
    println!("{}", render_output(&report.plaintext, hex));
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Encrypt,
    Decrypt,
}

fn cmd_transform(
    dispatcher: &Dispatcher,
    direction: Direction,
    kind: CipherKind,
    key: &str,
    text: &str,
    hex: bool,
) -> Result<()> {
    let cipher = dispatcher
        .cipher(kind)
        .with_context(|| format!("{} is not registered", kind))?;
    let key = Key::parse(kind, key).with_context(|| format!("usage: {}", cipher.usage()))?;
    let input = decode_input(text, hex)?;

    let output = match direction {
        Direction::Encrypt => cipher.encrypt(&input, &key)?,
        Direction::Decrypt => cipher.decrypt(&input, &key)?,
    };

    println!("{}", render_output(&output, hex));
    Ok(())
}

fn cmd_ciphers(dispatcher: &Dispatcher) {
    println!("{:<16}{:<16}KEY", "CIPHER", "CATEGORY");
    for cipher in dispatcher.ciphers() {
        let kind = cipher.kind();
        println!("{:<16}{:<16}{}", kind.name(), kind.category(), cipher.usage());
    }
}

fn decode_input(text: &str, hex: bool) -> Result<Vec<u8>> {
    if hex {
        hex::decode(text.trim()).context("input is not valid hex")
    } else {
        Ok(text.as_bytes().to_vec())
    }
}

/// Text when printable as UTF-8 and hex was not requested, hex otherwise
fn render_output(bytes: &[u8], hex: bool) -> String {
    if hex {
        return hex::encode(bytes);
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => hex::encode(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_crack() {
        let cli = Cli::try_parse_from(["decipher", "crack", "-c", "ihhwvc", "--json"]).unwrap();
        match cli.command {
            Commands::Crack { ciphertext, json, hex } => {
                assert_eq!(ciphertext, "ihhwvc");
                assert!(json);
                assert!(!hex);
            }
            _ => panic!("expected crack"),
        }
    }

    #[test]
    fn test_parse_encrypt() {
        let cli = Cli::try_parse_from([
            "decipher", "-v", "encrypt", "--cipher", "affine", "--key", "5,8", "affine cipher",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Encrypt { cipher, key, text, .. } => {
                assert_eq!(cipher, CipherKind::Affine);
                assert_eq!(key, "5,8");
                assert_eq!(text, "affine cipher");
            }
            _ => panic!("expected encrypt"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_cipher() {
        assert!(Cli::try_parse_from(["decipher", "encrypt", "--cipher", "enigma", "abc"]).is_err());
        assert!(Cli::try_parse_from(["decipher", "crack"]).is_err());
    }

    #[test]
    fn test_decode_input() {
        assert_eq!(decode_input("000302", true).unwrap(), vec![0x00, 0x03, 0x02]);
        assert_eq!(decode_input("abc", false).unwrap(), b"abc");
        assert!(decode_input("zz", true).is_err());
    }

    #[test]
    fn test_render_output() {
        assert_eq!(render_output(b"abc", false), "abc");
        assert_eq!(render_output(b"abc", true), "616263");
        assert_eq!(render_output(&[0xff, 0x00], false), "ff00");
    }
}
