//! Cipher Families
//!
//! - `affine` - Affine substitution (covers Caesar, ROT13, Atbash)
//! - `vigenere` - Repeating-key polyalphabetic shift
//! - `stream` - PRF-driven byte streams
//! - `xor` - Single-byte XOR, the degenerate stream
//! - `nothing` - Identity, the "already plaintext" baseline

pub mod affine;
pub mod nothing;
pub mod stream;
pub mod vigenere;
pub mod xor;

pub use affine::Affine;
pub use nothing::Nothing;
pub use stream::Stream;
pub use vigenere::Vigenere;
pub use xor::Xor;
