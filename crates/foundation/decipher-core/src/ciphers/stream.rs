//! Stream Ciphers
//!
//! A pseudo-random function walks a state and emits one key byte per step;
//! every text byte is XOR'd with the next key byte. Letters get no special
//! treatment and nothing is case-folded.

use crate::brute_force::BruteForce;

pub trait Stream: BruteForce {
    type State;

    /// Initial PRF state for a seed
    fn init_state(&self, seed: u8) -> Self::State;

    /// Next key byte and the state that follows it
    fn prf(&self, state: Self::State) -> (u8, Self::State);

    /// XOR `text` against the keystream starting at `state`
    fn apply_prf(&self, text: &[u8], state: Self::State) -> Vec<u8> {
        let mut out = Vec::with_capacity(text.len());
        let mut state = state;
        for &byte in text {
            let (key_byte, next) = self.prf(state);
            out.push(byte ^ key_byte);
            state = next;
        }
        out
    }
}
