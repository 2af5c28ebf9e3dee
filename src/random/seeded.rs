//! Seedable linear congruential generator
//!
//! `state = state * 6364136223846793005 + 1 (mod 2^64)`, emitting the new
//! state. The raw `u64` stream is reproducible bit-for-bit; range and float
//! draws go through `rand`'s sampling on top of it.
//!
//! The low bits of an LCG are weak, so 32-bit output takes the high half.

use rand::{Error, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

const MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const INCREMENT: u64 = 1;

/// Seed `0` is remapped to this value
const ZERO_SEED_REPLACEMENT: u64 = 0xdead_beef;

/// Seeded pseudo-random generator
///
/// Serializable, so a session can persist the generator and resume the exact
/// same draw sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 {
            ZERO_SEED_REPLACEMENT
        } else {
            seed
        };
        Self { state }
    }

    /// Current internal state
    pub fn state(&self) -> u64 {
        self.state
    }
}

impl RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        self.state
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SeededRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}
