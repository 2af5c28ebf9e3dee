//! Deterministic randomness
//!
//! All selection randomness is drawn from a caller-owned generator so that a
//! run can be replayed exactly from its seed.

pub mod seeded;

pub use seeded::SeededRng;

/// Prelude for convenient imports
pub mod prelude {
    pub use super::seeded::SeededRng;
}
