//! Online Bayesian preference model
//!
//! The user's taste is a weight vector over the taste axes. A
//! [`TasteProfile`] holds a Gaussian approximation of its posterior, and each
//! forced-choice answer applies one Laplace-style logistic update.
//!
//! The update is an approximation and is kept that way: it is neither
//! re-symmetrised nor projected back onto the positive semi-definite cone.
//! The diagnostics in [`profile`] exist to monitor long runs for drift.

pub mod forced_choice;
pub mod profile;

pub use profile::TasteProfile;

/// Prelude for convenient imports
pub mod prelude {
    pub use super::forced_choice::{choice_information, sigmoid, ChoiceInformation};
    pub use super::profile::{TasteProfile, DEFAULT_SIGMA_SCALE};
}
