//! # taste-engine
//!
//! Forced-choice taste elicitation for Rust.
//!
//! A user is shown two items at a time and must pick one. Every answer feeds an
//! online Bayesian linear model over a fixed set of semantic taste axes, and the
//! evolving posterior decides which pair is worth asking about next.
//!
//! ## Core Concepts
//!
//! - **Taste profile**: posterior mean and covariance over axis weights, updated
//!   with a Laplace-style logistic step after every choice
//! - **Pairwise rating**: an Elo-style scalar per item, used to find close matchups
//! - **Adaptive selection**: candidate pairs scored by expected information gain,
//!   axis/tag diversity, rating closeness and novelty, then drawn randomesque
//! - **Reproducibility**: every random draw goes through a caller-owned seeded RNG
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use taste_engine::prelude::*;
//!
//! let mut session = TasteSession::new(EngineConfig::default(), items, features, 42)?;
//!
//! while let Some(pair) = session.next_pair() {
//!     let outcome = ask_user(&pair);
//!     session.record(outcome)?;
//! }
//! ```

pub mod axes;
pub mod config;
pub mod error;
pub mod model;
pub mod random;
pub mod rating;
pub mod selection;
pub mod session;
pub mod simulation;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::axes::prelude::*;
    pub use crate::config::EngineConfig;
    pub use crate::error::*;
    pub use crate::model::prelude::*;
    pub use crate::random::prelude::*;
    pub use crate::rating::prelude::*;
    pub use crate::selection::prelude::*;
    pub use crate::session::prelude::*;
    pub use crate::simulation::prelude::*;
}
