//! Session management
//!
//! A [`TasteSession`] ties the pieces together for one user: it offers pairs,
//! applies answers to ratings and the taste profile, keeps an event log, and
//! can be snapshotted to JSON and resumed.

pub mod outcome;
pub mod snapshot;
pub mod taste_session;

pub use outcome::{ComparisonEvent, ComparisonOutcome};
pub use snapshot::{SessionSnapshot, SNAPSHOT_VERSION};
pub use taste_session::TasteSession;

/// Prelude for convenient imports
pub mod prelude {
    pub use super::outcome::{ComparisonEvent, ComparisonOutcome};
    pub use super::snapshot::{SessionSnapshot, SNAPSHOT_VERSION};
    pub use super::taste_session::TasteSession;
}
