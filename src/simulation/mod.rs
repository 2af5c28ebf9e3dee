//! Synthetic-user simulation
//!
//! Measures how quickly different pair-selection strategies recover a known
//! preference vector. Used to check that adaptive selection actually pays
//! off compared with asking random pairs.
//!
//! # Example
//!
//! ```rust
//! use taste_engine::random::SeededRng;
//! use taste_engine::simulation::{run, SimulationConfig, Strategy, SyntheticPanel};
//!
//! let panel = SyntheticPanel::generate(20, &mut SeededRng::new(7));
//! let report = run(Strategy::TraitDriven, &panel, &SimulationConfig::default()).unwrap();
//! assert!(report.rmse.is_finite());
//! ```

pub mod panel;
pub mod runner;

pub use panel::{rmse, SyntheticPanel};
pub use runner::{run, SimulationConfig, SimulationReport, Strategy};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::panel::SyntheticPanel;
    pub use super::runner::{SimulationConfig, SimulationReport, Strategy};
}
