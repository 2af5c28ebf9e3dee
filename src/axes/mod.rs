//! Semantic taste axes and per-item feature vectors
//!
//! Taste is modelled on a fixed set of [`AXIS_COUNT`] bipolar axes. Every
//! vector and matrix in the crate is indexed by [`TasteAxis::index`], so the
//! declaration order of the axes is load-bearing.

pub mod axis;
pub mod builder;
pub mod vector;

pub use axis::{TasteAxis, AXIS_COUNT};
pub use vector::{AxisMatrix, AxisVector, FeatureMap, FeatureVector};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::axis::{TasteAxis, AXIS_COUNT};
    pub use super::builder::{AxesConfig, TasteVectorBuilder};
    pub use super::vector::{AxisMatrix, AxisVector, FeatureMap, FeatureVector};
}
