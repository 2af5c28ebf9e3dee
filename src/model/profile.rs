//! Persisted posterior state

use serde::{Deserialize, Serialize};

use crate::axes::{AxisMatrix, AxisVector, AXIS_COUNT};
use crate::error::{ensure_dimension, TasteResult};

/// Prior covariance scale used when no other is configured
pub const DEFAULT_SIGMA_SCALE: f64 = 1.0;

/// Posterior over the user's axis weights
///
/// Owned by the caller and mutated only through
/// [`update`](TasteProfile::update). The caller keeps exactly one live copy
/// per user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TasteProfile {
    /// Posterior mean of the axis weights
    pub(crate) mu: AxisVector,
    /// Posterior covariance
    pub(crate) sigma: AxisMatrix,
    /// Cumulative per-axis Fisher information approximation
    pub(crate) axis_info: AxisVector,
    /// Number of recorded comparisons
    pub(crate) comparisons_count: u64,
}

impl Default for TasteProfile {
    fn default() -> Self {
        Self::new(DEFAULT_SIGMA_SCALE)
    }
}

impl TasteProfile {
    /// Fresh prior: zero mean, `scale * I` covariance
    pub fn new(sigma_scale: f64) -> Self {
        Self {
            mu: AxisVector::zeros(),
            sigma: AxisMatrix::identity() * sigma_scale,
            axis_info: AxisVector::zeros(),
            comparisons_count: 0,
        }
    }

    /// Rebuild a profile from persisted row-major parts
    ///
    /// Every vector must have one entry per axis and `sigma` must be
    /// `AXIS_COUNT x AXIS_COUNT`.
    pub fn from_parts(
        mu: &[f64],
        sigma: &[Vec<f64>],
        axis_info: &[f64],
        comparisons_count: u64,
    ) -> TasteResult<Self> {
        ensure_dimension(AXIS_COUNT, mu.len())?;
        ensure_dimension(AXIS_COUNT, axis_info.len())?;
        ensure_dimension(AXIS_COUNT, sigma.len())?;
        for row in sigma {
            ensure_dimension(AXIS_COUNT, row.len())?;
        }

        Ok(Self {
            mu: AxisVector::from_column_slice(mu),
            sigma: AxisMatrix::from_fn(|r, c| sigma[r][c]),
            axis_info: AxisVector::from_column_slice(axis_info),
            comparisons_count,
        })
    }

    pub fn mu(&self) -> &AxisVector {
        &self.mu
    }

    pub fn sigma(&self) -> &AxisMatrix {
        &self.sigma
    }

    pub fn axis_info(&self) -> &AxisVector {
        &self.axis_info
    }

    pub fn comparisons_count(&self) -> u64 {
        self.comparisons_count
    }

    /// Sum of posterior variances
    pub fn trace(&self) -> f64 {
        self.sigma.trace()
    }

    /// Covariance as row-major nested vectors, the inverse of [`from_parts`](Self::from_parts)
    pub fn sigma_rows(&self) -> Vec<Vec<f64>> {
        (0..AXIS_COUNT)
            .map(|r| (0..AXIS_COUNT).map(|c| self.sigma[(r, c)]).collect())
            .collect()
    }

    /// Largest absolute difference between mirrored covariance entries
    pub fn asymmetry(&self) -> f64 {
        let mut worst = 0.0_f64;
        for r in 0..AXIS_COUNT {
            for c in (r + 1)..AXIS_COUNT {
                worst = worst.max((self.sigma[(r, c)] - self.sigma[(c, r)]).abs());
            }
        }
        worst
    }

    /// Smallest eigenvalue of the symmetric part of the covariance
    pub fn min_eigenvalue(&self) -> f64 {
        let symmetric = (self.sigma + self.sigma.transpose()) * 0.5;
        symmetric.symmetric_eigenvalues().min()
    }

    /// Whether the covariance is still positive semi-definite within `tolerance`
    pub fn is_positive_semidefinite(&self, tolerance: f64) -> bool {
        self.min_eigenvalue() >= -tolerance
    }

    /// Replace the covariance with its symmetric part
    ///
    /// Never applied by [`update`](Self::update); callers that monitor drift
    /// may opt in.
    pub fn symmetrize(&mut self) {
        self.sigma = (self.sigma + self.sigma.transpose()) * 0.5;
    }
}
