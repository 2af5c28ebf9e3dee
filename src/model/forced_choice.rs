//! Forced-choice posterior update
//!
//! A choice between a left and a right item is modelled as
//! `P(left) = sigmoid(w · delta)` with `delta = left - right`. After each
//! answer the profile takes one approximate Newton step:
//!
//! ```text
//! p      = sigmoid(mu · delta)
//! alpha  = p (1 - p)
//! s      = Sigma delta
//! Sigma' = Sigma - alpha / (1 + alpha delta·s) * s sᵀ
//! mu'    = mu + Sigma' delta (y - p)
//! ```
//!
//! The mean step deliberately uses the already-shrunk covariance.

use super::profile::TasteProfile;
use crate::axes::{AxisVector, FeatureVector, AXIS_COUNT};
use crate::error::{ensure_dimension, TasteResult};

/// Logistic function
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Quantities shared by the update and the information-gain score
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChoiceInformation {
    /// Predicted probability of choosing left
    pub p: f64,
    /// Bernoulli variance `p (1 - p)` of the choice
    pub alpha: f64,
    /// `deltaᵀ Sigma delta`, the prior variance of the utility difference
    pub quad: f64,
}

/// Evaluate the choice model for `delta` without touching the profile
pub fn choice_information(profile: &TasteProfile, delta: &AxisVector) -> ChoiceInformation {
    let p = sigmoid(profile.mu.dot(delta));
    let quad = delta.dot(&(profile.sigma * delta));
    ChoiceInformation {
        p,
        alpha: p * (1.0 - p),
        quad,
    }
}

impl TasteProfile {
    /// Apply one forced-choice answer
    ///
    /// `delta` is `left - right`; `chose_left` says which side the user picked.
    pub fn update(&mut self, delta: &AxisVector, chose_left: bool) {
        let y = if chose_left { 1.0 } else { 0.0 };
        let p = sigmoid(self.mu.dot(delta));
        let alpha = p * (1.0 - p);

        let sigma_delta = self.sigma * delta;
        let quad = delta.dot(&sigma_delta);
        let denominator = 1.0 + alpha * quad;
        debug_assert!(
            denominator >= 1.0 - 1e-9,
            "covariance lost positive semi-definiteness: 1 + alpha * quad = {}",
            denominator
        );
        let scale = alpha / denominator;

        self.sigma -= sigma_delta * sigma_delta.transpose() * scale;
        self.mu += self.sigma * delta * (y - p);

        for i in 0..AXIS_COUNT {
            self.axis_info[i] += alpha * delta[i] * delta[i];
        }
        self.comparisons_count += 1;
    }

    /// Apply an answer given both items' feature vectors
    pub fn update_with_vectors(&mut self, left: &FeatureVector, right: &FeatureVector, chose_left: bool) {
        self.update(&left.delta(right), chose_left);
    }

    /// Apply an answer given a raw delta, rejecting the wrong dimension
    pub fn update_from_slice(&mut self, delta: &[f64], chose_left: bool) -> TasteResult<()> {
        ensure_dimension(AXIS_COUNT, delta.len())?;
        self.update(&AxisVector::from_column_slice(delta), chose_left);
        Ok(())
    }

    /// How far the posterior has contracted from a `sigma_scale * I` prior, in `[0, 1]`
    pub fn confidence(&self, sigma_scale: f64) -> f64 {
        let baseline = sigma_scale * AXIS_COUNT as f64;
        if baseline == 0.0 {
            return 0.0;
        }
        (1.0 - self.trace() / baseline).clamp(0.0, 1.0)
    }
}
