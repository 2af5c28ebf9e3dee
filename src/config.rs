//! Engine-wide configuration
//!
//! Collects every tunable in one serialisable struct. Missing fields take
//! their defaults, so a JSON document only needs to name what it changes.

use serde::{Deserialize, Serialize};

use crate::error::{TasteError, TasteResult};
use crate::model::profile::DEFAULT_SIGMA_SCALE;
use crate::rating::elo::{DEFAULT_K_FACTOR, DEFAULT_RATING};
use crate::selection::cat::CatConfig;
use crate::selection::pair_selector::{PairSelector, PairSelectorConfig};

/// Configuration for a [`TasteSession`](crate::session::TasteSession)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Elo K-factor applied to every pick
    pub elo_k_factor: f64,
    /// Rating given to items that have none
    pub initial_rating: f64,
    /// Prior covariance scale of a fresh taste profile
    pub sigma_scale: f64,
    /// Comparison events kept in the session log
    pub max_history: usize,
    pub selector: PairSelectorConfig,
    pub cat: CatConfig,
}

/// Default cap on the session event log
pub const DEFAULT_MAX_HISTORY: usize = 1000;

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            elo_k_factor: DEFAULT_K_FACTOR,
            initial_rating: DEFAULT_RATING,
            sigma_scale: DEFAULT_SIGMA_SCALE,
            max_history: DEFAULT_MAX_HISTORY,
            selector: PairSelectorConfig::default(),
            cat: CatConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> TasteResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| TasteError::Configuration(format!("invalid engine config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> TasteResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TasteError::Configuration(format!("cannot serialize engine config: {}", e)))
    }

    pub fn validate(&self) -> TasteResult<()> {
        if !(self.elo_k_factor.is_finite() && self.elo_k_factor > 0.0) {
            return Err(TasteError::Configuration(format!(
                "elo_k_factor must be positive, got {}",
                self.elo_k_factor
            )));
        }
        if !self.initial_rating.is_finite() {
            return Err(TasteError::Configuration(
                "initial_rating must be finite".to_string(),
            ));
        }
        if !(self.sigma_scale.is_finite() && self.sigma_scale > 0.0) {
            return Err(TasteError::Configuration(format!(
                "sigma_scale must be positive, got {}",
                self.sigma_scale
            )));
        }
        if self.max_history == 0 {
            return Err(TasteError::Configuration(
                "max_history must be positive".to_string(),
            ));
        }
        self.selector.validate()?;
        self.cat.validate()
    }

    /// Selector configured from this engine configuration
    pub fn build_selector(&self) -> TasteResult<PairSelector> {
        PairSelector::builder()
            .config(self.selector.clone())
            .cat_config(self.cat.clone())
            .sigma_scale(self.sigma_scale)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.elo_k_factor, 32.0);
        assert_eq!(config.initial_rating, 1500.0);
        assert_eq!(config.sigma_scale, 1.0);
        assert_eq!(config.max_history, 1000);
        assert_eq!(config.selector.recency_buffer_size, 50);
        assert_eq!(config.cat.randomesque_top_k, 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json_str(
            r#"{"elo_k_factor": 24, "selector": {"recency_buffer_size": 8}}"#,
        )
        .unwrap();
        assert_eq!(config.elo_k_factor, 24.0);
        assert_eq!(config.selector.recency_buffer_size, 8);
        assert_eq!(config.selector.candidate_pool_size, 60);
        assert_eq!(config.cat, CatConfig::default());
    }

    #[test]
    fn test_invalid_json_is_configuration_error() {
        assert!(matches!(
            EngineConfig::from_json_str("{not json"),
            Err(TasteError::Configuration(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str(r#"{"sigma_scale": -1.0}"#),
            Err(TasteError::Configuration(_))
        ));
        assert!(EngineConfig::from_json_str(
            r#"{"selector": {"informative_probability": 0.9, "challenge_probability": 0.2}}"#
        )
        .is_err());
        assert!(EngineConfig::from_json_str(r#"{"max_history": 0}"#).is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = EngineConfig::default();
        let json = config.to_json_string().unwrap();
        assert_eq!(EngineConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_build_selector() {
        let mut config = EngineConfig::default();
        config.selector.recency_buffer_size = 7;
        let selector = config.build_selector().unwrap();
        assert_eq!(selector.recent().capacity(), 7);
    }
}
