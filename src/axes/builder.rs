//! Deriving feature vectors from item tags
//!
//! An [`AxesConfig`] maps genre names (and optionally keywords) to axis
//! weights. An item's vector is the mean of the weights of every tag and
//! keyword it carries, clamped to `[-1, 1]`.
//!
//! # Example
//!
//! ```rust
//! use taste_engine::axes::builder::{AxesConfig, TasteVectorBuilder};
//!
//! let config = AxesConfig::from_json_str(r#"{
//!     "version": 2,
//!     "genreWeights": {
//!         "drama":  [0.6, 0.2, 0.4, 0.7, 0.8, 0.1],
//!         "action": [-0.7, 0.0, -0.6, -0.4, -0.8, -0.2]
//!     }
//! }"#).unwrap();
//!
//! let builder = TasteVectorBuilder::new(&config).unwrap();
//! let vector = builder.vector(&["Drama", "Action"], &[] as &[&str]);
//! assert!((vector.values()[0] - (-0.05)).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::axis::AXIS_COUNT;
use super::vector::{AxisVector, FeatureMap, FeatureVector};
use crate::error::{TasteError, TasteResult};
use crate::rating::item::RatedItem;

/// Keyword contributions count for less than genre contributions
const KEYWORD_WEIGHT_SCALE: f64 = 0.6;

/// Weight tables mapping tags onto the taste axes
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxesConfig {
    /// Version of the weight tables, bumped whenever vectors must be recomputed
    pub version: u32,
    /// Optional axis names, one per axis
    #[serde(default)]
    pub axes: Option<Vec<String>>,
    /// Weights per genre name
    #[serde(default)]
    pub genre_weights: HashMap<String, Vec<f64>>,
    /// Weights per keyword
    #[serde(default)]
    pub keyword_weights: Option<HashMap<String, Vec<f64>>>,
}

impl AxesConfig {
    /// Parse and validate a JSON weight table
    pub fn from_json_str(json: &str) -> TasteResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| TasteError::Configuration(format!("invalid axes config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every weight row has one entry per axis
    pub fn validate(&self) -> TasteResult<()> {
        if let Some(axes) = &self.axes {
            if axes.len() != AXIS_COUNT {
                return Err(TasteError::DimensionMismatch {
                    expected: AXIS_COUNT,
                    actual: axes.len(),
                });
            }
        }
        let keyword_rows = self.keyword_weights.iter().flat_map(|table| table.values());
        for row in self.genre_weights.values().chain(keyword_rows) {
            FeatureVector::try_from_slice(row)?;
        }
        Ok(())
    }
}

/// Builds item feature vectors from an [`AxesConfig`]
#[derive(Clone, Debug)]
pub struct TasteVectorBuilder {
    version: u32,
    genre_weights: HashMap<String, FeatureVector>,
    keyword_weights: HashMap<String, FeatureVector>,
}

impl Default for TasteVectorBuilder {
    /// A builder with no weights; every item maps to the zero vector
    fn default() -> Self {
        Self {
            version: 1,
            genre_weights: HashMap::new(),
            keyword_weights: HashMap::new(),
        }
    }
}

impl TasteVectorBuilder {
    pub fn new(config: &AxesConfig) -> TasteResult<Self> {
        Ok(Self {
            version: config.version,
            genre_weights: convert_table(&config.genre_weights)?,
            keyword_weights: match &config.keyword_weights {
                Some(table) => convert_table(table)?,
                None => HashMap::new(),
            },
        })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Vector for an item carrying `tags` and `keywords`
    pub fn vector<S: AsRef<str>, K: AsRef<str>>(&self, tags: &[S], keywords: &[K]) -> FeatureVector {
        let mut sum = AxisVector::zeros();
        let mut contributions = 0usize;

        for tag in tags {
            if let Some(weights) = lookup(&self.genre_weights, tag.as_ref()) {
                sum += weights.as_vector();
                contributions += 1;
            }
        }
        for keyword in keywords {
            if let Some(weights) = lookup(&self.keyword_weights, keyword.as_ref()) {
                sum += weights.as_vector() * KEYWORD_WEIGHT_SCALE;
                contributions += 1;
            }
        }

        if contributions == 0 {
            return FeatureVector::zero();
        }

        let averaged = sum.map(|v| (v / contributions as f64).clamp(-1.0, 1.0));
        FeatureVector::from(averaged)
    }

    /// Feature map for a set of items, using their tags only
    pub fn feature_map<'a, I>(&self, items: I) -> FeatureMap
    where
        I: IntoIterator<Item = &'a RatedItem>,
    {
        items
            .into_iter()
            .map(|item| (item.id, self.vector(item.tags.as_slice(), &[] as &[&str])))
            .collect()
    }
}

fn convert_table(table: &HashMap<String, Vec<f64>>) -> TasteResult<HashMap<String, FeatureVector>> {
    let mut converted = HashMap::with_capacity(table.len());
    for (key, row) in table {
        converted.insert(key.clone(), FeatureVector::try_from_slice(row)?);
    }
    Ok(converted)
}

/// Normalised lookup first, then the raw key
fn lookup<'a>(table: &'a HashMap<String, FeatureVector>, key: &str) -> Option<&'a FeatureVector> {
    let normalized = key.trim().to_lowercase();
    table.get(&normalized).or_else(|| table.get(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::ItemId;
    use approx::assert_abs_diff_eq;

    fn config() -> AxesConfig {
        let mut genre_weights = HashMap::new();
        genre_weights.insert("drama".to_string(), vec![0.6, 0.2, 0.4, 0.7, 0.8, 0.1]);
        genre_weights.insert("horror".to_string(), vec![-0.4, 0.9, 0.0, -0.2, -0.3, 0.2]);
        genre_weights.insert("Sci-Fi".to_string(), vec![0.8, 0.1, 0.0, -0.9, -0.1, 0.9]);

        let mut keyword_weights = HashMap::new();
        keyword_weights.insert("heist".to_string(), vec![1.0, 0.0, -1.0, 0.0, 0.0, 0.5]);

        AxesConfig {
            version: 3,
            axes: None,
            genre_weights,
            keyword_weights: Some(keyword_weights),
        }
    }

    #[test]
    fn test_unknown_tags_give_zero_vector() {
        let builder = TasteVectorBuilder::new(&config()).unwrap();
        let v = builder.vector(&["Western"], &[] as &[&str]);
        assert_eq!(v, FeatureVector::zero());
    }

    #[test]
    fn test_tags_are_averaged() {
        let builder = TasteVectorBuilder::new(&config()).unwrap();
        let v = builder.vector(&[" Drama ", "HORROR"], &[] as &[&str]);
        assert_abs_diff_eq!(v.values()[0], 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(v.values()[1], 0.55, epsilon = 1e-12);
    }

    #[test]
    fn test_raw_key_fallback() {
        let builder = TasteVectorBuilder::new(&config()).unwrap();
        let v = builder.vector(&["Sci-Fi"], &[] as &[&str]);
        assert_abs_diff_eq!(v.values()[3], -0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_keywords_are_scaled() {
        let builder = TasteVectorBuilder::new(&config()).unwrap();
        let v = builder.vector(&[] as &[&str], &["heist"]);
        assert_abs_diff_eq!(v.values()[0], 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(v.values()[2], -0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_short_weight_rows() {
        let mut config = config();
        config
            .genre_weights
            .insert("comedy".to_string(), vec![0.1, 0.2]);

        assert!(config.validate().is_err());
        assert!(matches!(
            TasteVectorBuilder::new(&config),
            Err(TasteError::DimensionMismatch { actual: 2, .. })
        ));
    }

    #[test]
    fn test_from_json_str() {
        let config = AxesConfig::from_json_str(
            r#"{"version": 1, "genreWeights": {"drama": [0.6, 0.2, 0.4, 0.7, 0.8, 0.1]}}"#,
        )
        .unwrap();
        assert_eq!(config.version, 1);
        assert!(config.keyword_weights.is_none());

        let err = AxesConfig::from_json_str(r#"{"version": 1, "genreWeights": {"drama": [0.6]}}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_feature_map_for_items() {
        let builder = TasteVectorBuilder::new(&config()).unwrap();
        let items = vec![
            RatedItem::new(1).with_tags(["Drama"]),
            RatedItem::new(2).with_tags(["Musical"]),
        ];
        let map = builder.feature_map(&items);
        assert_eq!(map.len(), 2);
        assert_abs_diff_eq!(map.get_or_zero(ItemId(1)).values()[4], 0.8, epsilon = 1e-12);
        assert_eq!(map.get_or_zero(ItemId(2)), FeatureVector::zero());
    }
}
