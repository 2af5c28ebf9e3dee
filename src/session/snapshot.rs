//! Serialisable session state
//!
//! A snapshot carries everything a [`TasteSession`](super::TasteSession)
//! needs to resume, including the generator state. Persisting it is the
//! caller's job.

use serde::{Deserialize, Serialize};

use super::outcome::ComparisonEvent;
use crate::axes::FeatureMap;
use crate::config::EngineConfig;
use crate::error::SnapshotError;
use crate::model::TasteProfile;
use crate::random::SeededRng;
use crate::rating::item::RatedItem;
use crate::selection::ItemPair;

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Schema version for forward compatibility
    pub version: u32,
    pub config: EngineConfig,
    pub items: Vec<RatedItem>,
    pub features: FeatureMap,
    /// Missing in snapshots that predate the profile; restored as the prior
    #[serde(default)]
    pub profile: Option<TasteProfile>,
    pub rng: SeededRng,
    /// Pair offered but not yet answered
    pub current: Option<ItemPair>,
    #[serde(default)]
    pub history: Vec<ComparisonEvent>,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SnapshotError::Serialization(format!("Failed to serialize session: {}", e)))
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json).map_err(|e| {
            SnapshotError::Deserialization(format!("Failed to deserialize session: {}", e))
        })?;

        if snapshot.version > SNAPSHOT_VERSION {
            return Err(SnapshotError::VersionTooNew(snapshot.version));
        }
        Ok(snapshot)
    }
}
