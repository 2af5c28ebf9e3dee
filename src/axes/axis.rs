//! The taste axes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of taste axes
pub const AXIS_COUNT: usize = 6;

/// A bipolar taste dimension
///
/// The positive pole corresponds to positive feature values and positive
/// preference weights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TasteAxis {
    CerebralVisceral,
    DarkComfort,
    AuteurMainstream,
    RealismEscapism,
    CharacterSpectacle,
    NoveltyFamiliarity,
}

impl TasteAxis {
    /// All axes in index order
    pub const ALL: [TasteAxis; AXIS_COUNT] = [
        Self::CerebralVisceral,
        Self::DarkComfort,
        Self::AuteurMainstream,
        Self::RealismEscapism,
        Self::CharacterSpectacle,
        Self::NoveltyFamiliarity,
    ];

    /// Position of this axis in every vector and matrix
    pub fn index(self) -> usize {
        self as usize
    }

    /// Axis at `index`, if any
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn positive_label(self) -> &'static str {
        match self {
            Self::CerebralVisceral => "Cerebral",
            Self::DarkComfort => "Dark",
            Self::AuteurMainstream => "Auteur",
            Self::RealismEscapism => "Realism",
            Self::CharacterSpectacle => "Character-driven",
            Self::NoveltyFamiliarity => "Novelty-seeking",
        }
    }

    pub fn negative_label(self) -> &'static str {
        match self {
            Self::CerebralVisceral => "Visceral",
            Self::DarkComfort => "Comfort",
            Self::AuteurMainstream => "Mainstream",
            Self::RealismEscapism => "Escapism",
            Self::CharacterSpectacle => "Spectacle-driven",
            Self::NoveltyFamiliarity => "Familiarity-seeking",
        }
    }

    /// Human-readable label naming both poles, e.g. `Dark ↔ Comfort`
    pub fn label(self) -> String {
        format!("{} \u{2194} {}", self.positive_label(), self.negative_label())
    }
}

impl fmt::Display for TasteAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
