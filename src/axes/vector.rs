//! Feature vectors on the taste axes

use nalgebra::{SMatrix, SVector};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Index;

use super::axis::{TasteAxis, AXIS_COUNT};
use crate::error::{ensure_dimension, TasteError, TasteResult};
use crate::rating::ItemId;

/// Column vector with one entry per taste axis
pub type AxisVector = SVector<f64, AXIS_COUNT>;

/// Square matrix indexed by taste axis on both sides
pub type AxisMatrix = SMatrix<f64, AXIS_COUNT, AXIS_COUNT>;

/// Position of an item on the taste axes
///
/// Values are expected to lie in `[-1, 1]`. Construction from a slice of the
/// wrong length fails instead of truncating or padding.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct FeatureVector(AxisVector);

impl FeatureVector {
    /// The all-zero vector, used for items without a known position
    pub fn zero() -> Self {
        Self(AxisVector::zeros())
    }

    pub fn new(values: [f64; AXIS_COUNT]) -> Self {
        Self(AxisVector::from(values))
    }

    /// Build from a slice, failing on dimension mismatch
    pub fn try_from_slice(values: &[f64]) -> TasteResult<Self> {
        ensure_dimension(AXIS_COUNT, values.len())?;
        Ok(Self(AxisVector::from_column_slice(values)))
    }

    pub fn as_vector(&self) -> &AxisVector {
        &self.0
    }

    pub fn values(&self) -> [f64; AXIS_COUNT] {
        let mut values = [0.0; AXIS_COUNT];
        values.copy_from_slice(self.0.as_slice());
        values
    }

    /// Euclidean norm
    pub fn norm(&self) -> f64 {
        self.0.norm()
    }

    /// Unit-length copy; the zero vector is returned unchanged
    pub fn normalized(&self) -> Self {
        let length = self.norm();
        if length > 0.0 {
            Self(self.0 / length)
        } else {
            *self
        }
    }

    /// `self - other`, the comparison direction when `self` is shown on the left
    pub fn delta(&self, other: &FeatureVector) -> AxisVector {
        self.0 - other.0
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<AxisVector> for FeatureVector {
    fn from(vector: AxisVector) -> Self {
        Self(vector)
    }
}

impl From<[f64; AXIS_COUNT]> for FeatureVector {
    fn from(values: [f64; AXIS_COUNT]) -> Self {
        Self::new(values)
    }
}

impl TryFrom<Vec<f64>> for FeatureVector {
    type Error = TasteError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::try_from_slice(&values)
    }
}

impl From<FeatureVector> for Vec<f64> {
    fn from(vector: FeatureVector) -> Self {
        vector.0.iter().copied().collect()
    }
}

impl Index<TasteAxis> for FeatureVector {
    type Output = f64;

    fn index(&self, axis: TasteAxis) -> &f64 {
        &self.0[axis.index()]
    }
}

/// Feature vectors keyed by item
///
/// Lookups for unknown items fall back to [`FeatureVector::zero`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureMap {
    vectors: HashMap<ItemId, FeatureVector>,
}

impl FeatureMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ItemId, vector: FeatureVector) -> Option<FeatureVector> {
        self.vectors.insert(id, vector)
    }

    /// Insert raw values, rejecting vectors of the wrong dimension
    pub fn insert_slice(&mut self, id: ItemId, values: &[f64]) -> TasteResult<()> {
        let vector = FeatureVector::try_from_slice(values)?;
        self.vectors.insert(id, vector);
        Ok(())
    }

    pub fn get(&self, id: ItemId) -> Option<&FeatureVector> {
        self.vectors.get(&id)
    }

    pub fn get_or_zero(&self, id: ItemId) -> FeatureVector {
        self.vectors.get(&id).copied().unwrap_or_default()
    }

    /// `vector(left) - vector(right)` with zero fallback for missing items
    pub fn delta(&self, left: ItemId, right: ItemId) -> AxisVector {
        self.get_or_zero(left).delta(&self.get_or_zero(right))
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.vectors.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &FeatureVector)> {
        self.vectors.iter()
    }
}

impl FromIterator<(ItemId, FeatureVector)> for FeatureMap {
    fn from_iter<I: IntoIterator<Item = (ItemId, FeatureVector)>>(iter: I) -> Self {
        Self {
            vectors: iter.into_iter().collect(),
        }
    }
}
