//! Synthetic users with a known taste

use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::axes::{AxisVector, FeatureMap, FeatureVector, AXIS_COUNT};
use crate::model::forced_choice::sigmoid;
use crate::rating::item::RatedItem;
use crate::rating::ItemId;

/// A catalogue of items plus the ground-truth weights of a simulated user
#[derive(Clone, Debug)]
pub struct SyntheticPanel {
    pub items: Vec<RatedItem>,
    pub features: FeatureMap,
    /// Unit-length true preference weights
    pub truth: AxisVector,
}

impl SyntheticPanel {
    /// `item_count` items with uniform `[-1, 1]` vectors and a random unit truth
    ///
    /// Items are numbered from 1 and all carry the same tag, so tag variety
    /// plays no part in the comparison.
    pub fn generate<R: Rng>(item_count: usize, rng: &mut R) -> Self {
        let mut items = Vec::with_capacity(item_count);
        let mut features = FeatureMap::new();
        for index in 1..=item_count as u64 {
            let id = ItemId(index);
            items.push(RatedItem::new(id).with_tags(["drama"]));
            features.insert(id, FeatureVector::from(random_vector(rng)));
        }
        let truth = FeatureVector::from(random_vector(rng)).normalized();

        Self {
            items,
            features,
            truth: *truth.as_vector(),
        }
    }

    /// Probability that the simulated user picks the left side of `delta`
    pub fn choice_probability(&self, delta: &AxisVector) -> f64 {
        sigmoid(self.truth.dot(delta))
    }

    /// Draw the simulated user's answer
    pub fn choose<R: Rng>(&self, delta: &AxisVector, rng: &mut R) -> bool {
        rng.gen::<f64>() < self.choice_probability(delta)
    }
}

fn random_vector<R: Rng>(rng: &mut R) -> AxisVector {
    let uniform = Uniform::new_inclusive(-1.0, 1.0);
    AxisVector::from_fn(|_, _| uniform.sample(&mut *rng))
}

/// Root-mean-square difference between two weight vectors
pub fn rmse(estimate: &AxisVector, truth: &AxisVector) -> f64 {
    ((estimate - truth).norm_squared() / AXIS_COUNT as f64).sqrt()
}
