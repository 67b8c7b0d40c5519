//! Random draws used by squad generation.

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::models::player::Attributes;
use crate::models::trait_system::TraitBucket;

/// Normal draw with the given mean and standard deviation.
pub fn gauss<R: Rng + ?Sized>(rng: &mut R, mean: f64, sd: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    mean + sd * z
}

/// Weight of a position after it has been drawn once more.
pub fn decay_position_weight(weight: f64, divisor: f64) -> f64 {
    weight / divisor
}

/// Per-club position table: uniform at first, each pick divides the chosen
/// position's weight.
#[derive(Debug, Clone)]
pub struct PositionPicker {
    weights: Vec<f64>,
    divisor: f64,
}

impl PositionPicker {
    pub fn new(position_count: usize, divisor: f64) -> Self {
        Self { weights: vec![1.0; position_count], divisor }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Index of the drawn position, `None` when there are no positions.
    pub fn pick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        let dist = WeightedIndex::new(&self.weights).ok()?;
        let index = dist.sample(rng);
        self.weights[index] = decay_position_weight(self.weights[index], self.divisor);
        Some(index)
    }
}

/// Bucket probabilities for a player's attributes.
///
/// The four attribute buckets get `strength^power`, normalised, sharing
/// `1 - set_piece` of the mass; the set-piece bucket gets `set_piece`.
/// Shooting and defending are doubled so every strength sums two values.
pub fn bucket_weights(attributes: &Attributes, power: i32, set_piece: f64) -> [f64; 5] {
    let strengths = [
        attributes.pace + attributes.physicality,
        2.0 * attributes.shooting,
        attributes.passing + attributes.dribbling,
        2.0 * attributes.defending,
    ];
    let max = strengths.iter().copied().fold(0.0, f64::max);
    let set_piece = set_piece.clamp(0.0, 1.0);

    let raised: Vec<f64> = if max > 0.0 {
        strengths.iter().map(|s| (s / max).max(0.0).powi(power)).collect()
    } else {
        vec![1.0; 4]
    };
    let total: f64 = raised.iter().sum();

    let mut weights = [0.0; 5];
    for (slot, value) in weights.iter_mut().zip(&raised) {
        *slot = value / total * (1.0 - set_piece);
    }
    weights[TraitBucket::SetPiece as usize] = set_piece;
    weights
}

/// Draws distinct trait indices (0-based, into the ordered trait list).
pub struct TraitSampler {
    trait_count: usize,
    bucket_width: usize,
}

impl TraitSampler {
    pub fn new(trait_count: usize, bucket_width: usize) -> Self {
        Self { trait_count, bucket_width }
    }

    fn free_in_bucket(&self, bucket: TraitBucket, taken: &[bool]) -> Vec<usize> {
        bucket
            .index_range(self.bucket_width)
            .filter(|i| *i < self.trait_count && !taken[*i])
            .collect()
    }

    /// Picks `count` distinct traits, sorted ascending. Exhausted buckets
    /// drop to zero weight; once every bucket is exhausted or weightless the
    /// remaining picks are uniform over unpicked traits.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        weights: &[f64; 5],
        count: usize,
        rng: &mut R,
    ) -> Vec<usize> {
        let count = count.min(self.trait_count);
        let mut taken = vec![false; self.trait_count];
        let mut picked = Vec::with_capacity(count);

        while picked.len() < count {
            let free: Vec<Vec<usize>> =
                TraitBucket::ALL.iter().map(|b| self.free_in_bucket(*b, &taken)).collect();
            let effective: Vec<f64> = weights
                .iter()
                .zip(&free)
                .map(|(w, f)| if f.is_empty() { 0.0 } else { *w })
                .collect();

            let choice = match WeightedIndex::new(&effective) {
                Ok(dist) => free[dist.sample(rng)].choose(rng).copied(),
                Err(_) => {
                    let rest: Vec<usize> =
                        (0..self.trait_count).filter(|i| !taken[*i]).collect();
                    rest.choose(rng).copied()
                }
            };
            let Some(index) = choice else { break };
            taken[index] = true;
            picked.push(index);
        }

        picked.sort_unstable();
        picked
    }
}
