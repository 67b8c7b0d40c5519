//! Attribute frames: example attribute tuples per rating tier and position,
//! used as the starting shape of a generated player.

use std::collections::{BTreeMap, HashMap};

use rand::seq::SliceRandom;
use rand::Rng;

use super::player::Attributes;

#[derive(Debug, Clone, Default)]
pub struct FrameTable {
    tiers: BTreeMap<u32, HashMap<String, Vec<Attributes>>>,
}

impl FrameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tier: u32, position_code: &str, tuples: Vec<Attributes>) {
        self.tiers
            .entry(tier)
            .or_default()
            .entry(position_code.to_string())
            .or_default()
            .extend(tuples);
    }

    pub fn tiers(&self) -> impl Iterator<Item = u32> + '_ {
        self.tiers.keys().copied()
    }

    pub fn tuple_count(&self) -> usize {
        self.tiers.values().flat_map(|by_pos| by_pos.values()).map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tuple_count() == 0
    }

    pub fn tuples(&self, tier: u32, position_code: &str) -> Option<&[Attributes]> {
        self.tiers
            .get(&tier)
            .and_then(|by_pos| by_pos.get(position_code))
            .filter(|tuples| !tuples.is_empty())
            .map(Vec::as_slice)
    }

    pub fn has_position(&self, position_code: &str) -> bool {
        self.tiers.keys().any(|tier| self.tuples(*tier, position_code).is_some())
    }

    /// Closest tier holding tuples for the position; ties go to the lower tier.
    pub fn nearest(&self, target_tier: i64, position_code: &str) -> Option<(u32, &[Attributes])> {
        self.tiers
            .keys()
            .filter_map(|tier| self.tuples(*tier, position_code).map(|t| (*tier, t)))
            .min_by_key(|(tier, _)| (*tier as i64 - target_tier).abs())
    }

    /// Picks one example tuple for the rounded `target` rating. When only a
    /// different tier is available the tuple is shifted by the tier gap so its
    /// level still matches the target.
    pub fn pick<R: Rng + ?Sized>(
        &self,
        target: f64,
        position_code: &str,
        rng: &mut R,
    ) -> Option<Attributes> {
        let target_tier = target.round() as i64;
        let (tier, tuples) = self.nearest(target_tier, position_code)?;
        let base = *tuples.choose(rng)?;
        let shift = (target_tier - tier as i64) as f64;
        Some(if shift == 0.0 { base } else { base.map(|v| v + shift) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn tuple(v: f64) -> Attributes {
        Attributes::from_array([v; 6])
    }

    #[test]
    fn test_exact_tier_is_used_unshifted() {
        let mut table = FrameTable::new();
        table.insert(60, "ST", vec![tuple(60.0)]);
        table.insert(70, "ST", vec![tuple(70.0)]);

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let picked = table.pick(69.6, "ST", &mut rng).unwrap();
        assert_eq!(picked, tuple(70.0));
    }

    #[test]
    fn test_missing_tier_shifts_nearest() {
        let mut table = FrameTable::new();
        table.insert(60, "CB", vec![tuple(58.0)]);
        table.insert(80, "CB", vec![tuple(81.0)]);

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(table.pick(63.0, "CB", &mut rng).unwrap(), tuple(61.0));
        assert_eq!(table.pick(77.0, "CB", &mut rng).unwrap(), tuple(78.0));
        assert!(table.pick(70.0, "GK", &mut rng).is_none());
    }

    #[test]
    fn test_nearest_prefers_lower_tier_on_tie() {
        let mut table = FrameTable::new();
        table.insert(60, "CM", vec![tuple(60.0)]);
        table.insert(70, "CM", vec![tuple(70.0)]);
        assert_eq!(table.nearest(65, "CM").map(|(t, _)| t), Some(60));
        assert_eq!(table.tuple_count(), 2);
        assert!(table.has_position("CM"));
    }
}
