//! Position scoring and suitability bias.
//!
//! A position score is the dot product of the six attributes with the
//! position's weights, plus a foot term, plus the position's flat modifier,
//! capped at 99. The foot weights multiply 99 when the foot matches the
//! player's preferred foot (or for two-footed players, who hold the
//! weak-foot trait) and 1 otherwise.
//!
//! The per-player suitability bias is added on top so each player ends up
//! with one clear primary position and a few believable secondary ones.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::models::player::{Attributes, Foot, Player, RATING_CAP};
use crate::models::position::{Position, PositionId};
use crate::models::trait_system::TraitId;
use crate::registry::Arena;

/// Score multiplier for the foot weight matching the player's foot.
pub const MATCHING_FOOT_FACTOR: f64 = 99.0;
pub const OFF_FOOT_FACTOR: f64 = 1.0;

/// A position counts as secondary when its score is within this distance
/// of the primary position's score.
pub const SECONDARY_POSITION_THRESHOLD: f64 = 0.5;

/// Anything the rating model can score.
pub trait Rateable {
    fn attributes(&self) -> &Attributes;
    fn foot(&self) -> Foot;
    fn has_trait(&self, id: TraitId) -> bool;

    /// Suitability bias for the position at `index`; zero when none was rolled.
    fn bias(&self, _index: usize) -> f64 {
        0.0
    }
}

impl Rateable for Player {
    fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn foot(&self) -> Foot {
        self.foot
    }

    fn has_trait(&self, id: TraitId) -> bool {
        self.traits.contains(&id)
    }

    fn bias(&self, index: usize) -> f64 {
        self.suitability.get(index).copied().unwrap_or(0.0)
    }
}

/// The parts of a not-yet-built player the model needs.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub attributes: &'a Attributes,
    pub foot: Foot,
    pub traits: &'a [TraitId],
}

impl Rateable for Candidate<'_> {
    fn attributes(&self) -> &Attributes {
        self.attributes
    }

    fn foot(&self) -> Foot {
        self.foot
    }

    fn has_trait(&self, id: TraitId) -> bool {
        self.traits.contains(&id)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RatingModel<'a> {
    positions: &'a Arena<Position>,
    weak_foot: Option<TraitId>,
}

impl<'a> RatingModel<'a> {
    pub fn new(positions: &'a Arena<Position>, weak_foot: Option<TraitId>) -> Self {
        Self { positions, weak_foot }
    }

    fn two_footed<P: Rateable + ?Sized>(&self, player: &P) -> bool {
        self.weak_foot.map(|id| player.has_trait(id)).unwrap_or(false)
    }

    /// Weighted score for one position, without suitability bias.
    pub fn raw_score<P: Rateable + ?Sized>(&self, player: &P, position: &Position) -> f64 {
        let weights = position.weights;
        let attributes = player.attributes().as_array();
        let dot: f64 = attributes
            .iter()
            .zip(weights.attribute_weights())
            .map(|(a, w)| a * w)
            .sum();

        let both = self.two_footed(player);
        let left = if both || player.foot() == Foot::Left {
            MATCHING_FOOT_FACTOR
        } else {
            OFF_FOOT_FACTOR
        };
        let right = if both || player.foot() == Foot::Right {
            MATCHING_FOOT_FACTOR
        } else {
            OFF_FOOT_FACTOR
        };

        let score = dot + left * weights.left_foot + right * weights.right_foot + position.modifier;
        score.min(RATING_CAP)
    }

    /// Raw scores for every position, in registry order.
    pub fn raw_scores<P: Rateable + ?Sized>(&self, player: &P) -> Vec<f64> {
        self.positions.values().map(|p| self.raw_score(player, p)).collect()
    }

    /// Raw score plus the player's bias for that position.
    pub fn score<P: Rateable + ?Sized>(&self, player: &P, id: PositionId) -> Option<f64> {
        let position = self.positions.get(id)?;
        Some(self.raw_score(player, position) + player.bias(id.index()))
    }

    /// Every position with its combined score, best first. Ties prefer the
    /// position without a penalty, then registry order.
    pub fn ranked_positions<P: Rateable + ?Sized>(&self, player: &P) -> Vec<(PositionId, f64)> {
        let mut ranked: Vec<(PositionId, f64, f64)> = self
            .positions
            .iter()
            .map(|(id, position)| {
                let bias = player.bias(id.index());
                (id, self.raw_score(player, position) + bias, bias)
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.1.total_cmp(&a.1)
                .then_with(|| b.2.total_cmp(&a.2))
                .then_with(|| a.0.index().cmp(&b.0.index()))
        });
        ranked.into_iter().map(|(id, score, _)| (id, score)).collect()
    }

    pub fn primary<P: Rateable + ?Sized>(&self, player: &P) -> Option<PositionId> {
        self.ranked_positions(player).first().map(|(id, _)| *id)
    }

    pub fn secondary<P: Rateable + ?Sized>(&self, player: &P) -> Vec<PositionId> {
        let ranked = self.ranked_positions(player);
        let Some((_, best)) = ranked.first().copied() else {
            return Vec::new();
        };
        ranked
            .into_iter()
            .skip(1)
            .take_while(|(_, score)| best - score <= SECONDARY_POSITION_THRESHOLD)
            .map(|(id, _)| id)
            .collect()
    }

    /// Combined score of the primary position.
    pub fn rating<P: Rateable + ?Sized>(&self, player: &P) -> f64 {
        self.ranked_positions(player).first().map(|(_, s)| *s).unwrap_or(0.0)
    }
}

/// Rolls a suitability bias vector from raw position scores.
///
/// Each position's penalty is `-gap * gap_weight - |noise|`, where `gap` is
/// the distance to the best raw score. The position with the best penalised
/// score becomes primary; every bias is then shifted relative to it and
/// clamped at 0, which keeps the primary both at bias 0 and on top.
pub fn roll_suitability<R: Rng + ?Sized>(
    raw_scores: &[f64],
    gap_weight: f64,
    noise_sd: f64,
    rng: &mut R,
) -> Vec<f64> {
    let Some(best) = raw_scores.iter().copied().reduce(f64::max) else {
        return Vec::new();
    };
    let penalties: Vec<f64> = raw_scores
        .iter()
        .map(|raw| {
            let z: f64 = rng.sample(StandardNormal);
            -(best - raw) * gap_weight - (z * noise_sd).abs()
        })
        .collect();

    let primary = raw_scores
        .iter()
        .zip(&penalties)
        .map(|(raw, penalty)| raw + penalty)
        .enumerate()
        .fold((0usize, f64::NEG_INFINITY), |acc, (i, s)| if s > acc.1 { (i, s) } else { acc })
        .0;

    let anchor = penalties[primary];
    penalties
        .iter()
        .enumerate()
        .map(|(i, penalty)| if i == primary { 0.0 } else { (penalty - anchor).min(0.0) })
        .collect()
}

/// Index of the zero entry of a bias vector rolled by [`roll_suitability`].
pub fn primary_index(raw_scores: &[f64], bias: &[f64]) -> Option<usize> {
    raw_scores
        .iter()
        .zip(bias)
        .map(|(r, b)| (r + b, *b))
        .enumerate()
        .reduce(|best, cur| {
            let better = cur.1 .0 > best.1 .0 || (cur.1 .0 == best.1 .0 && cur.1 .1 > best.1 .1);
            if better {
                cur
            } else {
                best
            }
        })
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::position::PositionWeights;
    use crate::registry::SessionId;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn weights(attrs: [f64; 6], left: f64, right: f64) -> PositionWeights {
        PositionWeights {
            pace: attrs[0],
            shooting: attrs[1],
            passing: attrs[2],
            dribbling: attrs[3],
            defending: attrs[4],
            physicality: attrs[5],
            left_foot: left,
            right_foot: right,
        }
    }

    fn position(code: &str, w: PositionWeights, modifier: f64) -> Position {
        Position {
            code: code.into(),
            name: code.into(),
            color: "white".into(),
            weights: w,
            modifier,
            set_piece: 0.1,
        }
    }

    fn arena() -> (Arena<Position>, [PositionId; 3]) {
        let mut arena = Arena::new(SessionId::fresh());
        let st = arena.insert(position("ST", weights([0.2, 0.5, 0.0, 0.2, 0.0, 0.0], 0.0, 0.1), 0.0));
        let cb = arena.insert(position("CB", weights([0.0, 0.0, 0.1, 0.0, 0.6, 0.2], 0.05, 0.05), 0.0));
        let lb = arena.insert(position("LB", weights([0.4, 0.0, 0.2, 0.0, 0.3, 0.0], 0.1, 0.0), -2.0));
        (arena, [st, cb, lb])
    }

    fn striker() -> Attributes {
        Attributes::from_array([80.0, 85.0, 60.0, 75.0, 30.0, 60.0])
    }

    #[test]
    fn test_raw_score_weights_matching_foot() {
        let (positions, [st, _, lb]) = arena();
        let model = RatingModel::new(&positions, None);
        let attrs = striker();
        let right = Candidate { attributes: &attrs, foot: Foot::Right, traits: &[] };
        let left = Candidate { attributes: &attrs, foot: Foot::Left, traits: &[] };

        // 0.2*80 + 0.5*85 + 0.2*75 + 0.1*99
        let st_pos = positions.get(st).unwrap();
        assert!((model.raw_score(&right, st_pos) - 83.4).abs() < 1e-9);
        // off foot multiplies by 1
        assert!((model.raw_score(&left, st_pos) - 73.6).abs() < 1e-9);

        let lb_pos = positions.get(lb).unwrap();
        assert!(model.raw_score(&left, lb_pos) > model.raw_score(&right, lb_pos));
    }

    #[test]
    fn test_weak_foot_trait_counts_both_feet() {
        let mut traits = Arena::new(SessionId::fresh());
        let weak_id = traits.insert(crate::models::trait_system::Trait {
            ordinal: 1,
            name: "Weak Foot".into(),
            description: "Uses both feet".into(),
            color: "green".into(),
            category: None,
        });
        let (positions, [_, cb, _]) = arena();
        let model = RatingModel::new(&positions, Some(weak_id));

        let attrs = striker();
        let held = [weak_id];
        let two_footed = Candidate { attributes: &attrs, foot: Foot::Right, traits: &held };
        let one_footed = Candidate { attributes: &attrs, foot: Foot::Right, traits: &[] };
        let cb_pos = positions.get(cb).unwrap();
        let gap = model.raw_score(&two_footed, cb_pos) - model.raw_score(&one_footed, cb_pos);
        assert!((gap - 0.05 * 98.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_is_capped() {
        let mut positions = Arena::new(SessionId::fresh());
        let boosted =
            positions.insert(position("SS", weights([0.2, 0.5, 0.0, 0.2, 0.0, 0.0], 0.0, 0.1), 20.0));
        let model = RatingModel::new(&positions, None);
        let attrs = Attributes::from_array([99.0; 6]);
        let elite = Candidate { attributes: &attrs, foot: Foot::Right, traits: &[] };
        assert_eq!(model.score(&elite, boosted), Some(RATING_CAP));
    }

    #[test]
    fn test_primary_and_secondary_without_bias() {
        let (positions, [st, _, _]) = arena();
        let model = RatingModel::new(&positions, None);
        let attrs = striker();
        let player = Candidate { attributes: &attrs, foot: Foot::Right, traits: &[] };
        assert_eq!(model.primary(&player), Some(st));
        assert!(model.secondary(&player).is_empty());
        assert!((model.rating(&player) - 83.4).abs() < 1e-9);
    }

    #[test]
    fn test_stale_position_handle_has_no_score() {
        let (positions, _) = arena();
        let (_, [other_st, _, _]) = arena();
        let model = RatingModel::new(&positions, None);
        let attrs = striker();
        let player = Candidate { attributes: &attrs, foot: Foot::Right, traits: &[] };
        assert_eq!(model.score(&player, other_st), None);
    }

    proptest! {
        #[test]
        fn prop_rolled_bias_keeps_primary_on_top(
            raw in proptest::collection::vec(20.0f64..99.0, 1..12),
            seed in any::<u64>(),
        ) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let bias = roll_suitability(&raw, 0.5, 1.0, &mut rng);
            prop_assert_eq!(bias.len(), raw.len());

            let primary = primary_index(&raw, &bias).unwrap();
            prop_assert_eq!(bias[primary], 0.0);
            prop_assert!(bias.iter().all(|b| *b <= 0.0));

            let top = raw[primary];
            for (r, b) in raw.iter().zip(&bias) {
                prop_assert!(r + b <= top + 1e-9);
            }
        }
    }
}
