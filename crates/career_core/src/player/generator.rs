//! Squad generation for newly created clubs.

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::index::sample;
use rand::Rng;

use super::params::GenerationParams;
use super::rating::{primary_index, roll_suitability, Candidate};
use super::sampling::{bucket_weights, gauss, PositionPicker, TraitSampler};
use super::validation::PlayerValidator;
use crate::error::{CareerError, Result};
use crate::models::club::ClubId;
use crate::models::nation::NationId;
use crate::models::person::PersonName;
use crate::models::player::{Attributes, Foot, Player, PlayerOrigin, SquadRole, RATING_CAP};
use crate::models::position::{Position, PositionId};
use crate::models::trait_system::TraitId;
use crate::world::World;

/// Nation left out of foreign draws unless the `Allow Russia` setting is on.
pub const RUSSIA_CODE: &str = "RUS";

/// A club's freshly generated players, not yet part of any registry.
#[derive(Debug, Clone)]
pub struct GeneratedSquad {
    pub club: ClubId,
    /// Best first, roles assigned.
    pub members: Vec<Player>,
    /// Players routed to the free-agent pool.
    pub released: Vec<Player>,
}

impl GeneratedSquad {
    pub fn len(&self) -> usize {
        self.members.len() + self.released.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct SquadGenerator<'a> {
    world: &'a World,
    params: &'a GenerationParams,
    positions: Vec<(PositionId, &'a Position)>,
    traits: Vec<TraitId>,
    foreign_pool: Option<(Vec<NationId>, WeightedIndex<f64>)>,
}

impl<'a> SquadGenerator<'a> {
    pub fn new(world: &'a World, params: &'a GenerationParams) -> Result<Self> {
        params.validate()?;
        world.ensure_generation_inputs()?;

        let allow_russia = world.settings().allow_russia();
        let nation_count = world.nation_count();
        let (ids, weights): (Vec<NationId>, Vec<f64>) = world
            .nations()
            .filter(|(_, n)| allow_russia || !n.code.eq_ignore_ascii_case(RUSSIA_CODE))
            .map(|(id, n)| (id, params.nation_weight(n.fifa_ranking, nation_count)))
            .unzip();
        let foreign_pool = WeightedIndex::new(&weights).ok().map(|dist| (ids, dist));

        Ok(Self {
            world,
            params,
            positions: world.positions().collect(),
            traits: world.trait_ids(),
            foreign_pool,
        })
    }

    fn draw_nation<R: Rng + ?Sized>(&self, home: NationId, foreign_share: f64, rng: &mut R) -> NationId {
        if !rng.gen_bool(foreign_share) {
            return home;
        }
        match &self.foreign_pool {
            Some((ids, dist)) => ids[dist.sample(rng)],
            None => home,
        }
    }

    fn draw_name<R: Rng + ?Sized>(&self, nation: NationId, home: NationId, rng: &mut R) -> PersonName {
        let table_of = |id: NationId| self.world.nation(id).map(|n| &n.name_table);
        if let Some(name) = table_of(nation).and_then(|t| t.draw(rng)) {
            return name;
        }
        if let Some(name) = table_of(home).and_then(|t| t.draw(rng)) {
            return name;
        }
        let code = self.world.nation(nation).map(|n| n.code.clone()).unwrap_or_default();
        PersonName { first: String::new(), last: code }
    }

    fn trait_count<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let cap = self.params.trait_count_max.min(self.traits.len()).max(1);
        let drawn = gauss(rng, self.params.trait_count_mean, self.params.trait_count_sd).round();
        (drawn.max(1.0) as usize).min(cap)
    }

    /// Builds the full squad of `club_id` and picks its free-agent releases.
    pub fn generate<R: Rng + ?Sized>(&self, club_id: ClubId, rng: &mut R) -> Result<GeneratedSquad> {
        let club = self
            .world
            .club(club_id)
            .ok_or_else(|| CareerError::Invariant("generating a squad for an unknown club".into()))?;
        let home = club
            .nation
            .ok_or_else(|| CareerError::Invariant(format!("club {} has no nation", club.code)))?;
        let params = self.params;
        let model = self.world.rating_model();

        let size = rng.gen_range(params.squad_size_min..=params.squad_size_max) as usize;
        let foreign_share = params.foreign_share(club.base_rating);
        let mut picker = PositionPicker::new(self.positions.len(), params.position_decay_divisor);
        let sampler = TraitSampler::new(self.traits.len(), params.trait_bucket_width);

        let mut rated: Vec<(f64, Player)> = Vec::with_capacity(size);
        for slot in 0..size {
            let depth = params.normalized_depth(slot, size);
            let target = club.base_rating - params.target_decay(depth)
                + gauss(rng, 0.0, params.target_noise_sd);

            let age = gauss(rng, params.age_center(depth), params.age_sd)
                .round()
                .max(params.age_floor as f64) as u32;
            let upside =
                params.potential_upside(age, depth) + gauss(rng, 0.0, params.potential_noise_sd);
            let potential = (target + upside).max(target).min(RATING_CAP);

            let nation = self.draw_nation(home, foreign_share, rng);

            let position_index = picker
                .pick(rng)
                .ok_or_else(|| CareerError::Configuration("no positions are loaded".into()))?;
            let position = self.positions[position_index].1;
            let frame = self.world.frames().pick(target, &position.code, rng).ok_or_else(|| {
                CareerError::Configuration(format!(
                    "no attribute frames are loaded for position {}",
                    position.code
                ))
            })?;
            let attributes: Attributes =
                frame.map(|v| v + gauss(rng, 0.0, params.attribute_noise_sd)).capped();

            let foot = if rng.gen_bool(params.right_foot_probability) {
                Foot::Right
            } else {
                Foot::Left
            };

            let weights = bucket_weights(&attributes, params.trait_power, position.set_piece);
            let count = self.trait_count(rng);
            let traits: Vec<TraitId> =
                sampler.sample(&weights, count, rng).into_iter().map(|i| self.traits[i]).collect();

            let raw = model.raw_scores(&Candidate { attributes: &attributes, foot, traits: &traits });
            let suitability = roll_suitability(
                &raw,
                params.suitability_gap_weight,
                params.suitability_noise_sd,
                rng,
            );
            let primary = primary_index(&raw, &suitability).unwrap_or(0);

            let mut player = Player {
                name: self.draw_name(nation, home, rng),
                age,
                nation,
                attributes,
                foot,
                traits,
                suitability,
                role: SquadRole::Reserve,
                potential,
                club: club_id,
                origin: PlayerOrigin::Generated,
            };
            let rating = model.rating(&player);
            player.potential = player.potential.max(rating).min(RATING_CAP);

            PlayerValidator::validate_generated(&player, rating, primary).map_err(|err| {
                CareerError::Invariant(format!(
                    "{} of {}: {}",
                    player.display_name(),
                    club.code,
                    err
                ))
            })?;
            rated.push((rating, player));
        }

        rated.sort_by(|a, b| b.0.total_cmp(&a.0));
        let mut members: Vec<Player> = rated.into_iter().map(|(_, p)| p).collect();

        let released = self.release(&mut members, rng);
        for (rank, player) in members.iter_mut().enumerate() {
            player.role = SquadRole::for_rank(rank);
        }

        log::debug!(
            "generated {} players for {} ({} released)",
            members.len() + released.len(),
            club.code,
            released.len()
        );
        Ok(GeneratedSquad { club: club_id, members, released })
    }

    /// Moves `free_agents_per_club` random players ranked below the starting
    /// eleven out of `members`.
    fn release<R: Rng + ?Sized>(&self, members: &mut Vec<Player>, rng: &mut R) -> Vec<Player> {
        let first_candidate = SquadRole::STARTERS.min(members.len());
        let candidates = members.len() - first_candidate;
        let amount = self.params.free_agents_per_club.min(candidates);
        if amount == 0 {
            return Vec::new();
        }

        let mut chosen: Vec<usize> =
            sample(rng, candidates, amount).into_iter().map(|i| i + first_candidate).collect();
        chosen.sort_unstable_by(|a, b| b.cmp(a));

        let free_agents = self.world.free_agents();
        let mut released: Vec<Player> = chosen
            .into_iter()
            .map(|index| {
                let mut player = members.remove(index);
                player.role = SquadRole::FreeAgent;
                player.club = free_agents;
                player
            })
            .collect();
        released.reverse();
        released
    }
}
