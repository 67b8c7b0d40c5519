//! The session object owning every registry of one generation.
//!
//! A `World` is built by ingestion and never reset: starting a new session
//! means building a new `World`, whose fresh [`SessionId`] makes every handle
//! from the previous one unresolvable.

use crate::data::settings::Settings;
use crate::error::{CareerError, Result};
use crate::models::club::{Club, ClubId};
use crate::models::frame::FrameTable;
use crate::models::hero::Hero;
use crate::models::league::{League, LeagueId, LeagueRatingMode};
use crate::models::nation::{Nation, NationId};
use crate::models::player::{Player, PlayerId, SquadRole};
use crate::models::position::{Position, PositionId};
use crate::models::trait_system::{Trait, TraitId};
use crate::player::generator::GeneratedSquad;
use crate::player::rating::RatingModel;
use crate::registry::{AliasIndex, Arena, SessionId};

pub struct World {
    session: SessionId,
    nations: Arena<Nation>,
    nation_index: AliasIndex<Nation>,
    positions: Arena<Position>,
    position_index: AliasIndex<Position>,
    traits: Arena<Trait>,
    trait_index: AliasIndex<Trait>,
    weak_foot: Option<TraitId>,
    frames: FrameTable,
    leagues: Arena<League>,
    league_index: AliasIndex<League>,
    clubs: Arena<Club>,
    club_index: AliasIndex<Club>,
    players: Arena<Player>,
    free_agents: ClubId,
    settings: Settings,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        let session = SessionId::fresh();
        let mut clubs = Arena::new(session);
        let free_agents = clubs.insert(Club::free_agents());
        Self {
            session,
            nations: Arena::new(session),
            nation_index: AliasIndex::new(),
            positions: Arena::new(session),
            position_index: AliasIndex::new(),
            traits: Arena::new(session),
            trait_index: AliasIndex::new(),
            weak_foot: None,
            frames: FrameTable::new(),
            leagues: Arena::new(session),
            league_index: AliasIndex::new(),
            clubs,
            club_index: AliasIndex::new(),
            players: Arena::new(session),
            free_agents,
            settings: Settings::default(),
        }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    // ------------------------------------------------------------------
    // Nations
    // ------------------------------------------------------------------

    /// Registers the next nation; its FIFA ranking is its insertion order.
    pub fn register_nation(&mut self, mut nation: Nation) -> Result<NationId> {
        if self.nations.values().any(|n| n.code.eq_ignore_ascii_case(&nation.code)) {
            return Err(CareerError::validation(format!(
                "Nation codes must be unique, while {} is used more than once.",
                nation.code
            )));
        }
        nation.fifa_ranking = self.nations.len() as u32 + 1;
        let aliases = nation.search_aliases();
        let id = self.nations.insert(nation);
        for alias in self.nation_index.register(id, aliases) {
            log::debug!("nation alias '{}' already taken, keeping the first owner", alias);
        }
        Ok(id)
    }

    pub fn nation(&self, id: NationId) -> Option<&Nation> {
        self.nations.get(id)
    }

    pub fn nations(&self) -> impl Iterator<Item = (NationId, &Nation)> + '_ {
        self.nations.iter()
    }

    pub fn nation_count(&self) -> usize {
        self.nations.len()
    }

    pub fn find_nation(&self, query: &str) -> Option<NationId> {
        self.nation_index.find(query)
    }

    pub fn require_nation(&self, query: &str) -> Result<NationId> {
        self.find_nation(query)
            .ok_or_else(|| CareerError::NotFound { entity: "nation", query: query.to_lowercase() })
    }

    /// Every accepted nation alias, for input completion.
    pub fn nation_aliases(&self) -> Vec<&str> {
        self.nation_index.aliases().collect()
    }

    // ------------------------------------------------------------------
    // Positions
    // ------------------------------------------------------------------

    pub fn register_position(&mut self, position: Position) -> Result<PositionId> {
        if self.positions.values().any(|p| p.code.eq_ignore_ascii_case(&position.code)) {
            return Err(CareerError::validation(format!(
                "Position short names must be unique, while {} is used more than once.",
                position.code
            )));
        }
        let aliases = position.search_aliases();
        let id = self.positions.insert(position);
        self.position_index.register(id, aliases);
        Ok(id)
    }

    pub fn position(&self, id: PositionId) -> Option<&Position> {
        self.positions.get(id)
    }

    pub fn positions(&self) -> impl Iterator<Item = (PositionId, &Position)> + '_ {
        self.positions.iter()
    }

    pub fn position_arena(&self) -> &Arena<Position> {
        &self.positions
    }

    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    pub fn find_position(&self, query: &str) -> Option<PositionId> {
        self.position_index.find(query)
    }

    // ------------------------------------------------------------------
    // Traits
    // ------------------------------------------------------------------

    /// Appends a trait; its ordinal is its 1-based insertion order.
    pub fn register_trait(
        &mut self,
        name: String,
        description: String,
        color: String,
        category: Option<String>,
    ) -> TraitId {
        let ordinal = self.traits.len() as u32 + 1;
        let tr = Trait { ordinal, name, description, color, category };
        let aliases = tr.search_aliases();
        let is_weak_foot = tr.is_weak_foot();
        let id = self.traits.insert(tr);
        self.trait_index.register(id, aliases);
        if is_weak_foot && self.weak_foot.is_none() {
            self.weak_foot = Some(id);
        }
        id
    }

    pub fn trait_(&self, id: TraitId) -> Option<&Trait> {
        self.traits.get(id)
    }

    pub fn traits(&self) -> impl Iterator<Item = (TraitId, &Trait)> + '_ {
        self.traits.iter()
    }

    pub fn trait_ids(&self) -> Vec<TraitId> {
        self.traits.handles().collect()
    }

    pub fn trait_count(&self) -> usize {
        self.traits.len()
    }

    pub fn find_trait(&self, query: &str) -> Option<TraitId> {
        self.trait_index.find(query)
    }

    pub fn trait_by_ordinal(&self, ordinal: u32) -> Option<TraitId> {
        if ordinal == 0 {
            return None;
        }
        self.traits.handles().nth(ordinal as usize - 1)
    }

    pub fn weak_foot(&self) -> Option<TraitId> {
        self.weak_foot
    }

    // ------------------------------------------------------------------
    // Frames
    // ------------------------------------------------------------------

    pub fn frames(&self) -> &FrameTable {
        &self.frames
    }

    pub fn set_frames(&mut self, frames: FrameTable) {
        self.frames = frames;
    }

    /// Checks that every collection generation reads from is populated.
    pub fn ensure_generation_inputs(&self) -> Result<()> {
        if self.weak_foot.is_none() {
            return Err(CareerError::MissingWeakFoot);
        }
        if self.nations.is_empty() {
            return Err(CareerError::Configuration("no nations are loaded".into()));
        }
        if self.positions.is_empty() {
            return Err(CareerError::Configuration("no positions are loaded".into()));
        }
        if let Some(position) =
            self.positions.values().find(|p| !self.frames.has_position(&p.code))
        {
            return Err(CareerError::Configuration(format!(
                "no attribute frames are loaded for position {}",
                position.code
            )));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Clubs and leagues
    // ------------------------------------------------------------------

    pub fn insert_club(&mut self, club: Club) -> ClubId {
        let aliases = club.search_aliases();
        let id = self.clubs.insert(club);
        self.club_index.register(id, aliases);
        id
    }

    pub fn club(&self, id: ClubId) -> Option<&Club> {
        self.clubs.get(id)
    }

    /// Every club except the free-agent sentinel.
    pub fn clubs(&self) -> impl Iterator<Item = (ClubId, &Club)> + '_ {
        self.clubs.iter().filter(|(_, c)| !c.is_free_agents())
    }

    pub fn club_count(&self) -> usize {
        self.clubs.len() - 1
    }

    pub fn find_club(&self, query: &str) -> Option<ClubId> {
        self.club_index.find(query)
    }

    pub fn free_agents(&self) -> ClubId {
        self.free_agents
    }

    /// Creates a league from already-inserted clubs. Its level is the number
    /// of leagues the nation had before plus one.
    pub fn register_league(
        &mut self,
        name: String,
        nation_id: NationId,
        clubs: Vec<ClubId>,
    ) -> Result<LeagueId> {
        let nation = self
            .nations
            .get(nation_id)
            .ok_or_else(|| CareerError::Invariant("league nation is not registered".into()))?;
        let level = nation.leagues.len() as u32 + 1;
        let nation_names = nation.names.clone();
        let mut league = League::new(name, nation_id, &nation.code, level);
        league.clubs = clubs.clone();
        let aliases = league.search_aliases(&nation_names);
        let id = self.leagues.insert(league);
        self.league_index.register(id, aliases);

        for club_id in &clubs {
            if let Some(club) = self.clubs.get_mut(*club_id) {
                club.league = Some(id);
                club.nation = Some(nation_id);
            }
        }
        if let Some(nation) = self.nations.get_mut(nation_id) {
            nation.leagues.push(id);
            nation.clubs.extend(clubs);
        }
        Ok(id)
    }

    pub fn league(&self, id: LeagueId) -> Option<&League> {
        self.leagues.get(id)
    }

    pub fn leagues(&self) -> impl Iterator<Item = (LeagueId, &League)> + '_ {
        self.leagues.iter()
    }

    pub fn league_count(&self) -> usize {
        self.leagues.len()
    }

    pub fn find_league(&self, query: &str) -> Option<LeagueId> {
        self.league_index.find(query)
    }

    /// Club codes used more than once, in first-seen order.
    pub fn duplicate_club_codes(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut duplicates: Vec<String> = Vec::new();
        for (_, club) in self.clubs() {
            let code = club.code.to_uppercase();
            if !seen.insert(code.clone()) && !duplicates.contains(&code) {
                duplicates.push(code);
            }
        }
        duplicates
    }

    // ------------------------------------------------------------------
    // Players
    // ------------------------------------------------------------------

    /// Appends a fully built player to its club's squad.
    pub fn sign_player(&mut self, player: Player) -> Result<PlayerId> {
        let club_id = player.club;
        if self.clubs.get(club_id).is_none() {
            return Err(CareerError::Invariant(format!(
                "player {} belongs to an unknown club",
                player.display_name()
            )));
        }
        let id = self.players.insert(player);
        if let Some(club) = self.clubs.get_mut(club_id) {
            club.squad.push(id);
        }
        Ok(id)
    }

    /// Registers a generated squad: members into their club, releases into
    /// the free-agent pool.
    pub fn commit_squad(&mut self, squad: GeneratedSquad) -> Result<Vec<PlayerId>> {
        let mut ids = Vec::with_capacity(squad.len());
        for player in squad.members.into_iter().chain(squad.released) {
            ids.push(self.sign_player(player)?);
        }
        Ok(ids)
    }

    /// Adds the hero to a club and relabels that squad.
    pub fn sign_hero(&mut self, hero: Hero, club: ClubId) -> Result<PlayerId> {
        let id = self.sign_player(hero.into_player(club))?;
        self.refresh_roles(club);
        Ok(id)
    }

    /// Recomputes squad labels of a club from current ratings.
    pub fn refresh_roles(&mut self, club: ClubId) {
        let Some(squad) = self.clubs.get(club).map(|c| c.squad.clone()) else {
            return;
        };
        let free_agents = club == self.free_agents;
        let model = self.rating_model();
        let mut ranked: Vec<(f64, PlayerId)> = squad
            .iter()
            .filter_map(|id| self.players.get(*id).map(|p| (model.rating(p), *id)))
            .collect();
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
        for (rank, (_, id)) in ranked.into_iter().enumerate() {
            if let Some(player) = self.players.get_mut(id) {
                player.role =
                    if free_agents { SquadRole::FreeAgent } else { SquadRole::for_rank(rank) };
            }
        }
    }

    /// Moves a player into another squad.
    pub fn transfer_player(&mut self, player_id: PlayerId, to: ClubId) -> Result<()> {
        let from = self
            .players
            .get(player_id)
            .map(|p| p.club)
            .ok_or_else(|| CareerError::Invariant("unknown player".into()))?;
        if self.clubs.get(to).is_none() {
            return Err(CareerError::Invariant("unknown destination club".into()));
        }
        if let Some(club) = self.clubs.get_mut(from) {
            club.squad.retain(|p| *p != player_id);
        }
        let to_free_agents = self.clubs.get(to).map(Club::is_free_agents).unwrap_or(false);
        if let Some(club) = self.clubs.get_mut(to) {
            club.squad.push(player_id);
        }
        if let Some(player) = self.players.get_mut(player_id) {
            player.club = to;
        }
        self.refresh_roles(from);
        self.refresh_roles(to);
        if to_free_agents {
            log::debug!("released player {:?} to the free-agent pool", player_id);
        }
        Ok(())
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn players(&self) -> impl Iterator<Item = (PlayerId, &Player)> + '_ {
        self.players.iter()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn squad(&self, club: ClubId) -> impl Iterator<Item = (PlayerId, &Player)> + '_ {
        self.clubs
            .get(club)
            .map(|c| c.squad.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(move |id| self.players.get(*id).map(|p| (*id, p)))
    }

    // ------------------------------------------------------------------
    // Derived ratings
    // ------------------------------------------------------------------

    pub fn rating_model(&self) -> RatingModel<'_> {
        RatingModel::new(&self.positions, self.weak_foot)
    }

    pub fn player_rating(&self, id: PlayerId) -> Option<f64> {
        let model = self.rating_model();
        self.players.get(id).map(|p| model.rating(p))
    }

    /// Mean rating of the club's best eleven (the whole squad when smaller).
    pub fn club_rating(&self, id: ClubId) -> f64 {
        let model = self.rating_model();
        let mut ratings: Vec<f64> = self.squad(id).map(|(_, p)| model.rating(p)).collect();
        if ratings.is_empty() {
            return self.clubs.get(id).map(|c| c.base_rating).unwrap_or(0.0);
        }
        ratings.sort_by(|a, b| b.total_cmp(a));
        ratings.truncate(SquadRole::STARTERS);
        ratings.iter().sum::<f64>() / ratings.len() as f64
    }

    pub fn league_rating(&self, id: LeagueId, mode: LeagueRatingMode) -> f64 {
        let Some(league) = self.leagues.get(id) else {
            return 0.0;
        };
        let ratings: Vec<f64> = league.clubs.iter().map(|c| self.club_rating(*c)).collect();
        if ratings.is_empty() {
            return 0.0;
        }
        let value = match mode {
            LeagueRatingMode::Average => ratings.iter().sum::<f64>() / ratings.len() as f64,
            LeagueRatingMode::Top => {
                let top = &ratings[..ratings.len().min(8)];
                top.iter().sum::<f64>() / top.len() as f64
            }
            LeagueRatingMode::Median => {
                let mut sorted = ratings.clone();
                sorted.sort_by(|a, b| b.total_cmp(a));
                sorted[sorted.len() / 2]
            }
        };
        (value * 100.0).round() / 100.0
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("session", &self.session)
            .field("nations", &self.nations.len())
            .field("positions", &self.positions.len())
            .field("traits", &self.traits.len())
            .field("leagues", &self.leagues.len())
            .field("clubs", &self.club_count())
            .field("players", &self.players.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::club::ClubColors;
    use crate::models::person::NameTable;

    fn nation(names: &[&str], code: &str) -> Nation {
        Nation::new(
            0,
            names.iter().map(|s| s.to_string()).collect(),
            code.into(),
            "English".into(),
            "white".into(),
            NameTable::default(),
        )
    }

    fn club(code: &str) -> Club {
        Club::new(
            60.0,
            ClubColors { primary: "red".into(), secondary: "white".into() },
            vec![format!("{} FC", code)],
            format!("{} Football Club", code),
            format!("The {}", code),
            code.into(),
        )
    }

    #[test]
    fn test_nation_rankings_follow_insertion_order() {
        let mut world = World::new();
        let a = world.register_nation(nation(&["Argentina"], "ARG")).unwrap();
        let b = world.register_nation(nation(&["France", "Les Bleus"], "FRA")).unwrap();
        assert_eq!(world.nation(a).unwrap().fifa_ranking, 1);
        assert_eq!(world.nation(b).unwrap().fifa_ranking, 2);
        assert_eq!(world.find_nation("2"), Some(b));
        assert_eq!(world.find_nation("les bleus"), Some(b));
        assert_eq!(world.find_nation("arg"), Some(a));
    }

    #[test]
    fn test_duplicate_nation_code_rejected() {
        let mut world = World::new();
        world.register_nation(nation(&["England"], "ENG")).unwrap();
        assert!(world.register_nation(nation(&["Engerland"], "eng")).is_err());
        assert_eq!(world.nation_count(), 1);
    }

    #[test]
    fn test_trait_ordinals_and_weak_foot() {
        let mut world = World::new();
        let first = world.register_trait("Speedster".into(), "Fast".into(), "y".into(), None);
        let weak = world.register_trait("Weak Foot".into(), "Both feet".into(), "g".into(), None);
        assert_eq!(world.trait_(first).unwrap().ordinal, 1);
        assert_eq!(world.trait_by_ordinal(2), Some(weak));
        assert_eq!(world.trait_by_ordinal(0), None);
        assert_eq!(world.weak_foot(), Some(weak));
        assert_eq!(world.find_trait("weak foot"), Some(weak));
    }

    #[test]
    fn test_league_levels_per_nation() {
        let mut world = World::new();
        let eng = world.register_nation(nation(&["England"], "ENG")).unwrap();
        let c1 = world.insert_club(club("AAA"));
        let c2 = world.insert_club(club("BBB"));
        let l1 = world.register_league("Premier League".into(), eng, vec![c1]).unwrap();
        let l2 = world.register_league("Championship".into(), eng, vec![c2]).unwrap();

        assert_eq!(world.league(l1).unwrap().level, 1);
        assert_eq!(world.league(l2).unwrap().code, "ENG2");
        assert_eq!(world.find_league("england 2"), Some(l2));
        assert_eq!(world.club(c2).unwrap().league, Some(l2));
        assert_eq!(world.nation(eng).unwrap().clubs(), &[c1, c2]);
    }

    #[test]
    fn test_duplicate_club_codes_listed_once_each() {
        let mut world = World::new();
        world.insert_club(club("AAA"));
        world.insert_club(club("BBB"));
        world.insert_club(club("aaa"));
        world.insert_club(club("BBB"));
        world.insert_club(club("AAA"));
        assert_eq!(world.duplicate_club_codes(), vec!["AAA".to_string(), "BBB".to_string()]);
    }

    #[test]
    fn test_free_agents_excluded_from_clubs() {
        let world = World::new();
        assert_eq!(world.club_count(), 0);
        assert!(world.club(world.free_agents()).unwrap().is_free_agents());
        assert!(world.duplicate_club_codes().is_empty());
    }

    #[test]
    fn test_handles_do_not_cross_worlds() {
        let mut first = World::new();
        let eng = first.register_nation(nation(&["England"], "ENG")).unwrap();
        let mut second = World::new();
        second.register_nation(nation(&["England"], "ENG")).unwrap();
        assert!(second.nation(eng).is_none());
        assert_ne!(first.session(), second.session());
    }

    #[test]
    fn test_missing_weak_foot_blocks_generation() {
        let world = World::new();
        assert!(matches!(world.ensure_generation_inputs(), Err(CareerError::MissingWeakFoot)));
    }
}
