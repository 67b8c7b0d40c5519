//! Ranking tables derived from a built [`World`].

use crate::models::club::ClubId;
use crate::models::league::{LeagueId, LeagueRatingMode};
use crate::models::nation::NationId;
use crate::world::World;

/// Clubs listed next to each league in the league table.
pub const LEAGUE_TABLE_TOP_CLUBS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct NationRow {
    pub nation: NationId,
    pub fifa_ranking: u32,
    /// Level 1 league, if the nation has any.
    pub top_league: Option<LeagueId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeagueRow {
    pub league: LeagueId,
    pub rating: f64,
    pub top_clubs: Vec<ClubId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClubRow {
    pub club: ClubId,
    pub rating: f64,
}

/// Nations in FIFA ranking order.
pub fn nation_rankings(world: &World) -> Vec<NationRow> {
    let mut rows: Vec<NationRow> = world
        .nations()
        .map(|(id, nation)| NationRow {
            nation: id,
            fifa_ranking: nation.fifa_ranking,
            top_league: nation.leagues().first().copied(),
        })
        .collect();
    rows.sort_by_key(|row| row.fifa_ranking);
    rows
}

/// Competitive clubs by descending derived rating. Ties keep insertion order.
pub fn club_rankings(world: &World) -> Vec<ClubRow> {
    let mut rows: Vec<ClubRow> =
        world.clubs().map(|(id, _)| ClubRow { club: id, rating: world.club_rating(id) }).collect();
    rows.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    rows
}

/// Leagues by descending rating, each with its best clubs.
pub fn league_rankings(world: &World, mode: LeagueRatingMode) -> Vec<LeagueRow> {
    let mut rows: Vec<LeagueRow> = world
        .leagues()
        .map(|(id, league)| {
            let mut clubs: Vec<ClubRow> = league
                .clubs()
                .iter()
                .map(|c| ClubRow { club: *c, rating: world.club_rating(*c) })
                .collect();
            clubs.sort_by(|a, b| b.rating.total_cmp(&a.rating));
            LeagueRow {
                league: id,
                rating: world.league_rating(id, mode),
                top_clubs: clubs.into_iter().take(LEAGUE_TABLE_TOP_CLUBS).map(|r| r.club).collect(),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    rows
}
