//! Career CLI library
//!
//! Terminal progress, generation summaries and parameter loading shared by
//! the `career` binary.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use career_core::data::layout::SETTINGS_FILE;
use career_core::models::player::SquadRole;
use career_core::{
    club_rankings, league_rankings, DataLayout, GenerationParams, LeagueRatingMode,
    ProgressSink, Settings, World,
};

/// Prints a percentage to stderr as ingestion advances.
#[derive(Debug, Default)]
pub struct TerminalProgress {
    total: usize,
    done: usize,
    last_percent: Option<usize>,
}

impl TerminalProgress {
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            return 100;
        }
        (self.done * 100 / self.total).min(100)
    }
}

impl ProgressSink for TerminalProgress {
    fn start(&mut self, total_units: usize) {
        self.total = total_units;
        self.done = 0;
        self.last_percent = None;
    }

    fn advance(&mut self, units: usize) {
        self.done += units;
        let percent = self.percent();
        if self.last_percent != Some(percent) {
            self.last_percent = Some(percent);
            eprint!("\rLoading... {:>3}%", percent);
            let _ = std::io::stderr().flush();
        }
    }

    fn finish(&mut self) {
        eprintln!();
    }
}

/// Reads the settings file ahead of ingestion, for flags that shape it.
pub fn peek_settings(layout: &DataLayout) -> Option<Settings> {
    Settings::load(&layout.path(SETTINGS_FILE)).ok()
}

/// Defaults, or the YAML override file merged over them.
pub fn load_params(path: Option<&Path>) -> Result<GenerationParams> {
    let Some(path) = path else {
        return Ok(GenerationParams::default());
    };
    GenerationParams::load(path)
        .with_context(|| format!("Failed to load generation parameters: {}", path.display()))
}

#[derive(Debug, Clone, Serialize)]
pub struct ClubSummary {
    pub code: String,
    pub name: String,
    pub league: Option<String>,
    pub rating: f64,
    pub squad_size: usize,
    pub starters: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeagueSummary {
    pub code: String,
    pub name: String,
    pub rating: f64,
    pub clubs: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationSummary {
    pub seed: u64,
    pub nations: usize,
    pub positions: usize,
    pub traits: usize,
    pub players: usize,
    pub free_agents: usize,
    pub leagues: Vec<LeagueSummary>,
    pub clubs: Vec<ClubSummary>,
}

impl GenerationSummary {
    pub fn from_world(world: &World, seed: u64) -> Self {
        let leagues = league_rankings(world, LeagueRatingMode::Average)
            .into_iter()
            .filter_map(|row| {
                world.league(row.league).map(|league| LeagueSummary {
                    code: league.code.clone(),
                    name: league.name.clone(),
                    rating: row.rating,
                    clubs: league.capacity(),
                })
            })
            .collect();

        let clubs = club_rankings(world)
            .into_iter()
            .filter_map(|row| {
                let club = world.club(row.club)?;
                let league = club.league.and_then(|l| world.league(l)).map(|l| l.code.clone());
                let starters =
                    world.squad(row.club).filter(|(_, p)| p.role == SquadRole::Starter).count();
                Some(ClubSummary {
                    code: club.code.clone(),
                    name: club.name().to_string(),
                    league,
                    rating: (row.rating * 100.0).round() / 100.0,
                    squad_size: club.squad().len(),
                    starters,
                })
            })
            .collect();

        let free_agents = world.club(world.free_agents()).map(|c| c.squad().len()).unwrap_or(0);

        Self {
            seed,
            nations: world.nation_count(),
            positions: world.position_count(),
            traits: world.trait_count(),
            players: world.player_count(),
            free_agents,
            leagues,
            clubs,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize summary")
    }

    /// Plain-text tables.
    pub fn render(&self) -> String {
        let mut out = format!(
            "Seed {}: {} nations, {} positions, {} traits, {} players ({} free agents)\n",
            self.seed, self.nations, self.positions, self.traits, self.players, self.free_agents
        );
        out.push_str("\nLeagues\n");
        for (i, league) in self.leagues.iter().enumerate() {
            out.push_str(&format!(
                "{:>3}. {:<6} {:<28} {:>6.2} ({} clubs)\n",
                i + 1,
                league.code,
                league.name,
                league.rating,
                league.clubs
            ));
        }
        out.push_str("\nClubs\n");
        for (i, club) in self.clubs.iter().enumerate() {
            out.push_str(&format!(
                "{:>3}. {:<4} {:<26} {:<6} {:>6.2} ({} players)\n",
                i + 1,
                club.code,
                club.name,
                club.league.as_deref().unwrap_or("-"),
                club.rating,
                club.squad_size
            ));
        }
        out
    }
}

/// Parses `a,b,c` into numbers.
pub fn parse_list(text: &str) -> Result<Vec<u32>> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u32>().with_context(|| format!("\"{}\" is not a whole number", s)))
        .collect()
}
