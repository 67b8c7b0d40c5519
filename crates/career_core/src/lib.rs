//! # career_core - Content engine for the Career game
//!
//! Builds a playable world out of the game directory:
//! - reference data ingestion with every error reported in one pass
//! - registries of nations, positions, traits, leagues and clubs
//! - procedural squad generation for every club
//! - the position rating and suitability model
//! - tamper-evident hero setups
//!
//! Generation is deterministic for a given seed and reference data set.

// Generator helpers take the world, params and rng together
#![allow(clippy::too_many_arguments)]

pub mod data;
pub mod error;
pub mod models;
pub mod player;
pub mod rankings;
pub mod registry;
pub mod save;
pub mod world;

pub use data::{
    ingest, ingest_quiet, DataLayout, IngestionReport, Ingested, NoProgress, ProgressSink,
    ScaleConverter, Settings, StyleTable,
};
pub use error::{CareerError, ErrorKind, LoadErrors, Result};
pub use models::{Hero, HeroInput, HeroRecord, LeagueRatingMode};
pub use player::{
    fan_description, GeneratedSquad, GenerationParams, PlayerValidator, Rateable, RatingModel,
    SquadGenerator, ValidationError,
};
pub use rankings::{club_rankings, league_rankings, nation_rankings};
pub use save::{IntegrityCodec, SetupError, SetupStore, TamperSignal};
pub use world::World;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
