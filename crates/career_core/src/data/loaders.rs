//! One loader per reference file.
//!
//! Loaders append to the [`World`] in file order. A record failure aborts the
//! rest of that loader, except in the leagues loader, which isolates each
//! club and each league so every broken record is reported in one pass.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use rand::Rng;
use serde::de::DeserializeOwned;

use super::layout::{
    DataLayout, FRAMES_FILE, LEAGUES_FILE, NATIONS_FILE, POSITIONS_FILE, SETTINGS_FILE,
    STYLE_FILE, TRAITS_FILE,
};
use super::records::{
    ClubRecord, FramesRecord, LeagueRecord, NationRecord, PositionRecord, TraitRecord,
};
use super::settings::{Settings, StyleTable};
use crate::error::{CareerError, LoadErrors, LoadResult, Result};
use crate::models::club::{
    Club, ClubColors, CLUB_NAME_MAX_LEN, CLUB_NAME_MIN_LEN, MAX_CLUB_RATING, MIN_CLUB_RATING,
    SHORT_CODE_LEN,
};
use crate::models::frame::FrameTable;
use crate::models::nation::{Nation, NationId};
use crate::models::person::NameTable;
use crate::models::player::{Attributes, RATING_CAP};
use crate::models::position::Position;
use crate::models::trait_system::is_weak_foot_name;
use crate::player::generator::SquadGenerator;
use crate::player::params::GenerationParams;
use crate::world::World;

pub const NATION_CODE_LEN: usize = 3;

/// Reads and parses one YAML file.
pub fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path)
        .map_err(|source| CareerError::Io { path: path.to_path_buf(), source })?;
    serde_yaml::from_str(&contents)
        .map_err(|source| CareerError::Parse { path: path.to_path_buf(), source })
}

pub fn load_settings(layout: &DataLayout) -> LoadResult<Settings> {
    let settings = Settings::load(&layout.path(SETTINGS_FILE))?;
    log::debug!("loaded {} settings", settings.entries().len());
    Ok(settings)
}

pub fn load_style(layout: &DataLayout) -> LoadResult<StyleTable> {
    let mapping: BTreeMap<String, String> = read_yaml(&layout.path(STYLE_FILE))?;
    let style = StyleTable::from_mapping(mapping.into_iter().collect());
    log::debug!("loaded {} styles", style.len());
    Ok(style)
}

fn nation_name_table(layout: &DataLayout, record: &NationRecord) -> Result<NameTable> {
    let mut table = match &record.names_file {
        Some(file) => read_yaml::<NameTable>(&layout.names_dir().join(file))?,
        None => NameTable::default(),
    };
    table.first_names.extend(record.first_names.iter().cloned());
    table.last_names.extend(record.last_names.iter().cloned());
    Ok(table)
}

pub fn load_nations(layout: &DataLayout, world: &mut World) -> LoadResult<usize> {
    let records: Vec<NationRecord> = read_yaml(&layout.path(NATIONS_FILE))?;
    for record in records {
        let Some(primary) = record.names.first().cloned() else {
            return Err(CareerError::validation(format!(
                "Nation {} must have at least one name.",
                record.code
            ))
            .into());
        };
        let code_len = record.code.chars().count();
        if code_len != NATION_CODE_LEN {
            return Err(CareerError::validation(format!(
                "Length of nation short names must be {}, while {}'s is {}.",
                NATION_CODE_LEN, record.code, code_len
            ))
            .into());
        }
        let table = nation_name_table(layout, &record)?;
        table.validate(&primary)?;

        world.register_nation(Nation::new(
            0,
            record.names,
            record.code,
            record.nationality,
            record.color,
            table,
        ))?;
    }
    log::info!("loaded {} nations", world.nation_count());
    Ok(world.nation_count())
}

pub fn load_positions(layout: &DataLayout, world: &mut World) -> LoadResult<usize> {
    let records: Vec<PositionRecord> = read_yaml(&layout.path(POSITIONS_FILE))?;
    for record in records {
        if record.code.trim().is_empty() {
            return Err(CareerError::validation("Position short names cannot be empty.").into());
        }
        if !record.weights.is_finite() || !record.modifier.is_finite() {
            return Err(CareerError::validation(format!(
                "Weightings of {} must all be numbers.",
                record.code
            ))
            .into());
        }
        if !(0.0..=1.0).contains(&record.set_piece) {
            return Err(CareerError::validation(format!(
                "The set piece coefficient of {} must be between 0 and 1, while it is {}.",
                record.code, record.set_piece
            ))
            .into());
        }
        world.register_position(Position {
            code: record.code,
            name: record.name,
            color: record.color,
            weights: record.weights,
            modifier: record.modifier,
            set_piece: record.set_piece,
        })?;
    }
    log::info!("loaded {} positions", world.position_count());
    Ok(world.position_count())
}

pub fn load_traits(layout: &DataLayout, world: &mut World) -> LoadResult<usize> {
    let records: Vec<TraitRecord> = read_yaml(&layout.path(TRAITS_FILE))?;
    let weak_foot_count = records.iter().filter(|r| is_weak_foot_name(&r.name)).count();
    match weak_foot_count {
        0 => return Err(CareerError::MissingWeakFoot.into()),
        1 => {}
        n => {
            return Err(CareerError::validation(format!(
                "Exactly one trait may be named \"Weak Foot\", found {}.",
                n
            ))
            .into())
        }
    }
    for record in records {
        world.register_trait(record.name, record.description, record.color, record.category);
    }
    log::info!("loaded {} traits", world.trait_count());
    Ok(world.trait_count())
}

pub fn load_frames(layout: &DataLayout, world: &mut World) -> LoadResult<usize> {
    let records: FramesRecord = read_yaml(&layout.path(FRAMES_FILE))?;
    let known: HashSet<String> = world.positions().map(|(_, p)| p.code.clone()).collect();

    let mut frames = FrameTable::new();
    for (tier, by_position) in records {
        if tier as f64 > RATING_CAP {
            return Err(CareerError::validation(format!(
                "Frame tiers must be between 0 and {}, while one is {}.",
                RATING_CAP, tier
            ))
            .into());
        }
        for (code, tuples) in by_position {
            if !known.contains(&code) {
                return Err(CareerError::validation(format!(
                    "Frame tier {} refers to unknown position {}.",
                    tier, code
                ))
                .into());
            }
            let mut attributes = Vec::with_capacity(tuples.len());
            for tuple in tuples {
                let attrs = Attributes::from_array(tuple);
                if !attrs.is_within_bounds() {
                    return Err(CareerError::validation(format!(
                        "Frame values must be between 0 and {}, while {} {} has {:?}.",
                        RATING_CAP, tier, code, tuple
                    ))
                    .into());
                }
                attributes.push(attrs);
            }
            frames.insert(tier, &code, attributes);
        }
    }

    let mut missing: Vec<&String> = known.iter().filter(|c| !frames.has_position(c)).collect();
    if !missing.is_empty() {
        missing.sort();
        let list: Vec<&str> = missing.iter().map(|s| s.as_str()).collect();
        return Err(CareerError::validation(format!(
            "Every position needs at least one frame, while {} has none.",
            list.join(", ")
        ))
        .into());
    }

    let count = frames.tuple_count();
    world.set_frames(frames);
    log::info!("loaded {} attribute frames", count);
    Ok(count)
}

fn name_len_ok(name: &str) -> bool {
    (CLUB_NAME_MIN_LEN..=CLUB_NAME_MAX_LEN).contains(&name.chars().count())
}

/// Checks one club record and converts its rating.
pub fn build_club(record: ClubRecord, nation: NationId) -> Result<Club> {
    let label = record.names.first().cloned().unwrap_or_else(|| record.full_name.clone());
    if record.names.is_empty() {
        return Err(CareerError::validation(format!(
            "Club {} must have at least one generic name.",
            record.full_name
        )));
    }
    let rating = record
        .rating
        .to_internal()
        .map_err(|err| CareerError::validation(format!("{} ({})", err, label)))?;
    if !(MIN_CLUB_RATING..=MAX_CLUB_RATING).contains(&rating) {
        return Err(CareerError::validation(format!(
            "Rating of clubs must be between {} and {} (0 and 100 in power rankings), while {}'s is {}.",
            MIN_CLUB_RATING, MAX_CLUB_RATING, label, rating
        )));
    }
    for name in record.names.iter().chain(std::iter::once(&record.nickname)) {
        if !name_len_ok(name) {
            return Err(CareerError::validation(format!(
                "Length of generic names and nicknames must be between {} and {}, while {}'s is {}.",
                CLUB_NAME_MIN_LEN,
                CLUB_NAME_MAX_LEN,
                name,
                name.chars().count()
            )));
        }
    }
    let code_len = record.code.chars().count();
    if code_len != SHORT_CODE_LEN {
        return Err(CareerError::validation(format!(
            "Length of club short names must be {}, while {}'s is {}.",
            SHORT_CODE_LEN, record.code, code_len
        )));
    }

    let [primary, secondary] = record.colors;
    let mut club = Club::new(
        rating,
        ClubColors { primary, secondary },
        record.names,
        record.full_name,
        record.nickname,
        record.code,
    );
    club.nation = Some(nation);
    Ok(club)
}

/// Builds leagues and clubs, generating each club's squad right after the
/// club is created, then sweeps club codes for duplicates.
pub fn load_leagues<R: Rng + ?Sized>(
    layout: &DataLayout,
    world: &mut World,
    params: &GenerationParams,
    rng: &mut R,
) -> LoadResult<usize> {
    let records: Vec<LeagueRecord> = read_yaml(&layout.path(LEAGUES_FILE))?;
    // fails fast when a generation input is missing
    SquadGenerator::new(world, params)?;

    let mut errors = LoadErrors::new();
    for record in records {
        let nation = match world.require_nation(&record.nation) {
            Ok(id) => id,
            Err(err) => {
                errors.push(err);
                continue;
            }
        };

        let mut clubs = Vec::with_capacity(record.clubs.len());
        for club_record in record.clubs {
            let club = match build_club(club_record, nation) {
                Ok(club) => club,
                Err(err) => {
                    errors.push(err);
                    continue;
                }
            };
            let code = club.code.clone();
            let id = world.insert_club(club);
            let squad = SquadGenerator::new(world, params).and_then(|g| g.generate(id, rng));
            match squad.and_then(|squad| world.commit_squad(squad)) {
                Ok(players) => {
                    log::debug!("club {} created with {} players", code, players.len());
                    clubs.push(id);
                }
                Err(err) => errors.push(err),
            }
        }

        let club_count = clubs.len();
        match world.register_league(record.name.clone(), nation, clubs) {
            Ok(_) => log::info!("league {} created with {} clubs", record.name, club_count),
            Err(err) => errors.push(err),
        }
    }

    let duplicates = world.duplicate_club_codes();
    if !duplicates.is_empty() {
        log::warn!("duplicate club codes: {}", duplicates.join(", "));
        errors.push(CareerError::DuplicateClubCodes(duplicates));
    }
    errors.into_result(world.league_count())
}
