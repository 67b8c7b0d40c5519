use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::club::ClubId;
use super::nation::NationId;
use super::person::PersonName;
use super::position::PositionId;
use super::trait_system::TraitId;
use crate::registry::Handle;

pub type PlayerId = Handle<Player>;

/// Upper bound for attributes, ratings and potential.
pub const RATING_CAP: f64 = 99.0;

pub const ATTRIBUTE_NAMES: [&str; 6] =
    ["pace", "shooting", "passing", "dribbling", "defending", "physicality"];

/// The six face attributes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Attributes {
    pub pace: f64,
    pub shooting: f64,
    pub passing: f64,
    pub dribbling: f64,
    pub defending: f64,
    pub physicality: f64,
}

impl Attributes {
    pub fn from_array(values: [f64; 6]) -> Self {
        Self {
            pace: values[0],
            shooting: values[1],
            passing: values[2],
            dribbling: values[3],
            defending: values[4],
            physicality: values[5],
        }
    }

    pub fn as_array(&self) -> [f64; 6] {
        [
            self.pace,
            self.shooting,
            self.passing,
            self.dribbling,
            self.defending,
            self.physicality,
        ]
    }

    pub fn map(&self, mut f: impl FnMut(f64) -> f64) -> Self {
        Self::from_array(self.as_array().map(&mut f))
    }

    /// Clamps every attribute into `[0, 99]`.
    pub fn capped(&self) -> Self {
        self.map(|v| v.clamp(0.0, RATING_CAP))
    }

    pub fn is_within_bounds(&self) -> bool {
        self.as_array().iter().all(|v| (0.0..=RATING_CAP).contains(v))
    }

    /// How far attribute `index` sits above the best of the other five
    /// (negative when it is not the strongest).
    pub fn margin_over_rest(&self, index: usize) -> f64 {
        let values = self.as_array();
        let best_other = values
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, v)| *v)
            .fold(f64::NEG_INFINITY, f64::max);
        values[index] - best_other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Foot {
    Left,
    Right,
}

impl fmt::Display for Foot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Foot::Left => f.write_str("left"),
            Foot::Right => f.write_str("right"),
        }
    }
}

impl FromStr for Foot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(Foot::Left),
            "right" => Ok(Foot::Right),
            other => Err(format!("Invalid foot: {}", other)),
        }
    }
}

/// Squad label derived from the player's rank inside the club.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SquadRole {
    Starter,
    Substitute,
    Reserve,
    FreeAgent,
}

impl SquadRole {
    pub const STARTERS: usize = 11;
    pub const MATCHDAY_SQUAD: usize = 18;

    /// Role for the 0-based rank inside a squad sorted by rating.
    pub fn for_rank(rank: usize) -> Self {
        if rank < Self::STARTERS {
            SquadRole::Starter
        } else if rank < Self::MATCHDAY_SQUAD {
            SquadRole::Substitute
        } else {
            SquadRole::Reserve
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerOrigin {
    Generated,
    Hero { full_name: String, shirt_name: String },
}

#[derive(Debug, Clone)]
pub struct Player {
    pub name: PersonName,
    pub age: u32,
    pub nation: NationId,
    pub attributes: Attributes,
    pub foot: Foot,
    /// Sorted by trait ordinal.
    pub traits: Vec<TraitId>,
    /// Suitability bias per position, indexed like the position registry.
    /// 0 for the primary position, negative elsewhere.
    pub suitability: Vec<f64>,
    pub role: SquadRole,
    pub potential: f64,
    pub club: ClubId,
    pub origin: PlayerOrigin,
}

impl Player {
    pub fn has_trait(&self, id: TraitId) -> bool {
        self.traits.contains(&id)
    }

    pub fn bias_for(&self, position: PositionId) -> f64 {
        self.suitability.get(position.index()).copied().unwrap_or(0.0)
    }

    pub fn display_name(&self) -> String {
        match &self.origin {
            PlayerOrigin::Hero { full_name, .. } => full_name.clone(),
            PlayerOrigin::Generated => self.name.full(),
        }
    }

    pub fn is_hero(&self) -> bool {
        matches!(self.origin, PlayerOrigin::Hero { .. })
    }
}
