//! Player traits.
//!
//! Traits are plain reference data read from the traits file. Their order in
//! the file is meaningful twice over: it fixes the 1-based ordinal saved in
//! setups, and it groups traits into the 5-wide buckets generation samples
//! from (physical, shooting, playmaking, defending, set pieces).

use crate::registry::Handle;

pub type TraitId = Handle<Trait>;

/// Name the rating model looks up to decide two-footedness.
pub const WEAK_FOOT_TRAIT_NAME: &str = "weak foot";

#[derive(Debug, Clone, PartialEq)]
pub struct Trait {
    pub ordinal: u32,
    pub name: String,
    pub description: String,
    pub color: String,
    pub category: Option<String>,
}

impl Trait {
    pub fn is_weak_foot(&self) -> bool {
        is_weak_foot_name(&self.name)
    }

    pub fn search_aliases(&self) -> [String; 2] {
        [self.ordinal.to_string(), self.name.clone()]
    }
}

pub fn is_weak_foot_name(name: &str) -> bool {
    name.trim().eq_ignore_ascii_case(WEAK_FOOT_TRAIT_NAME)
}

/// Trait bucket sampled for a player: four attribute categories plus the
/// set-piece bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraitBucket {
    Physical = 0,
    Shooting = 1,
    Playmaking = 2,
    Defending = 3,
    SetPiece = 4,
}

impl TraitBucket {
    pub const ALL: [TraitBucket; 5] = [
        TraitBucket::Physical,
        TraitBucket::Shooting,
        TraitBucket::Playmaking,
        TraitBucket::Defending,
        TraitBucket::SetPiece,
    ];

    /// Range of 0-based trait indices covered by this bucket.
    pub fn index_range(self, width: usize) -> std::ops::Range<usize> {
        let start = self as usize * width;
        start..start + width
    }
}
