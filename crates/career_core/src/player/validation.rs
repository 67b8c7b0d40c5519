//! Validation module for player data
//!
//! Covers the two places player data enters the system: user-authored hero
//! input (names, point allocation, trait picks) and the post-generation
//! invariants every generated squad member must satisfy.

use std::collections::HashSet;
use std::fmt;

use crate::models::player::{Attributes, Player, ATTRIBUTE_NAMES, RATING_CAP};

/// Points a hero distributes over the six attributes.
pub const HERO_POINTS: u32 = 300;
pub const HERO_MIN_ATTRIBUTE: u32 = 20;
pub const HERO_MAX_ATTRIBUTE: u32 = 80;
pub const HERO_TRAIT_COUNT: usize = 3;
pub const HERO_NAME_MIN_LEN: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    InvalidName(String),

    InvalidAge(u32),

    /// Hero attribute outside the allowed allocation range
    InvalidAttribute { attribute: String, value: u32 },

    /// All points have to be used, no more and no less
    InvalidPointTotal(u32),

    InvalidTraitCount(usize),

    DuplicateTrait(u32),

    UnknownTrait(u32),

    UnknownNation(String),

    /// Generated attribute outside [0, 99]
    AttributeOutOfBounds { attribute: String, value: f64 },

    PotentialBelowRating { rating: f64, potential: f64 },

    PotentialAboveCap(f64),

    InvalidSuitability(String),

    ValidationFailed(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidName(msg) => write!(f, "Invalid name: {}", msg),
            ValidationError::InvalidAge(age) => {
                write!(f, "Invalid age: {}. Must be at least 16", age)
            }
            ValidationError::InvalidAttribute { attribute, value } => write!(
                f,
                "Invalid {}: {}. Must be between {} and {}",
                attribute, value, HERO_MIN_ATTRIBUTE, HERO_MAX_ATTRIBUTE
            ),
            ValidationError::InvalidPointTotal(total) => write!(
                f,
                "Attributes add up to {} points, while all {} points have to be used",
                total, HERO_POINTS
            ),
            ValidationError::InvalidTraitCount(count) => {
                write!(f, "Pick exactly {} traits, got {}", HERO_TRAIT_COUNT, count)
            }
            ValidationError::DuplicateTrait(ordinal) => {
                write!(f, "Trait {} was selected more than once", ordinal)
            }
            ValidationError::UnknownTrait(ordinal) => {
                write!(f, "There is no trait number {}", ordinal)
            }
            ValidationError::UnknownNation(query) => write!(f, "Nation not found: {}", query),
            ValidationError::AttributeOutOfBounds { attribute, value } => {
                write!(f, "Attribute {} is {}, outside [0, {}]", attribute, value, RATING_CAP)
            }
            ValidationError::PotentialBelowRating { rating, potential } => {
                write!(f, "Potential ({:.1}) must be >= rating ({:.1})", potential, rating)
            }
            ValidationError::PotentialAboveCap(potential) => {
                write!(f, "Potential {:.1} exceeds {}", potential, RATING_CAP)
            }
            ValidationError::InvalidSuitability(msg) => write!(f, "Invalid suitability: {}", msg),
            ValidationError::ValidationFailed(msg) => write!(f, "Validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Player validation utility
pub struct PlayerValidator;

impl PlayerValidator {
    /// At least two non-space characters.
    pub fn validate_name(label: &str, name: &str) -> Result<(), ValidationError> {
        let visible = name.chars().filter(|c| !c.is_whitespace()).count();
        if visible < HERO_NAME_MIN_LEN {
            return Err(ValidationError::InvalidName(format!(
                "the hero's {} must be at least {} characters long",
                label, HERO_NAME_MIN_LEN
            )));
        }
        if name.chars().any(char::is_control) {
            return Err(ValidationError::InvalidName(format!(
                "the hero's {} contains invalid characters",
                label
            )));
        }
        Ok(())
    }

    pub fn validate_age(age: u32, minimum: u32) -> Result<(), ValidationError> {
        if age < minimum {
            return Err(ValidationError::InvalidAge(age));
        }
        Ok(())
    }

    /// Each attribute in [20, 80] and all 300 points spent.
    pub fn validate_allocation(points: &[u32; 6]) -> Result<(), ValidationError> {
        for (name, value) in ATTRIBUTE_NAMES.iter().zip(points) {
            if !(HERO_MIN_ATTRIBUTE..=HERO_MAX_ATTRIBUTE).contains(value) {
                return Err(ValidationError::InvalidAttribute {
                    attribute: name.to_string(),
                    value: *value,
                });
            }
        }
        let total: u32 = points.iter().sum();
        if total != HERO_POINTS {
            return Err(ValidationError::InvalidPointTotal(total));
        }
        Ok(())
    }

    /// Three distinct ordinals, each naming an existing trait.
    pub fn validate_trait_picks(ordinals: &[u32], trait_count: usize) -> Result<(), ValidationError> {
        if ordinals.len() != HERO_TRAIT_COUNT {
            return Err(ValidationError::InvalidTraitCount(ordinals.len()));
        }
        let mut seen = HashSet::new();
        for ordinal in ordinals {
            if *ordinal == 0 || *ordinal as usize > trait_count {
                return Err(ValidationError::UnknownTrait(*ordinal));
            }
            if !seen.insert(*ordinal) {
                return Err(ValidationError::DuplicateTrait(*ordinal));
            }
        }
        Ok(())
    }

    pub fn validate_attributes(attributes: &Attributes) -> Result<(), ValidationError> {
        for (name, value) in ATTRIBUTE_NAMES.iter().zip(attributes.as_array()) {
            if !(0.0..=RATING_CAP).contains(&value) {
                return Err(ValidationError::AttributeOutOfBounds {
                    attribute: name.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }

    pub fn validate_potential(rating: f64, potential: f64) -> Result<(), ValidationError> {
        if potential > RATING_CAP {
            return Err(ValidationError::PotentialAboveCap(potential));
        }
        if potential < rating {
            return Err(ValidationError::PotentialBelowRating { rating, potential });
        }
        Ok(())
    }

    /// Exactly one zero entry at the primary index, everything else `<= 0`.
    pub fn validate_suitability(bias: &[f64], primary: usize) -> Result<(), ValidationError> {
        match bias.get(primary) {
            Some(b) if *b == 0.0 => {}
            Some(b) => {
                return Err(ValidationError::InvalidSuitability(format!(
                    "primary position bias is {}",
                    b
                )))
            }
            None => {
                return Err(ValidationError::InvalidSuitability(
                    "no bias for the primary position".into(),
                ))
            }
        }
        if let Some(b) = bias.iter().find(|b| **b > 0.0 || !b.is_finite()) {
            return Err(ValidationError::InvalidSuitability(format!("bias {} is not <= 0", b)));
        }
        Ok(())
    }

    /// Every post-generation invariant of a squad member.
    pub fn validate_generated(
        player: &Player,
        rating: f64,
        primary: usize,
    ) -> Result<(), ValidationError> {
        Self::validate_attributes(&player.attributes)?;
        Self::validate_potential(rating, player.potential)?;
        if player.traits.is_empty() {
            return Err(ValidationError::ValidationFailed(format!(
                "{} has no traits",
                player.display_name()
            )));
        }
        Self::validate_suitability(&player.suitability, primary)?;
        Ok(())
    }
}
