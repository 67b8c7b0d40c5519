//! Person names and the per-nation tables they are drawn from.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CareerError;

pub const PERSON_NAME_MIN_LEN: usize = 2;
pub const PERSON_NAME_MAX_LEN: usize = 25;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    pub first: String,
    pub last: String,
}

impl PersonName {
    pub fn full(&self) -> String {
        if self.first.is_empty() {
            self.last.clone()
        } else {
            format!("{} {}", self.first, self.last)
        }
    }

    /// Name printed on the shirt: the surname.
    pub fn shirt(&self) -> &str {
        &self.last
    }
}

/// First/last name draw tables of one nation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameTable {
    #[serde(default, rename = "firstNames")]
    pub first_names: Vec<String>,
    #[serde(default, rename = "lastNames")]
    pub last_names: Vec<String>,
}

impl NameTable {
    pub fn new(first_names: Vec<String>, last_names: Vec<String>) -> Self {
        Self { first_names, last_names }
    }

    /// Length check done once at load time so draws never need it.
    pub fn validate(&self, owner: &str) -> Result<(), CareerError> {
        for name in self.first_names.iter().chain(self.last_names.iter()) {
            let len = name.chars().count();
            if !(PERSON_NAME_MIN_LEN..=PERSON_NAME_MAX_LEN).contains(&len) {
                return Err(CareerError::validation(format!(
                    "Length of person names must be between {} and {}, while {}'s name {} has {}.",
                    PERSON_NAME_MIN_LEN, PERSON_NAME_MAX_LEN, owner, name, len
                )));
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.last_names.is_empty()
    }

    /// Draws a name; `None` when the table has no surnames.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<PersonName> {
        let last = self.last_names.choose(rng)?.clone();
        let first = self.first_names.choose(rng).cloned().unwrap_or_default();
        Some(PersonName { first, last })
    }
}
