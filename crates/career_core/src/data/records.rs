//! On-disk shapes of the reference files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::scale_conversion::ScaleConverter;
use crate::error::{CareerError, Result};
use crate::models::position::PositionWeights;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NationRecord {
    pub names: Vec<String>,
    pub code: String,
    pub nationality: String,
    pub color: String,
    /// Companion file under `database/names/`.
    #[serde(default)]
    pub names_file: Option<String>,
    #[serde(default)]
    pub first_names: Vec<String>,
    #[serde(default)]
    pub last_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PositionRecord {
    pub code: String,
    pub name: String,
    pub color: String,
    pub weights: PositionWeights,
    #[serde(default)]
    pub modifier: f64,
    pub set_piece: f64,
}

fn default_trait_color() -> String {
    "lgrey".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TraitRecord {
    pub name: String,
    pub description: String,
    #[serde(default = "default_trait_color")]
    pub color: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// A club rating: a plain number is on the internal scale, a string with a
/// trailing `!` is an external power ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RatingValue {
    Internal(f64),
    External(String),
}

impl RatingValue {
    /// Value on the internal scale. Range checks happen in the club loader.
    pub fn to_internal(&self) -> Result<f64> {
        match self {
            RatingValue::Internal(value) => Ok(*value),
            RatingValue::External(text) => {
                let number = text.trim().strip_suffix('!').ok_or_else(|| {
                    CareerError::validation(format!(
                        "Club rating \"{}\" is neither a number nor a power ranking ending in \"!\".",
                        text
                    ))
                })?;
                let external: f64 = number.trim().parse().map_err(|_| {
                    CareerError::validation(format!("Power ranking \"{}\" is not a number.", text))
                })?;
                ScaleConverter::external_to_internal(external)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClubRecord {
    pub rating: RatingValue,
    pub full_name: String,
    /// Generic name first.
    pub names: Vec<String>,
    pub nickname: String,
    pub code: String,
    /// Primary and secondary color.
    pub colors: [String; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LeagueRecord {
    /// Any nation alias.
    pub nation: String,
    pub name: String,
    pub clubs: Vec<ClubRecord>,
}

/// tier -> position code -> example tuples
pub type FramesRecord = BTreeMap<u32, BTreeMap<String, Vec<[f64; 6]>>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_accepts_number_and_power_ranking() {
        let clubs: Vec<ClubRecord> = serde_yaml::from_str(
            r#"
- rating: 60
  fullName: Alpha Football Club
  names: [Alpha]
  nickname: The Alphas
  code: ALP
  colors: [red, white]
- rating: "50!"
  fullName: Beta Football Club
  names: [Beta]
  nickname: The Betas
  code: BET
  colors: [blue, white]
"#,
        )
        .unwrap();
        assert_eq!(clubs[0].rating.to_internal().unwrap(), 60.0);
        assert_eq!(clubs[1].rating.to_internal().unwrap(), 57.0);
    }

    #[test]
    fn test_rating_string_without_marker_rejected() {
        assert!(RatingValue::External("50".into()).to_internal().is_err());
        assert!(RatingValue::External("high!".into()).to_internal().is_err());
        assert!(RatingValue::External("120!".into()).to_internal().is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: std::result::Result<TraitRecord, _> =
            serde_yaml::from_str("name: Speedster\ndescription: Fast\nrarity: 3\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_frames_shape() {
        let frames: FramesRecord =
            serde_yaml::from_str("60:\n  ST:\n    - [70, 65, 50, 60, 30, 55]\n").unwrap();
        assert_eq!(frames[&60]["ST"][0][1], 65.0);
    }
}
