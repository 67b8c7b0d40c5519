/// Club rating scales
///
/// Authored files may give a club's strength on the external 0-100 power
/// ranking scale (written `"74.2!"`) or directly on the internal 27-87 scale.
/// Generation only ever sees the internal scale.
use crate::error::{CareerError, Result};
use crate::models::club::{MAX_CLUB_RATING, MIN_CLUB_RATING};

pub const EXTERNAL_MIN: f64 = 0.0;
pub const EXTERNAL_MAX: f64 = 100.0;
const SLOPE: f64 = 0.6;

pub struct ScaleConverter;

impl ScaleConverter {
    /// `external * 0.6 + 27`, rounded to one decimal.
    ///
    /// 0 -> 27.0, 50 -> 57.0, 100 -> 87.0
    pub fn external_to_internal(external: f64) -> Result<f64> {
        if !external.is_finite() || !(EXTERNAL_MIN..=EXTERNAL_MAX).contains(&external) {
            return Err(CareerError::validation(format!(
                "Power rankings must be between {} and {}, got {}.",
                EXTERNAL_MIN, EXTERNAL_MAX, external
            )));
        }
        Ok(round_one_decimal(external * SLOPE + MIN_CLUB_RATING))
    }

    /// Inverse mapping, for display.
    pub fn internal_to_external(internal: f64) -> f64 {
        round_one_decimal((internal - MIN_CLUB_RATING) / SLOPE)
    }

    pub fn is_internal(rating: f64) -> bool {
        (MIN_CLUB_RATING..=MAX_CLUB_RATING).contains(&rating)
    }
}

/// Rounds through the decimal representation so results match what a
/// user would compute by hand.
pub fn round_one_decimal(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bounds_map_to_internal_range() {
        assert_eq!(ScaleConverter::external_to_internal(0.0).unwrap(), 27.0);
        assert_eq!(ScaleConverter::external_to_internal(100.0).unwrap(), 87.0);
        assert_eq!(ScaleConverter::external_to_internal(50.0).unwrap(), 57.0);
    }

    #[test]
    fn test_rounds_to_one_decimal() {
        assert_eq!(ScaleConverter::external_to_internal(74.2).unwrap(), 71.5);
        assert_eq!(ScaleConverter::external_to_internal(33.3).unwrap(), 47.0);
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(ScaleConverter::external_to_internal(-0.1).is_err());
        assert!(ScaleConverter::external_to_internal(100.5).is_err());
        assert!(ScaleConverter::external_to_internal(f64::NAN).is_err());
    }

    #[test]
    fn test_internal_to_external() {
        assert_eq!(ScaleConverter::internal_to_external(57.0), 50.0);
        assert!(ScaleConverter::is_internal(27.0));
        assert!(!ScaleConverter::is_internal(90.0));
    }

    proptest! {
        #[test]
        fn prop_conversion_is_pure_and_bounded(x in 0.0f64..=100.0) {
            let a = ScaleConverter::external_to_internal(x).unwrap();
            let b = ScaleConverter::external_to_internal(x).unwrap();
            prop_assert_eq!(a.to_bits(), b.to_bits());
            prop_assert!(ScaleConverter::is_internal(a));
        }
    }
}
