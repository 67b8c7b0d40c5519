//! Tuned constants of squad generation.
//!
//! Every number the generator uses lives here so a YAML file can
//! recalibrate any subset of them (`#[serde(default)]` fills the rest).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CareerError, Result};

pub const SQUAD_SIZE_MIN: u32 = 26;
pub const SQUAD_SIZE_MAX: u32 = 39;
/// Span the slot index is normalised to.
pub const DEPTH_SCALE: f64 = 40.0;
pub const FREE_AGENTS_PER_CLUB: usize = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    pub squad_size_min: u32,
    pub squad_size_max: u32,
    pub depth_scale: f64,

    // target rating: rating - sqrt_decay * sqrt(d) - max(0, d - knee)^2 / divisor + noise
    pub target_sqrt_decay: f64,
    pub target_bench_knee: f64,
    pub target_bench_divisor: f64,
    pub target_noise_sd: f64,

    pub age_mean: f64,
    /// Years taken off the mean age at the deepest slot.
    pub age_depth_skew: f64,
    pub age_depth_exponent: f64,
    pub age_sd: f64,
    pub age_floor: u32,

    pub potential_peak_age: f64,
    pub potential_upside_per_year: f64,
    /// Share of the upside removed at the deepest slot.
    pub potential_depth_damping: f64,
    pub potential_noise_sd: f64,

    // foreign share: base + curve * ((rating - pivot) / span)^2
    pub foreign_base: f64,
    pub foreign_curve: f64,
    pub foreign_pivot: f64,
    pub foreign_span: f64,
    pub rank_exponent: i32,

    pub position_decay_divisor: f64,
    pub attribute_noise_sd: f64,
    pub right_foot_probability: f64,

    pub trait_power: i32,
    pub trait_count_mean: f64,
    pub trait_count_sd: f64,
    pub trait_count_max: usize,
    pub trait_bucket_width: usize,

    pub suitability_gap_weight: f64,
    pub suitability_noise_sd: f64,

    pub free_agents_per_club: usize,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            squad_size_min: SQUAD_SIZE_MIN,
            squad_size_max: SQUAD_SIZE_MAX,
            depth_scale: DEPTH_SCALE,
            target_sqrt_decay: 1.2,
            target_bench_knee: 10.0,
            target_bench_divisor: 60.0,
            target_noise_sd: 2.0,
            age_mean: 27.5,
            age_depth_skew: 7.0,
            age_depth_exponent: 1.5,
            age_sd: 3.5,
            age_floor: 16,
            potential_peak_age: 29.0,
            potential_upside_per_year: 1.3,
            potential_depth_damping: 0.3,
            potential_noise_sd: 2.0,
            foreign_base: 0.15,
            foreign_curve: 0.35,
            foreign_pivot: 57.0,
            foreign_span: 30.0,
            rank_exponent: 8,
            position_decay_divisor: 4.0,
            attribute_noise_sd: 1.5,
            right_foot_probability: 0.8,
            trait_power: 15,
            trait_count_mean: 2.5,
            trait_count_sd: 1.0,
            trait_count_max: 5,
            trait_bucket_width: 5,
            suitability_gap_weight: 0.5,
            suitability_noise_sd: 1.0,
            free_agents_per_club: FREE_AGENTS_PER_CLUB,
        }
    }
}

impl GenerationParams {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|source| CareerError::Io { path: path.to_path_buf(), source })?;
        let params: Self = serde_yaml::from_str(&contents)
            .map_err(|source| CareerError::Parse { path: path.to_path_buf(), source })?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if self.squad_size_min < 2 || self.squad_size_min > self.squad_size_max {
            return Err(CareerError::Configuration(format!(
                "squad size range {}..={} is invalid",
                self.squad_size_min, self.squad_size_max
            )));
        }
        if !(0.0..=1.0).contains(&self.right_foot_probability) {
            return Err(CareerError::Configuration(format!(
                "right foot probability {} is not in [0, 1]",
                self.right_foot_probability
            )));
        }
        if self.position_decay_divisor < 1.0 {
            return Err(CareerError::Configuration(
                "position decay divisor must be at least 1".into(),
            ));
        }
        if self.trait_bucket_width == 0 || self.trait_count_max == 0 {
            return Err(CareerError::Configuration(
                "trait bucket width and trait count maximum must be positive".into(),
            ));
        }
        let spreads = [
            self.target_noise_sd,
            self.age_sd,
            self.potential_noise_sd,
            self.attribute_noise_sd,
            self.trait_count_sd,
            self.suitability_noise_sd,
        ];
        if spreads.iter().any(|sd| !sd.is_finite() || *sd < 0.0) {
            return Err(CareerError::Configuration(
                "standard deviations must be finite and non-negative".into(),
            ));
        }
        Ok(())
    }

    /// Slot index scaled onto `[0, depth_scale]`.
    pub fn normalized_depth(&self, slot: usize, squad_size: usize) -> f64 {
        if squad_size < 2 {
            return 0.0;
        }
        slot as f64 * self.depth_scale / (squad_size - 1) as f64
    }

    /// Target rating before noise for a slot at normalised depth `depth`.
    pub fn target_decay(&self, depth: f64) -> f64 {
        let bench = (depth - self.target_bench_knee).max(0.0);
        self.target_sqrt_decay * depth.sqrt() + bench * bench / self.target_bench_divisor
    }

    pub fn age_center(&self, depth: f64) -> f64 {
        let fraction = (depth / self.depth_scale).clamp(0.0, 1.0);
        self.age_mean - self.age_depth_skew * fraction.powf(self.age_depth_exponent)
    }

    /// Potential upside before noise.
    pub fn potential_upside(&self, age: u32, depth: f64) -> f64 {
        let fraction = (depth / self.depth_scale).clamp(0.0, 1.0);
        let years = (self.potential_peak_age - age as f64).max(0.0);
        years * self.potential_upside_per_year * (1.0 - self.potential_depth_damping * fraction)
    }

    /// Probability that a squad member comes from outside the club's nation.
    pub fn foreign_share(&self, club_rating: f64) -> f64 {
        let x = (club_rating - self.foreign_pivot) / self.foreign_span;
        (self.foreign_base + self.foreign_curve * x * x).clamp(0.0, 1.0)
    }

    /// Draw weight of the nation at 1-based `ranking` out of `nation_count`.
    pub fn nation_weight(&self, ranking: u32, nation_count: usize) -> f64 {
        let distance = (nation_count as f64 + 1.0 - ranking as f64).max(0.0);
        distance.powi(self.rank_exponent)
    }
}
