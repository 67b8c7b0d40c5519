//! Player system module
//!
//! - Rating model and suitability bias
//! - Squad generation and its tuned parameters
//! - Validation of hero input and generated players
//! - Fan descriptions

pub mod description;
pub mod generator;
pub mod params;
pub mod rating;
pub mod sampling;
pub mod validation;

pub use description::fan_description;
pub use generator::{GeneratedSquad, SquadGenerator};
pub use params::GenerationParams;
pub use rating::{Rateable, RatingModel, SECONDARY_POSITION_THRESHOLD};
pub use validation::{PlayerValidator, ValidationError};
