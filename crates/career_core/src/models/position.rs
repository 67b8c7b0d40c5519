//! Playable positions and their rating weights.

use serde::{Deserialize, Serialize};

use crate::registry::Handle;

pub type PositionId = Handle<Position>;

/// Six attribute weights plus the two foot-preference weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionWeights {
    pub pace: f64,
    pub shooting: f64,
    pub passing: f64,
    pub dribbling: f64,
    pub defending: f64,
    pub physicality: f64,
    pub left_foot: f64,
    pub right_foot: f64,
}

impl PositionWeights {
    /// Weights in attribute order (pace, shooting, passing, dribbling,
    /// defending, physicality).
    pub fn attribute_weights(&self) -> [f64; 6] {
        [
            self.pace,
            self.shooting,
            self.passing,
            self.dribbling,
            self.defending,
            self.physicality,
        ]
    }

    pub fn as_array(&self) -> [f64; 8] {
        [
            self.pace,
            self.shooting,
            self.passing,
            self.dribbling,
            self.defending,
            self.physicality,
            self.left_foot,
            self.right_foot,
        ]
    }

    pub fn is_finite(&self) -> bool {
        self.as_array().iter().all(|w| w.is_finite())
    }

    pub fn total_weight(&self) -> f64 {
        self.as_array().iter().sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub code: String,
    pub name: String,
    pub color: String,
    pub weights: PositionWeights,
    /// Flat addition to the weighted score.
    pub modifier: f64,
    /// Share of trait probability mass reserved for set-piece traits.
    pub set_piece: f64,
}

impl Position {
    pub fn search_aliases(&self) -> [String; 2] {
        [self.code.clone(), self.name.clone()]
    }
}
