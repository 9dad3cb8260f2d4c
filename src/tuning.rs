//! Data-driven physics and scoring balance
//!
//! Defaults are the hand-tuned values the table was balanced with. A host can
//! override any subset from JSON; missing fields keep their defaults.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sim::ObstacleKind;

/// Physics, timing and scoring knobs for a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Acceleration along the table's long axis (negative = toward the drain)
    pub gravity_down: f32,
    /// Rolling/air drag as a fraction of velocity lost per second
    pub friction: f32,
    /// Bounce restitution for walls, bumpers and flippers
    pub restitution: f32,
    /// Hard cap on ball speed
    pub max_speed: f32,

    /// Fixed physics step (seconds)
    pub fixed_dt: f32,
    /// Maximum physics steps per frame
    pub max_substeps: u32,
    /// Largest frame delta fed into the accumulator
    pub max_frame_dt: f32,

    /// Lateral velocity added per nudge
    pub nudge_push: f32,
    /// Tilt meter added per nudge
    pub nudge_tilt: f32,
    pub tilt_limit: f32,
    /// Tilt meter decay per second
    pub tilt_decay: f32,
    /// Seconds the flippers stay locked after a tilt
    pub tilt_lock: f32,

    pub plunger_max: f32,
    /// Charge gained per second while the plunger is held
    pub plunger_charge_rate: f32,
    /// Launch speed with zero charge
    pub base_launch: f32,

    pub flipper_extend_speed: f32,
    pub flipper_return_speed: f32,
    /// Outward kick added on every flipper contact
    pub flipper_base_kick: f32,
    /// Fraction of flipper thickness that counts as collision radius
    pub flipper_thickness_factor: f32,
    /// Extra separation left after positional correction
    pub contact_epsilon: f32,

    /// Seconds an obstacle stays lit after a hit
    pub bumper_flash: f32,
    /// Damping applied to downward speed below the bottom rail
    pub rail_damping: f32,

    pub starting_balls: u32,
    pub bumper_score: u64,
    pub post_score: u64,
    pub flipper_score: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity_down: -7.5,
            friction: 0.08,
            restitution: 0.90,
            max_speed: 22.0,

            fixed_dt: 1.0 / 120.0,
            max_substeps: 6,
            max_frame_dt: 0.05,

            nudge_push: 1.8,
            nudge_tilt: 1.0,
            tilt_limit: 5.0,
            tilt_decay: 1.7,
            tilt_lock: 3.0,

            plunger_max: 16.0,
            plunger_charge_rate: 24.0,
            base_launch: 7.0,

            flipper_extend_speed: 900.0,
            flipper_return_speed: 640.0,
            flipper_base_kick: 0.6,
            flipper_thickness_factor: 0.45,
            contact_epsilon: 1e-3,

            bumper_flash: 0.15,
            rail_damping: 0.98,

            starting_balls: 3,
            bumper_score: 100,
            post_score: 35,
            flipper_score: 5,
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning override from JSON
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json).map_err(TuningError::Parse)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, v: f32) -> Result<(), TuningError> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be a finite positive number",
                })
            }
        }

        positive("fixed_dt", self.fixed_dt)?;
        positive("max_speed", self.max_speed)?;
        positive("tilt_limit", self.tilt_limit)?;
        positive("plunger_max", self.plunger_max)?;
        positive("plunger_charge_rate", self.plunger_charge_rate)?;
        positive("flipper_extend_speed", self.flipper_extend_speed)?;
        positive("flipper_return_speed", self.flipper_return_speed)?;

        if self.max_substeps == 0 {
            return Err(TuningError::Invalid {
                field: "max_substeps",
                reason: "must be at least 1",
            });
        }
        if !(self.max_frame_dt >= self.fixed_dt) {
            return Err(TuningError::Invalid {
                field: "max_frame_dt",
                reason: "must not be smaller than fixed_dt",
            });
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(TuningError::Invalid {
                field: "restitution",
                reason: "must lie in [0, 1]",
            });
        }
        if !(self.friction >= 0.0) {
            return Err(TuningError::Invalid {
                field: "friction",
                reason: "must not be negative",
            });
        }
        Ok(())
    }

    /// Score value for a circular obstacle
    pub fn score_for(&self, kind: ObstacleKind) -> u64 {
        match kind {
            ObstacleKind::Bumper => self.bumper_score,
            ObstacleKind::Post => self.post_score,
        }
    }
}

/// Why a tuning override was rejected
#[derive(Debug)]
pub enum TuningError {
    Parse(serde_json::Error),
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "tuning is not valid JSON: {e}"),
            Self::Invalid { field, reason } => write!(f, "tuning field `{field}` {reason}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Invalid { .. } => None,
        }
    }
}
