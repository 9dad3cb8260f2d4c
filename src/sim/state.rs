//! Table state types
//!
//! Plain data shared by the collision routines and the table controller.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::obstacle::ObstacleKind;
use crate::consts::*;

/// Current phase of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TablePhase {
    /// Ball waiting in the shooter lane
    Ready,
    /// Ball in play
    Play,
    /// Flippers locked after excessive nudging
    Tilt,
    /// No balls left, waiting for restart
    GameOver,
}

impl TablePhase {
    /// Human-readable status line for the HUD
    pub fn message(&self) -> &'static str {
        match self {
            TablePhase::Ready => "Ball Ready - hold launch to fire",
            TablePhase::Play => "",
            TablePhase::Tilt => "TILT! Flippers locked",
            TablePhase::GameOver => "Game Over - press restart",
        }
    }
}

/// The ball. Moved and collided by the table, never destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
        }
    }

    /// Shooter lane resting spot
    pub fn at_shooter() -> Self {
        Self::new(Vec2::new(SHOOTER_X, SHOOTER_Y))
    }

    /// Current speed
    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Scale velocity down to `max_speed` if faster
    pub fn clamp_speed(&mut self, max_speed: f32) {
        if self.vel.length_squared() > max_speed * max_speed {
            self.vel = self.vel.normalize_or_zero() * max_speed;
        }
    }
}

/// Which flipper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlipperSide {
    Left,
    Right,
}

/// Something that happened this frame, for audio/visual/HUD consumers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TableEvent {
    Launched { power: f32 },
    ObstacleHit {
        index: usize,
        kind: ObstacleKind,
        points: u64,
    },
    FlipperHit {
        side: FlipperSide,
        points: u64,
    },
    Nudged { direction: f32 },
    Tilted,
    TiltRecovered,
    Drained { balls_remaining: u32 },
    GameOver { score: u64 },
    Restarted,
}

/// Placement of one circular obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub kind: ObstacleKind,
    pub center: Vec2,
    pub radius: f32,
    pub strength: f32,
}

/// Static obstacle placement for a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableLayout {
    pub obstacles: Vec<ObstacleSpec>,
}

impl Default for TableLayout {
    /// Classic three-bumper triangle plus two sling posts
    fn default() -> Self {
        let bumper = |x: f32, y: f32, strength: f32| ObstacleSpec {
            kind: ObstacleKind::Bumper,
            center: Vec2::new(x, y),
            radius: 0.36,
            strength,
        };
        let post = |x: f32, y: f32| ObstacleSpec {
            kind: ObstacleKind::Post,
            center: Vec2::new(x, y),
            radius: 0.18,
            strength: 5.0,
        };
        Self {
            obstacles: vec![
                bumper(-1.2, 2.7, 7.4),
                bumper(0.0, 3.3, 7.8),
                bumper(1.2, 2.7, 7.4),
                post(-2.5, -1.6),
                post(2.5, -1.6),
            ],
        }
    }
}
