//! Circular obstacles: pop bumpers and sling posts
//!
//! Both are static circles that shove the ball outward on contact. A post is
//! just a smaller, weaker bumper with a lower score value.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Ball, ObstacleSpec};

/// Below this center distance the contact normal is undefined
const MIN_NORMAL_DIST: f32 = 1e-6;

/// Normal used when the ball center sits on the obstacle center
const FALLBACK_NORMAL: Vec2 = Vec2::Y;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Bumper,
    Post,
}

/// A static circle with an outward kick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircularObstacle {
    pub kind: ObstacleKind,
    pub center: Vec2,
    pub radius: f32,
    /// Outward speed added on every contact
    pub strength: f32,
    /// Hit at least once during the current frame
    #[serde(skip)]
    pub just_hit: bool,
    /// Seconds of highlight remaining (cosmetic)
    #[serde(skip)]
    pub flash: f32,
}

impl CircularObstacle {
    pub fn new(kind: ObstacleKind, center: Vec2, radius: f32, strength: f32) -> Self {
        Self {
            kind,
            center,
            radius,
            strength,
            just_hit: false,
            flash: 0.0,
        }
    }

    pub fn from_spec(spec: &ObstacleSpec) -> Self {
        Self::new(spec.kind, spec.center, spec.radius, spec.strength)
    }

    /// Resolve overlap with the ball
    ///
    /// Pushes the ball out to `radius + ball.radius + epsilon`, reflects any
    /// inward velocity with `restitution`, then always adds the outward kick.
    /// Returns whether contact occurred.
    pub fn collide(&mut self, ball: &mut Ball, restitution: f32, epsilon: f32) -> bool {
        let d = ball.pos - self.center;
        let dist = d.length();
        let target = self.radius + ball.radius;
        if dist >= target {
            return false;
        }

        let n = if dist > MIN_NORMAL_DIST {
            d / dist
        } else {
            FALLBACK_NORMAL
        };

        ball.pos = self.center + n * (target + epsilon);

        let vn = ball.vel.dot(n);
        if vn < 0.0 {
            ball.vel -= (1.0 + restitution) * vn * n;
        }
        ball.vel += n * self.strength;

        self.just_hit = true;
        true
    }

    /// Light up for `duration` seconds
    pub fn trigger_flash(&mut self, duration: f32) {
        self.flash = duration;
    }

    /// Decay the highlight timer
    pub fn decay_flash(&mut self, dt: f32) {
        if self.flash > 0.0 {
            self.flash = (self.flash - dt).max(0.0);
        }
    }

    #[inline]
    pub fn is_flashing(&self) -> bool {
        self.flash > 0.0
    }
}
