//! Flippers: rotating segments driven toward a rest or extended angle
//!
//! Collision treats the flipper as a capsule around its centerline and hands
//! the flipper's surface velocity at the contact point to the ball.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Ball, FlipperSide};
use crate::consts::*;
use crate::geometry::{closest_point_on_segment, direction_deg};

/// Below this distance from the centerline the contact normal is undefined
const MIN_NORMAL_DIST: f32 = 1e-6;

/// Smallest dt used when deriving angular velocity
const MIN_DT: f32 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flipper {
    pub side: FlipperSide,
    pub pivot: Vec2,
    pub length: f32,
    pub thickness: f32,
    pub rest_deg: f32,
    pub extended_deg: f32,
    /// Current angle (degrees)
    pub angle_deg: f32,
    /// Angular velocity from the last update (degrees/sec)
    pub angular_vel_deg: f32,
    pub pressed: bool,
    /// Degrees/sec while moving toward the extended angle
    pub extend_speed: f32,
    /// Degrees/sec while falling back to rest
    pub return_speed: f32,
}

impl Flipper {
    /// Flipper at rest with the table's default geometry
    pub fn new(side: FlipperSide, extend_speed: f32, return_speed: f32) -> Self {
        let (pivot_x, rest_deg, extended_deg) = match side {
            FlipperSide::Left => (-FLIPPER_PIVOT_X, LEFT_REST_DEG, LEFT_EXTENDED_DEG),
            FlipperSide::Right => (FLIPPER_PIVOT_X, RIGHT_REST_DEG, RIGHT_EXTENDED_DEG),
        };
        Self {
            side,
            pivot: Vec2::new(pivot_x, FLIPPER_PIVOT_Y),
            length: FLIPPER_LENGTH,
            thickness: FLIPPER_THICKNESS,
            rest_deg,
            extended_deg,
            angle_deg: rest_deg,
            angular_vel_deg: 0.0,
            pressed: false,
            extend_speed,
            return_speed,
        }
    }

    #[inline]
    pub fn is_left(&self) -> bool {
        self.side == FlipperSide::Left
    }

    /// Set the button state; motion happens in `update`
    pub fn set_pressed(&mut self, pressed: bool) {
        self.pressed = pressed;
    }

    /// Move toward the target angle without overshooting it
    pub fn update(&mut self, dt: f32) {
        let (target, speed) = if self.pressed {
            (self.extended_deg, self.extend_speed)
        } else {
            (self.rest_deg, self.return_speed)
        };

        let delta = target - self.angle_deg;
        let max_step = speed * dt.max(0.0);
        let new_angle = if delta.abs() <= max_step {
            target
        } else {
            self.angle_deg + max_step.copysign(delta)
        };

        self.angular_vel_deg = (new_angle - self.angle_deg) / dt.max(MIN_DT);
        self.angle_deg = new_angle;
    }

    /// Lower and upper bound of the swing (degrees)
    pub fn angle_range(&self) -> (f32, f32) {
        (
            self.rest_deg.min(self.extended_deg),
            self.rest_deg.max(self.extended_deg),
        )
    }

    /// Pivot and tip of the centerline
    pub fn segment(&self) -> (Vec2, Vec2) {
        let p0 = self.pivot;
        let p1 = self.pivot + direction_deg(self.angle_deg) * self.length;
        (p0, p1)
    }

    /// Resolve contact with the ball
    ///
    /// The ball bounces in the flipper's local frame: the surface velocity at
    /// the contact point is removed, the normal component reflected with
    /// `restitution`, and the surface velocity added back. `base_kick` is
    /// added along the normal on every contact so a slow flipper still frees a
    /// resting ball. Returns whether contact occurred.
    pub fn collide_ball(
        &self,
        ball: &mut Ball,
        restitution: f32,
        thickness_factor: f32,
        base_kick: f32,
        epsilon: f32,
    ) -> bool {
        let (p0, p1) = self.segment();
        let q = closest_point_on_segment(ball.pos, p0, p1);
        let d = ball.pos - q;
        let dist = d.length();
        let effective_radius = ball.radius + self.thickness * thickness_factor;
        if dist >= effective_radius {
            return false;
        }

        let n = if dist > MIN_NORMAL_DIST {
            d / dist
        } else {
            // Ball center on the centerline; push away from the pivot, or
            // straight up the table if it sits on the pivot too
            let away = (ball.pos - self.pivot).normalize_or_zero();
            if away == Vec2::ZERO {
                Vec2::Y
            } else {
                away
            }
        };

        ball.pos += n * (effective_radius - dist + epsilon);

        let omega = self.angular_vel_deg.to_radians();
        let r = q - p0;
        let v_point = Vec2::new(-omega * r.y, omega * r.x);

        let v_rel = ball.vel - v_point;
        let vn = v_rel.dot(n);
        if vn < 0.0 {
            ball.vel = v_point + (v_rel - (1.0 + restitution) * vn * n);
        }
        ball.vel += n * base_kick;
        true
    }
}
