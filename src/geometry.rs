//! Geometry helpers for the collision routines
//!
//! Pure functions over `glam::Vec2`, no state.

use glam::Vec2;

/// Smallest squared segment length used as a projection denominator
pub const SEGMENT_EPSILON: f32 = 1e-9;

/// Clamp `v` into `[lo, hi]`
#[inline]
pub fn clamp(v: f32, lo: f32, hi: f32) -> f32 {
    if v < lo {
        lo
    } else if v > hi {
        hi
    } else {
        v
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
///
/// `normal` must be unit length; a non-unit normal scales the result.
#[inline]
pub fn reflect(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Closest point to `p` on the segment `a`-`b`
///
/// A zero-length segment collapses to `a`.
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared().max(SEGMENT_EPSILON);
    let t = clamp((p - a).dot(ab) / len_sq, 0.0, 1.0);
    a + ab * t
}

/// Unit direction for an angle in degrees (0° = +x, counter-clockwise)
#[inline]
pub fn direction_deg(angle_deg: f32) -> Vec2 {
    let a = angle_deg.to_radians();
    Vec2::new(a.cos(), a.sin())
}
