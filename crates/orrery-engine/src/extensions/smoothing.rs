// extensions/smoothing.rs
//
// Per-frame exponential smoothing helpers. Pure math, no Scene access.

use glam::Vec3;

/// Linear interpolation: `a + (b - a) * t`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Component-wise linear interpolation between two points.
#[inline]
pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

/// Move `current` a fraction `alpha` of the remaining way toward `goal`.
/// Called once per frame this converges geometrically and never overshoots
/// for `alpha` in (0, 1].
#[inline]
pub fn approach(current: Vec3, goal: Vec3, alpha: f32) -> Vec3 {
    lerp_vec3(current, goal, alpha.clamp(0.0, 1.0))
}
