/// Orbital kinematics: closed-form angles and local transforms.
///
/// Pure functions of simulated time. The only per-body memory is the random
/// start angle (`OrbitalPhase`) and the accumulated spin (`SelfRotation`).
/// Angles stay in f64 until a matrix is built.

use std::f64::consts::TAU;

use glam::{Mat4, Quat, Vec3};
use orrery_engine::Rng;

use crate::bodies::Body;

/// Simulated-time slowdown for planets.
pub const PLANET_TIME_FACTOR: f64 = 0.1;
/// Moons run five times faster than planets relative to the system.
pub const MOON_TIME_FACTOR: f64 = 0.5;

/// The orbital parameters a transform needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitParams {
    pub distance: f64,
    pub angular_speed: f64,
    pub inclination_deg: f64,
    pub ascending_node_deg: f64,
}

impl OrbitParams {
    /// Planet orbit: tilted plane from the catalog.
    pub fn planet(body: &Body) -> Self {
        Self {
            distance: body.distance,
            angular_speed: body.angular_speed,
            inclination_deg: body.orbit_inclination_deg,
            ascending_node_deg: body.orbit_ascending_node_deg,
        }
    }

    /// Moon orbit: flat in the parent's frame.
    pub fn moon(body: &Body) -> Self {
        Self::flat(body.distance, body.angular_speed)
    }

    pub fn flat(distance: f64, angular_speed: f64) -> Self {
        Self { distance, angular_speed, inclination_deg: 0.0, ascending_node_deg: 0.0 }
    }
}

/// `start_angle + elapsed × angular_speed`.
pub fn orbital_angle(start_angle: f64, angular_speed: f64, elapsed: f64) -> f64 {
    start_angle + elapsed * angular_speed
}

/// Fixed orientation of the orbital plane: ascending node about world up,
/// then inclination about the resulting local X axis.
pub fn orbit_plane(orbit: &OrbitParams) -> Quat {
    let node = orbit.ascending_node_deg.to_radians() as f32;
    let incl = orbit.inclination_deg.to_radians() as f32;
    Quat::from_rotation_y(node) * Quat::from_rotation_x(incl)
}

/// `Ry(node) · Rx(incl) · Ry(angle) · T(distance, 0, 0)`.
pub fn compute_local_transform(orbit: &OrbitParams, orbital_angle: f64) -> Mat4 {
    // Wrap before narrowing so long sessions keep f32 precision.
    let angle = orbital_angle.rem_euclid(TAU) as f32;
    Mat4::from_quat(orbit_plane(orbit))
        * Mat4::from_rotation_y(angle)
        * Mat4::from_translation(Vec3::new(orbit.distance as f32, 0.0, 0.0))
}

/// Position relative to the parent frame.
pub fn position_in_parent(orbit: &OrbitParams, orbital_angle: f64) -> Vec3 {
    compute_local_transform(orbit, orbital_angle).w_axis.truncate()
}

/// Random start angle, fixed for the lifetime of a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalPhase {
    pub start_angle: f64,
}

impl OrbitalPhase {
    pub fn new(start_angle: f64) -> Self {
        Self { start_angle }
    }

    /// Uniform over [0, 2π).
    pub fn sample(rng: &mut Rng) -> Self {
        Self::new(rng.next_angle())
    }

    pub fn angle_at(&self, angular_speed: f64, elapsed: f64) -> f64 {
        orbital_angle(self.start_angle, angular_speed, elapsed)
    }
}

/// Accumulated spin about the body's local up axis. Never wrapped.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SelfRotation {
    angle: f64,
}

impl SelfRotation {
    /// One tick: `speed × time_speed`.
    pub fn advance(&mut self, speed: f64, time_speed: f64) {
        self.angle += speed * time_speed;
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.angle.rem_euclid(TAU) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn angle_starts_at_phase() {
        assert_eq!(orbital_angle(1.25, 3.0, 0.0), 1.25);
        assert!((orbital_angle(0.5, -2.0, 1.5) - (0.5 - 3.0)).abs() < 1e-12);
    }

    #[test]
    fn half_turn_lands_opposite() {
        let orbit = OrbitParams::flat(30.0, 1.0);
        let phase = OrbitalPhase::new(0.0);
        let angle = phase.angle_at(orbit.angular_speed, PI);
        assert!((angle - PI).abs() < 1e-12);

        let start = position_in_parent(&orbit, phase.angle_at(1.0, 0.0));
        let half = position_in_parent(&orbit, angle);
        assert!(approx(start, Vec3::new(30.0, 0.0, 0.0)), "start = {start:?}");
        assert!(approx(half, -start), "half = {half:?}");
    }

    #[test]
    fn same_time_gives_identical_transforms() {
        let orbit = OrbitParams {
            distance: 85.0,
            angular_speed: 0.3,
            inclination_deg: 2.5,
            ascending_node_deg: 113.0,
        };
        let phase = OrbitalPhase::new(4.2);
        let a = compute_local_transform(&orbit, phase.angle_at(0.3, 17.0));
        let b = compute_local_transform(&orbit, phase.angle_at(0.3, 17.0));
        assert_eq!(a, b);
    }

    #[test]
    fn distance_from_parent_is_preserved() {
        let orbit = OrbitParams {
            distance: 15.0,
            angular_speed: 1.5,
            inclination_deg: 7.0,
            ascending_node_deg: 48.0,
        };
        for step in 0..16 {
            let p = position_in_parent(&orbit, step as f64 * 0.4);
            assert!((p.length() - 15.0).abs() < 1e-3);
        }
    }

    #[test]
    fn inclination_lifts_the_orbit_off_the_plane() {
        let orbit = OrbitParams {
            distance: 10.0,
            angular_speed: 1.0,
            inclination_deg: 30.0,
            ascending_node_deg: 0.0,
        };
        // A quarter turn from +X puts the body on the tilted axis.
        let p = position_in_parent(&orbit, PI / 2.0);
        let expected_y = 10.0 * 30f32.to_radians().sin();
        assert!((p.y.abs() - expected_y).abs() < 1e-3, "p = {p:?}");

        // On the node line (angle 0) the body stays in the reference plane.
        let q = position_in_parent(&orbit, 0.0);
        assert!(q.y.abs() < 1e-4);
    }

    #[test]
    fn ascending_node_rotates_the_node_line() {
        let orbit = OrbitParams {
            distance: 10.0,
            angular_speed: 1.0,
            inclination_deg: 5.0,
            ascending_node_deg: 90.0,
        };
        let p = position_in_parent(&orbit, 0.0);
        assert!(approx(p, Vec3::new(0.0, 0.0, -10.0)), "p = {p:?}");
    }

    #[test]
    fn large_angles_keep_precision() {
        let orbit = OrbitParams::flat(30.0, 1.0);
        let a = position_in_parent(&orbit, 1.0);
        let b = position_in_parent(&orbit, 1.0 + TAU * 1.0e6);
        assert!(approx(a, b), "{a:?} vs {b:?}");
    }

    #[test]
    fn phases_are_uniform_in_range_and_seeded() {
        let mut rng = Rng::new(7);
        let phases: Vec<OrbitalPhase> = (0..500).map(|_| OrbitalPhase::sample(&mut rng)).collect();
        assert!(phases.iter().all(|p| (0.0..TAU).contains(&p.start_angle)));

        let mut again = Rng::new(7);
        assert_eq!(OrbitalPhase::sample(&mut again), phases[0]);
    }

    #[test]
    fn self_rotation_scales_with_time_speed() {
        let mut spin = SelfRotation::default();
        spin.advance(0.02, 1.0);
        spin.advance(0.02, 1.0);
        assert!((spin.angle() - 0.04).abs() < 1e-12);

        let frozen = spin.angle();
        for _ in 0..100 {
            spin.advance(0.02, 0.0);
        }
        assert_eq!(spin.angle(), frozen);

        spin.advance(0.02, 2.5);
        assert!((spin.angle() - (frozen + 0.05)).abs() < 1e-12);
    }
}
