//! Background point clouds: the distant starfield and the Oort-cloud shell.
//! Both are generated once from a seed and never change afterwards.

use glam::Vec3;
use orrery_engine::{PointInstance, Rgb, Rng};

// ── Starfield ────────────────────────────────────────────────────────

pub const STAR_COUNT: usize = 5000;
pub const STAR_RADIUS: f64 = 300.0;
pub const STAR_DEPTH: f64 = 50.0;
const STAR_GRAY: f32 = 0.9;
const STAR_SIZE_FACTOR: f32 = 4.0;

// ── Oort cloud ───────────────────────────────────────────────────────

pub const OORT_COUNT: usize = 3000;
pub const OORT_INNER: f64 = 250.0;
pub const OORT_THICKNESS: f64 = 100.0;
const OORT_COLOR: &str = "#88CCFF";
const OORT_SIZE: f32 = 0.8;
const OORT_ALPHA: f32 = 0.4;

/// Uniform direction on the unit sphere.
fn random_direction(rng: &mut Rng) -> Vec3 {
    let theta = rng.next_angle();
    let phi = (2.0 * rng.next_f64() - 1.0).acos();
    Vec3::new(
        (phi.sin() * theta.cos()) as f32,
        (phi.sin() * theta.sin()) as f32,
        phi.cos() as f32,
    )
}

/// Stars spread through `[radius, radius + depth]`. The shell radius walks
/// inward by a random fraction of `depth / count` per star, so the cloud
/// thins toward the inner edge.
pub fn stars(rng: &mut Rng, count: usize, radius: f64, depth: f64) -> Vec<PointInstance> {
    let color = Rgb::new(STAR_GRAY, STAR_GRAY, STAR_GRAY);
    let step = if count > 0 { depth / count as f64 } else { 0.0 };
    let mut r = radius + depth;

    (0..count)
        .map(|_| {
            r -= step * rng.next_f64();
            let dir = random_direction(rng);
            let size = (0.5 + 0.5 * rng.next_f64() as f32) * STAR_SIZE_FACTOR;
            PointInstance::new(dir * r as f32, size, color, 1.0)
        })
        .collect()
}

/// Oort-cloud particles uniformly distributed in `[inner, inner + thickness)`.
pub fn oort_cloud(rng: &mut Rng, count: usize, inner: f64, thickness: f64) -> Vec<PointInstance> {
    let color = Rgb::from_hex(OORT_COLOR).unwrap_or(Rgb::WHITE);
    (0..count)
        .map(|_| {
            let r = rng.range(inner, inner + thickness);
            let dir = random_direction(rng);
            PointInstance::new(dir * r as f32, OORT_SIZE, color, OORT_ALPHA)
        })
        .collect()
}

/// Full background: stars followed by the Oort cloud.
pub fn background(seed: u64) -> Vec<PointInstance> {
    let mut rng = Rng::new(seed);
    let mut points = stars(&mut rng, STAR_COUNT, STAR_RADIUS, STAR_DEPTH);
    points.extend(oort_cloud(&mut rng, OORT_COUNT, OORT_INNER, OORT_THICKNESS));
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stars_lie_in_their_shell() {
        let mut rng = Rng::new(7);
        let pts = stars(&mut rng, STAR_COUNT, STAR_RADIUS, STAR_DEPTH);
        assert_eq!(pts.len(), STAR_COUNT);
        for p in &pts {
            let d = p.position().length();
            assert!(d >= 300.0 - 1e-2 && d <= 350.0 + 1e-2, "star at {d}");
            assert!(p.size >= 2.0 && p.size <= 4.0);
        }
    }

    #[test]
    fn oort_cloud_lies_in_its_shell() {
        let mut rng = Rng::new(7);
        let pts = oort_cloud(&mut rng, OORT_COUNT, OORT_INNER, OORT_THICKNESS);
        assert_eq!(pts.len(), OORT_COUNT);
        for p in &pts {
            let d = p.position().length();
            assert!(d >= 250.0 - 1e-2 && d < 350.0 + 1e-2, "particle at {d}");
            assert_eq!(p.alpha, OORT_ALPHA);
        }
    }

    #[test]
    fn oort_cloud_covers_both_hemispheres() {
        let mut rng = Rng::new(2024);
        let pts = oort_cloud(&mut rng, 1000, OORT_INNER, OORT_THICKNESS);
        let above = pts.iter().filter(|p| p.z > 0.0).count();
        assert!(above > 400 && above < 600, "{above} of 1000 above the plane");
    }

    #[test]
    fn background_is_reproducible_per_seed() {
        let a = background(42);
        let b = background(42);
        let c = background(43);
        assert_eq!(a.len(), STAR_COUNT + OORT_COUNT);
        assert_eq!(a[0].position(), b[0].position());
        assert_eq!(a[a.len() - 1].position(), b[b.len() - 1].position());
        assert_ne!(a[0].position(), c[0].position());
    }

    #[test]
    fn zero_count_is_empty() {
        let mut rng = Rng::new(3);
        assert!(stars(&mut rng, 0, STAR_RADIUS, STAR_DEPTH).is_empty());
    }
}
