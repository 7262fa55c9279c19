/// Scene graph assembly: turns the catalog into engine nodes and keeps their
/// local transforms current.
///
/// Hierarchy per planet:
/// ```text
/// orbit ring   Ry(node)·Rx(incl)                       (root)
/// frame        Ry(node)·Rx(incl)·Ry(angle)·T(d,0,0)    (root, no mesh)
///   body       Ry(spin)
///   rings      Rx(-π/2.5), Saturn only
///   moon ring  identity
///   moon       Ry(moon angle)·T(moon d,0,0)
/// ```
/// Moons hang off the frame, not the body, so they do not inherit its spin.

use std::collections::HashMap;
use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Quat, Vec3};
use orrery_engine::{
    EngineContext, LocalTransform, MeshComponent, Node, NodeId, Rgb, Rng, Scene, SimClock,
    TransformGraph,
};

use crate::bodies::{self, Body, Catalog};
use crate::orbit::{
    compute_local_transform, orbit_plane, OrbitParams, OrbitalPhase, SelfRotation,
    MOON_TIME_FACTOR, PLANET_TIME_FACTOR,
};

// ── Visual constants ─────────────────────────────────────────────────

const ORBIT_COLOR: Rgb = Rgb::WHITE;
const PLANET_ORBIT_HALF_WIDTH: f32 = 0.1;
const PLANET_ORBIT_OPACITY: f32 = 0.15;
const MOON_ORBIT_HALF_WIDTH: f32 = 0.02;
const MOON_ORBIT_OPACITY: f32 = 0.05;

const SUN_EMISSIVE: f32 = 0.6;
const SUN_GLOW_SCALE: f32 = 1.2;
const SUN_GLOW_OPACITY: f32 = 0.15;

/// Ring tilt about the planet frame's X axis.
const RING_TILT: f32 = -PI / 2.5;

/// Pick spheres are slightly larger than the bodies so small planets stay clickable.
const PICK_RADIUS_SCALE: f32 = 1.25;

// ── Per-body state ───────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct MoonEntry {
    node: NodeId,
    orbit: OrbitParams,
    phase: OrbitalPhase,
}

#[derive(Debug, Clone)]
struct PlanetEntry {
    name: String,
    radius: f32,
    frame: NodeId,
    body: NodeId,
    orbit_ring: NodeId,
    orbit: OrbitParams,
    phase: OrbitalPhase,
    spin: SelfRotation,
    spin_speed: f64,
    moons: Vec<MoonEntry>,
}

/// Owns every solar-system node id and the per-body orbital memory.
#[derive(Debug)]
pub struct SolarSystemScene {
    sun: NodeId,
    sun_glow: NodeId,
    sun_spin: SelfRotation,
    sun_spin_rate: f64,
    planets: Vec<PlanetEntry>,
    /// Body name → node carrying its mesh (planets and moons).
    lookup: HashMap<String, NodeId>,
}

impl SolarSystemScene {
    /// Spawn the sun, planets, moons and their orbit rings, and register
    /// every local transform. Start angles are drawn from `seed`.
    pub fn build(catalog: &Catalog, seed: u64, ctx: &mut EngineContext) -> Self {
        let mut rng = Rng::new(seed);
        let mut lookup = HashMap::new();

        // ── Sun ──────────────────────────────────────────────────────
        let sun_data = catalog.sun();
        let sun_radius = sun_data.radius as f32;
        let sun = ctx.next_id();
        let mut sun_node = Node::new(sun)
            .with_tag(sun_data.name.as_str())
            .with_mesh(MeshComponent::sphere(sun_radius, sun_data.rgb()).with_emissive(SUN_EMISSIVE));
        if let Some(url) = &sun_data.texture_url {
            sun_node = sun_node.with_texture(ctx.textures.request(&sun_data.name, url));
        }
        ctx.scene.spawn(sun_node);
        ctx.graph.register(sun);
        lookup.insert(sun_data.name.clone(), sun);

        let sun_glow = ctx.next_id();
        ctx.scene.spawn(
            Node::new(sun_glow)
                .with_tag(format!("{}:glow", sun_data.name))
                .with_mesh(
                    MeshComponent::sphere(sun_radius * SUN_GLOW_SCALE, sun_data.rgb())
                        .with_emissive(1.0)
                        .with_opacity(SUN_GLOW_OPACITY),
                ),
        );
        ctx.graph.register(sun_glow);

        // ── Planets ──────────────────────────────────────────────────
        let mut planets = Vec::with_capacity(catalog.len());
        for body in catalog.planets() {
            let entry = Self::spawn_planet(body, &mut rng, ctx, &mut lookup);
            planets.push(entry);
        }

        ctx.graph.propagate(&mut ctx.scene);
        log::info!(
            "solar system built: {} planets, {} moons, seed {}",
            planets.len(),
            planets.iter().map(|p| p.moons.len()).sum::<usize>(),
            seed
        );

        Self {
            sun,
            sun_glow,
            sun_spin: SelfRotation::default(),
            sun_spin_rate: sun_data.spin_rate,
            planets,
            lookup,
        }
    }

    fn spawn_planet(
        body: &Body,
        rng: &mut Rng,
        ctx: &mut EngineContext,
        lookup: &mut HashMap<String, NodeId>,
    ) -> PlanetEntry {
        let orbit = OrbitParams::planet(body);
        let phase = OrbitalPhase::sample(rng);
        let radius = body.radius as f32;
        let distance = body.distance as f32;

        let orbit_ring = ctx.next_id();
        ctx.scene.spawn(
            Node::new(orbit_ring)
                .with_tag(format!("{}:orbit", body.name))
                .with_mesh(
                    MeshComponent::ring(
                        distance - PLANET_ORBIT_HALF_WIDTH,
                        distance + PLANET_ORBIT_HALF_WIDTH,
                        ORBIT_COLOR,
                    )
                    .with_opacity(PLANET_ORBIT_OPACITY),
                ),
        );
        ctx.graph.register_with(orbit_ring, LocalTransform::new().with_rotation(orbit_plane(&orbit)));

        let frame = ctx.next_id();
        ctx.scene.spawn(Node::new(frame).with_tag(format!("{}:frame", body.name)));
        ctx.graph.register_with(frame, LocalTransform::from_matrix(compute_local_transform(&orbit, phase.start_angle)));

        let planet = ctx.next_id();
        let mut node = Node::new(planet)
            .with_tag(body.name.as_str())
            .with_mesh(MeshComponent::sphere(radius, body.rgb()));
        if let Some(url) = &body.texture_url {
            node = node.with_texture(ctx.textures.request(&body.name, url));
        }
        ctx.scene.spawn(node);
        ctx.graph.register(planet);
        ctx.graph.set_parent(planet, Some(frame));
        lookup.insert(body.name.clone(), planet);

        if body.has_rings {
            let rings = ctx.next_id();
            ctx.scene.spawn(
                Node::new(rings)
                    .with_tag(format!("{}:rings", body.name))
                    .with_mesh(
                        MeshComponent::ring(
                            radius * bodies::RING_INNER_FACTOR,
                            radius * bodies::RING_OUTER_FACTOR,
                            body.ring_rgb(),
                        )
                        .with_opacity(bodies::RING_OPACITY),
                    ),
            );
            // Ring meshes lie in XZ; the tilt is measured from the XY plane.
            ctx.graph.register_with(rings, LocalTransform::new().with_rotation(Quat::from_rotation_x(RING_TILT + FRAC_PI_2)));
            ctx.graph.set_parent(rings, Some(frame));
        }

        let mut moons = Vec::with_capacity(body.moons.len());
        for moon in &body.moons {
            let moon_orbit = OrbitParams::moon(moon);
            let moon_phase = OrbitalPhase::sample(rng);
            let d = moon.distance as f32;

            let ring = ctx.next_id();
            ctx.scene.spawn(
                Node::new(ring)
                    .with_tag(format!("{}:orbit", moon.name))
                    .with_mesh(
                        MeshComponent::ring(d - MOON_ORBIT_HALF_WIDTH, d + MOON_ORBIT_HALF_WIDTH, ORBIT_COLOR)
                            .with_opacity(MOON_ORBIT_OPACITY),
                    ),
            );
            ctx.graph.register(ring);
            ctx.graph.set_parent(ring, Some(frame));

            let id = ctx.next_id();
            let mut node = Node::new(id)
                .with_tag(moon.name.as_str())
                .with_mesh(MeshComponent::sphere(moon.radius as f32, moon.rgb()));
            if let Some(url) = &moon.texture_url {
                node = node.with_texture(ctx.textures.request(&moon.name, url));
            }
            ctx.scene.spawn(node);
            ctx.graph.register_with(id, LocalTransform::from_matrix(compute_local_transform(&moon_orbit, moon_phase.start_angle)));
            ctx.graph.set_parent(id, Some(frame));
            lookup.entry(moon.name.clone()).or_insert(id);

            moons.push(MoonEntry { node: id, orbit: moon_orbit, phase: moon_phase });
        }

        PlanetEntry {
            name: body.name.clone(),
            radius,
            frame,
            body: planet,
            orbit_ring,
            orbit,
            phase,
            spin: SelfRotation::default(),
            spin_speed: body.self_rotation_speed,
            moons,
        }
    }

    /// One tick: recompute every local transform from the clock, accumulate
    /// spins, and propagate world matrices.
    pub fn advance(
        &mut self,
        clock: &SimClock,
        time_speed: f64,
        dt: f32,
        graph: &mut TransformGraph,
        scene: &mut Scene,
    ) {
        let planet_t = clock.scaled(PLANET_TIME_FACTOR);
        let moon_t = clock.scaled(MOON_TIME_FACTOR);

        self.sun_spin.advance(self.sun_spin_rate * dt as f64, time_speed);
        graph.set_local(self.sun, LocalTransform::new().with_rotation(self.sun_spin.rotation()));

        for planet in &mut self.planets {
            let angle = planet.phase.angle_at(planet.orbit.angular_speed, planet_t);
            graph.set_local_matrix(planet.frame, compute_local_transform(&planet.orbit, angle));

            planet.spin.advance(planet.spin_speed, time_speed);
            graph.set_local(planet.body, LocalTransform::new().with_rotation(planet.spin.rotation()));

            for moon in &planet.moons {
                let moon_angle = moon.phase.angle_at(moon.orbit.angular_speed, moon_t);
                graph.set_local_matrix(moon.node, compute_local_transform(&moon.orbit, moon_angle));
            }
        }

        graph.propagate(scene);
    }

    /// Show or hide the planet orbit rings. Moon orbit rings are always drawn.
    pub fn apply_visibility(&self, scene: &mut Scene, show_orbits: bool) {
        for planet in &self.planets {
            scene.set_active(planet.orbit_ring, show_orbits);
        }
    }

    /// Current world position of a named body.
    pub fn world_position(&self, name: &str, scene: &Scene) -> Option<Vec3> {
        let id = self.lookup.get(name)?;
        scene.get(*id).map(|n| n.world_position())
    }

    pub fn node_of(&self, name: &str) -> Option<NodeId> {
        self.lookup.get(name).copied()
    }

    /// Nearest planet hit by a world-space ray, as a catalog index.
    pub fn pick(&self, scene: &Scene, origin: Vec3, dir: Vec3) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, planet) in self.planets.iter().enumerate() {
            let Some(node) = scene.get(planet.body) else { continue };
            let Some(t) = ray_sphere(origin, dir, node.world_position(), planet.radius * PICK_RADIUS_SCALE) else {
                continue;
            };
            if best.map_or(true, |(_, bt)| t < bt) {
                best = Some((i, t));
            }
        }
        best.map(|(i, _)| i)
    }

    pub fn planet_count(&self) -> usize {
        self.planets.len()
    }

    pub fn planet_name(&self, index: usize) -> Option<&str> {
        self.planets.get(index).map(|p| p.name.as_str())
    }

    pub fn sun(&self) -> NodeId {
        self.sun
    }

    pub fn sun_glow(&self) -> NodeId {
        self.sun_glow
    }

    /// Self-rotation angle of a planet (radians, unwrapped).
    pub fn spin_of(&self, name: &str) -> Option<f64> {
        self.planets.iter().find(|p| p.name == name).map(|p| p.spin.angle())
    }
}

/// Distance along a unit ray to the first intersection with a sphere.
fn ray_sphere(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let t = if -b - sq >= 0.0 { -b - sq } else { -b + sq };
    (t >= 0.0).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_engine::{build_render_buffer, material_for, AssetState, MaterialState, RenderBuffer};

    fn built(seed: u64) -> (SolarSystemScene, EngineContext, Catalog) {
        let catalog = Catalog::embedded().unwrap();
        let mut ctx = EngineContext::new();
        let system = SolarSystemScene::build(&catalog, seed, &mut ctx);
        (system, ctx, catalog)
    }

    fn tick(system: &mut SolarSystemScene, ctx: &mut EngineContext, clock: &mut SimClock, speed: f64) {
        let dt = 1.0 / 60.0;
        clock.advance(dt, speed);
        system.advance(clock, speed, dt, &mut ctx.graph, &mut ctx.scene);
    }

    #[test]
    fn planets_sit_at_their_orbital_distance() {
        let (system, ctx, catalog) = built(42);
        for body in catalog.planets() {
            let p = system.world_position(&body.name, &ctx.scene).unwrap();
            assert!((p.length() - body.distance as f32).abs() < 1e-3, "{}: {p:?}", body.name);
        }
    }

    #[test]
    fn moons_orbit_their_planet() {
        let (mut system, mut ctx, catalog) = built(3);
        let mut clock = SimClock::new();
        for _ in 0..30 {
            tick(&mut system, &mut ctx, &mut clock, 1.0);
        }
        for planet in catalog.planets() {
            let p = system.world_position(&planet.name, &ctx.scene).unwrap();
            for moon in &planet.moons {
                let m = system.world_position(&moon.name, &ctx.scene).unwrap();
                assert!((m.distance(p) - moon.distance as f32).abs() < 1e-3, "{}", moon.name);
            }
        }
    }

    #[test]
    fn zero_speed_freezes_everything() {
        let (mut system, mut ctx, _) = built(9);
        let mut clock = SimClock::new();
        tick(&mut system, &mut ctx, &mut clock, 1.0);

        let before = system.world_position("Earth", &ctx.scene).unwrap();
        let moon_before = system.world_position("Moon", &ctx.scene).unwrap();
        let spin_before = system.spin_of("Earth").unwrap();
        for _ in 0..120 {
            tick(&mut system, &mut ctx, &mut clock, 0.0);
        }
        assert_eq!(system.world_position("Earth", &ctx.scene).unwrap(), before);
        assert_eq!(system.world_position("Moon", &ctx.scene).unwrap(), moon_before);
        assert_eq!(system.spin_of("Earth").unwrap(), spin_before);
    }

    #[test]
    fn same_seed_same_layout() {
        let (a, ctx_a, _) = built(1234);
        let (b, ctx_b, _) = built(1234);
        let (c, ctx_c, _) = built(99);
        let pa = a.world_position("Mars", &ctx_a.scene).unwrap();
        assert_eq!(pa, b.world_position("Mars", &ctx_b.scene).unwrap());
        assert_ne!(pa, c.world_position("Mars", &ctx_c.scene).unwrap());
    }

    #[test]
    fn orbit_rings_follow_visibility() {
        let (system, mut ctx, _) = built(5);
        let count = |ctx: &EngineContext| {
            let mut buffer = RenderBuffer::new();
            build_render_buffer(ctx.scene.iter(), &ctx.textures, &mut buffer);
            buffer.instance_count()
        };
        let shown = count(&ctx);
        system.apply_visibility(&mut ctx.scene, false);
        let hidden = count(&ctx);
        // Only the 8 planet orbits go away.
        assert_eq!(shown - hidden, 8);
        assert!(!ctx.scene.find_by_tag("Earth:orbit").unwrap().active);
        assert!(ctx.scene.find_by_tag("Moon:orbit").unwrap().active);
        assert!(ctx.scene.find_by_tag("Titan:orbit").unwrap().active);
        system.apply_visibility(&mut ctx.scene, true);
        assert_eq!(count(&ctx), shown);
    }

    #[test]
    fn only_saturn_has_rings() {
        let (_, ctx, _) = built(5);
        assert!(ctx.scene.find_by_tag("Saturn:rings").is_some());
        assert!(ctx.scene.find_by_tag("Jupiter:rings").is_none());
    }

    #[test]
    fn textures_fall_back_on_failure() {
        let (system, mut ctx, _) = built(5);
        let earth = ctx.scene.get(system.node_of("Earth").unwrap()).unwrap().clone();
        let phobos = ctx.scene.get(system.node_of("Phobos").unwrap()).unwrap().clone();
        let slot = earth.texture.unwrap();

        assert_eq!(ctx.textures.state(slot), Some(AssetState::Pending));
        assert_eq!(material_for(&phobos, &ctx.textures), MaterialState::Flat);
        ctx.textures.mark_failed(slot);
        assert_eq!(material_for(&earth, &ctx.textures), MaterialState::Fallback);
    }

    #[test]
    fn pick_finds_the_planet_under_the_ray() {
        let (system, ctx, _) = built(11);
        let jupiter = system.world_position("Jupiter", &ctx.scene).unwrap();
        let origin = jupiter + Vec3::new(0.0, 50.0, 0.0);
        let hit = system.pick(&ctx.scene, origin, Vec3::NEG_Y);
        assert_eq!(hit.and_then(|i| system.planet_name(i)), Some("Jupiter"));

        let miss = system.pick(&ctx.scene, Vec3::new(0.0, 1000.0, 0.0), Vec3::Y);
        assert_eq!(miss, None);
    }

    #[test]
    fn sun_spins_with_simulated_time() {
        let (mut system, mut ctx, _) = built(1);
        let mut clock = SimClock::new();
        for _ in 0..60 {
            tick(&mut system, &mut ctx, &mut clock, 2.0);
        }
        // 0.05 rad/s × 1 s × speed 2.
        let (_, rot, _) = ctx.scene.get(system.sun()).unwrap().world.to_scale_rotation_translation();
        let (axis, angle) = rot.to_axis_angle();
        assert!((angle - 0.1).abs() < 1e-3, "angle = {angle}, axis = {axis:?}");
    }
}
