/// Solar System: sun, eight planets with moons on inclined orbits, a starfield
/// and an Oort-cloud shell.
///
/// Camera: drag-to-rotate, wheel-to-zoom, click a planet to track it.
/// Per tick: input → clock → orbits → tracker → orbit controls → events.

use orrery_engine::*;
use orrery_engine::glam::Vec3;

use crate::bodies::Catalog;
use crate::error::StateError;
use crate::starfield;
use crate::state::{SimulationState, UiCommand};
use crate::system::SolarSystemScene;
use crate::tracker::{CameraTracker, TrackedBody, TrackerConfig};

/// Seed for orbital start angles and background points.
pub const DEFAULT_SEED: u64 = 0x5EED_50_1A55;

// ── Lighting ─────────────────────────────────────────────────────────

const SUN_LIGHT_COLOR: &str = "#FFF8E7";
const SUN_LIGHT_INTENSITY: f32 = 3.5;
const SUN_LIGHT_DISTANCE: f32 = 1000.0;
const SUN_LIGHT_DECAY: f32 = 0.5;
const AMBIENT_COLOR: &str = "#ccccff";
const AMBIENT_INTENSITY: f32 = 0.4;

// ── Game event kinds to the UI ───────────────────────────────────────

const EVENT_TIME_INFO: f32 = 1.0;
const EVENT_SELECTION: f32 = 2.0;
const EVENT_TRACKING: f32 = 3.0;

fn flag(b: bool) -> f32 {
    if b { 1.0 } else { 0.0 }
}

pub struct SolarSystem {
    seed: u64,
    catalog: Catalog,
    state: SimulationState,
    clock: SimClock,
    tracker: CameraTracker,
    system: Option<SolarSystemScene>,
    fixed_dt: f32,
}

impl SolarSystem {
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        let catalog = Catalog::embedded().unwrap_or_else(|e| {
            log::error!("embedded catalog is invalid: {e}");
            Catalog::empty()
        });
        Self {
            seed,
            catalog,
            state: SimulationState::new(),
            clock: SimClock::new(),
            tracker: CameraTracker::new(TrackerConfig::default()),
            system: None,
            fixed_dt: GameConfig::default().fixed_dt,
        }
    }

    // ── UI mutators ────────────────────────────────────────────────

    pub fn select_body(&mut self, name: Option<&str>) -> Result<(), StateError> {
        self.state.select_body(name, &self.catalog)
    }

    pub fn set_time_speed(&mut self, speed: f64) -> Result<(), StateError> {
        self.state.set_time_speed(speed)
    }

    pub fn set_show_orbits(&mut self, show: bool) {
        self.state.set_show_orbits(show);
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn tracker(&self) -> &CameraTracker {
        &self.tracker
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn system(&self) -> Option<&SolarSystemScene> {
        self.system.as_ref()
    }

    /// `null` when nothing is selected.
    pub fn selected_body_json(&self) -> String {
        match self.state.selected_info(&self.catalog) {
            Some(info) => serde_json::to_string(&info).unwrap_or_else(|_| "null".into()),
            None => "null".into(),
        }
    }

    // ── Input ──────────────────────────────────────────────────────

    fn handle_input(&mut self, event: InputEvent, ctx: &mut EngineContext) {
        match event {
            InputEvent::PointerDown { x, y } => ctx.controls.pointer_down(x, y),
            InputEvent::PointerMove { x, y } => {
                let h = ctx.camera.viewport.y;
                ctx.controls.pointer_move(x, y, h);
            }
            InputEvent::PointerUp { x, y } => {
                if ctx.controls.pointer_up() {
                    self.click(x, y, ctx);
                }
            }
            InputEvent::Wheel { delta_y } => ctx.controls.wheel(delta_y),
            InputEvent::Custom { kind, a, b, c } => match UiCommand::decode(kind, a, b, c) {
                Some(cmd) => self.apply_command(cmd, ctx),
                None => log::warn!("ignored custom event kind {kind} (a = {a}, b = {b})"),
            },
        }
    }

    fn apply_command(&mut self, cmd: UiCommand, ctx: &mut EngineContext) {
        let result = match cmd {
            UiCommand::SelectPlanet(index) => self.state.select_index(index, &self.catalog),
            UiCommand::SetTimeSpeed(speed) => self.state.set_time_speed(speed),
            UiCommand::SetShowOrbits(show) => {
                self.state.set_show_orbits(show);
                Ok(())
            }
            UiCommand::ClearSelection => self.state.select_body(None, &self.catalog),
            UiCommand::Resize { width, height } => {
                ctx.camera.resize(width, height);
                Ok(())
            }
        };
        if let Err(e) = result {
            log::warn!("ignored UI command {cmd:?}: {e}");
        }
    }

    /// A click (press without drag) selects the planet under the pointer.
    /// Clicks on empty space keep the current selection.
    fn click(&mut self, x: f32, y: f32, ctx: &EngineContext) {
        let Some(system) = &self.system else { return };
        let (origin, dir) = ctx.camera.screen_ray(x, y);
        if let Some(name) = system.pick(&ctx.scene, origin, dir).and_then(|i| system.planet_name(i)) {
            let name = name.to_owned();
            if let Err(e) = self.state.select_body(Some(&name), &self.catalog) {
                log::warn!("pick rejected: {e}");
            }
        }
    }

    // ── Events ─────────────────────────────────────────────────────

    fn emit_events(&self, ctx: &mut EngineContext) {
        ctx.emit_event(GameEvent::new(
            EVENT_TIME_INFO,
            self.state.time_speed() as f32,
            self.clock.elapsed() as f32,
            flag(self.state.show_orbits()),
        ));

        let selected = self.state.selected_body().and_then(|n| {
            let index = self.catalog.planet_index(n)?;
            self.catalog.planet_at(index).map(|b| (index, b))
        });
        let (index, distance, moons) = match selected {
            Some((i, body)) => (i as f32, body.distance as f32, body.moons.len() as f32),
            None => (-1.0, 0.0, 0.0),
        };
        ctx.emit_event(GameEvent::new(EVENT_SELECTION, index, distance, moons));

        ctx.emit_event(GameEvent::new(
            EVENT_TRACKING,
            flag(self.tracker.is_transitioning()),
            ctx.camera.distance_to_target(),
            0.0,
        ));
    }
}

impl Default for SolarSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for SolarSystem {
    fn config(&self) -> GameConfig {
        GameConfig {
            fixed_dt: 1.0 / 60.0,
            max_events: 64,
            max_points: starfield::STAR_COUNT + starfield::OORT_COUNT,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        self.fixed_dt = self.config().fixed_dt;

        // ── Bodies ───────────────────────────────────────────────────
        self.system = Some(SolarSystemScene::build(&self.catalog, self.seed, ctx));

        // ── Background ───────────────────────────────────────────────
        ctx.points = starfield::background(self.seed.rotate_left(17));

        // ── Lighting ─────────────────────────────────────────────────
        ctx.lights.clear();
        let sun_color = Rgb::from_hex(SUN_LIGHT_COLOR).unwrap_or(Rgb::WHITE);
        ctx.lights.add(
            PointLight::new(Vec3::ZERO, sun_color, SUN_LIGHT_INTENSITY, SUN_LIGHT_DISTANCE)
                .with_decay(SUN_LIGHT_DECAY),
        );
        let ambient = Rgb::from_hex(AMBIENT_COLOR).unwrap_or(Rgb::WHITE);
        ctx.lights.set_ambient(ambient, AMBIENT_INTENSITY);

        self.tracker = CameraTracker::with_target(*self.tracker.config(), ctx.camera.target);
        log::info!(
            "solar system ready: {} nodes, {} background points",
            ctx.scene.len(),
            ctx.points.len()
        );
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        let dt = self.fixed_dt;

        // ── Handle input ─────────────────────────────────────────────
        for event in input.iter() {
            self.handle_input(*event, ctx);
        }

        // ── Advance time ─────────────────────────────────────────────
        let time_speed = self.state.time_speed();
        self.clock.advance(dt, time_speed);

        // ── Orbits ───────────────────────────────────────────────────
        let Some(system) = self.system.as_mut() else { return };
        system.advance(&self.clock, time_speed, dt, &mut ctx.graph, &mut ctx.scene);
        system.apply_visibility(&mut ctx.scene, self.state.show_orbits());

        // ── Camera ───────────────────────────────────────────────────
        let tracked = self.state.selected_body().and_then(|name| {
            let body = self.catalog.planet(name)?;
            let position = system.world_position(name, &ctx.scene)?;
            Some(TrackedBody { name, position, radius: body.radius as f32 })
        });
        self.tracker.update(tracked, &mut ctx.camera);
        ctx.controls.update(&mut ctx.camera);

        self.emit_events(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> (SolarSystem, EngineContext) {
        let mut game = SolarSystem::with_seed(7);
        let mut ctx = EngineContext::with_config(&game.config());
        game.init(&mut ctx);
        (game, ctx)
    }

    fn step(game: &mut SolarSystem, ctx: &mut EngineContext, events: &[InputEvent]) {
        let mut input = InputQueue::new();
        for e in events {
            input.push(*e);
        }
        ctx.clear_frame_data();
        game.update(ctx, &input);
    }

    fn custom(kind: u32, a: f32) -> InputEvent {
        InputEvent::Custom { kind, a, b: 0.0, c: 0.0 }
    }

    #[test]
    fn init_builds_scene_points_and_light() {
        let (game, ctx) = started();
        assert!(game.system().is_some());
        assert_eq!(ctx.points.len(), starfield::STAR_COUNT + starfield::OORT_COUNT);
        assert_eq!(ctx.lights.count(), 1);
        assert!(ctx.scene.find_by_tag("Neptune").is_some());
        assert!(ctx.scene.find_by_tag("Triton").is_some());
    }

    #[test]
    fn update_emits_three_events() {
        let (mut game, mut ctx) = started();
        step(&mut game, &mut ctx, &[]);
        let kinds: Vec<f32> = ctx.events.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EVENT_TIME_INFO, EVENT_SELECTION, EVENT_TRACKING]);
        assert_eq!(ctx.events[1].a, -1.0);
    }

    #[test]
    fn custom_events_drive_state() {
        let (mut game, mut ctx) = started();
        step(&mut game, &mut ctx, &[custom(1, 2.0), custom(2, 3.0), custom(3, 0.0)]);
        assert_eq!(game.state().selected_body(), Some("Earth"));
        assert_eq!(game.state().time_speed(), 3.0);
        assert!(!game.state().show_orbits());
        assert_eq!(ctx.events[1].a, 2.0);
        assert!(game.tracker().is_transitioning());

        step(&mut game, &mut ctx, &[custom(4, 0.0)]);
        assert_eq!(game.state().selected_body(), None);
    }

    #[test]
    fn nan_select_event_keeps_selection() {
        let (mut game, mut ctx) = started();
        step(&mut game, &mut ctx, &[custom(1, f32::NAN)]);
        assert_eq!(game.state().selected_body(), None);

        step(&mut game, &mut ctx, &[custom(1, 3.0), custom(1, f32::NAN)]);
        assert_eq!(game.state().selected_body(), Some("Mars"));
    }

    #[test]
    fn invalid_speed_event_is_ignored() {
        let (mut game, mut ctx) = started();
        step(&mut game, &mut ctx, &[custom(2, -4.0)]);
        assert_eq!(game.state().time_speed(), 1.0);
    }

    #[test]
    fn paused_clock_does_not_move_planets() {
        let (mut game, mut ctx) = started();
        game.set_time_speed(0.0).unwrap();
        step(&mut game, &mut ctx, &[]);
        let system = game.system().unwrap();
        let before = system.world_position("Jupiter", &ctx.scene).unwrap();
        for _ in 0..30 {
            step(&mut game, &mut ctx, &[]);
        }
        let after = game.system().unwrap().world_position("Jupiter", &ctx.scene).unwrap();
        assert_eq!(before, after);
        assert_eq!(game.clock().elapsed(), 0.0);
    }

    #[test]
    fn tracking_pulls_camera_toward_selection() {
        let (mut game, mut ctx) = started();
        game.set_time_speed(0.0).unwrap();
        game.select_body(Some("Jupiter")).unwrap();
        for _ in 0..900 {
            step(&mut game, &mut ctx, &[]);
        }
        let jupiter = game.system().unwrap().world_position("Jupiter", &ctx.scene).unwrap();
        let radius = game.catalog().planet("Jupiter").unwrap().radius as f32;
        let d = ctx.camera.position.distance(jupiter);
        assert!(!game.tracker().is_transitioning());
        assert!(d <= radius * 6.0 + 1.0 + 1e-2, "camera at {d}");
        assert!(ctx.camera.target.distance(jupiter) < 1e-2);
    }

    #[test]
    fn click_on_planet_selects_it() {
        let (mut game, mut ctx) = started();
        game.set_time_speed(0.0).unwrap();
        step(&mut game, &mut ctx, &[]);

        let saturn = game.system().unwrap().world_position("Saturn", &ctx.scene).unwrap();
        let ndc = (ctx.camera.projection_matrix() * ctx.camera.view_matrix()).project_point3(saturn);
        let x = (ndc.x + 1.0) * 0.5 * ctx.camera.viewport.x;
        let y = (1.0 - ndc.y) * 0.5 * ctx.camera.viewport.y;

        step(&mut game, &mut ctx, &[InputEvent::PointerDown { x, y }, InputEvent::PointerUp { x, y }]);
        assert_eq!(game.state().selected_body(), Some("Saturn"));
    }

    #[test]
    fn drag_does_not_select() {
        let (mut game, mut ctx) = started();
        step(
            &mut game,
            &mut ctx,
            &[
                InputEvent::PointerDown { x: 640.0, y: 360.0 },
                InputEvent::PointerMove { x: 700.0, y: 360.0 },
                InputEvent::PointerUp { x: 700.0, y: 360.0 },
            ],
        );
        assert_eq!(game.state().selected_body(), None);
    }

    #[test]
    fn selected_body_json_round_trip() {
        let (mut game, _) = started();
        assert_eq!(game.selected_body_json(), "null");
        game.select_body(Some("Mars")).unwrap();
        let v: serde_json::Value = serde_json::from_str(&game.selected_body_json()).unwrap();
        assert_eq!(v["name"], "Mars");
        assert_eq!(v["moons"].as_array().map(|m| m.len()), Some(2));
    }

    #[test]
    fn resize_event_updates_viewport() {
        let (mut game, mut ctx) = started();
        step(&mut game, &mut ctx, &[InputEvent::Custom { kind: 99, a: 1920.0, b: 1080.0, c: 0.0 }]);
        assert_eq!(ctx.camera.viewport.x, 1920.0);
    }
}
