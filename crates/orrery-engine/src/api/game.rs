use crate::api::types::{GameEvent, NodeId};
use crate::assets::registry::TextureRegistry;
use crate::core::scene::Scene;
use crate::extensions::transform::TransformGraph;
use crate::input::queue::InputQueue;
use crate::renderer::camera::{Camera3D, CameraConfig, OrbitControls};
use crate::renderer::instance::{PointInstance, RenderBuffer};
use crate::systems::lighting::LightState;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Maximum number of body instances (default: 256).
    pub max_instances: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
    /// Maximum number of point lights (default: 4).
    pub max_lights: usize,
    /// Maximum number of background points (default: 8192).
    pub max_points: usize,
    /// Initial camera and orbit-control limits.
    pub camera: CameraConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_instances: 256,
            max_events: 32,
            max_lights: 4,
            max_points: 8192,
            camera: CameraConfig::default(),
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, spawn nodes, configure the scene.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One fixed step. Input is non-empty only on the first step of a frame.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Optional read-only render pass for custom render commands.
    fn render(&self, _ctx: &mut RenderContext) {}
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub graph: TransformGraph,
    pub camera: Camera3D,
    pub controls: OrbitControls,
    pub textures: TextureRegistry,
    pub lights: LightState,
    /// Static background points (stars, dust). Written once at init.
    pub points: Vec<PointInstance>,
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::with_config(&GameConfig::default())
    }

    pub fn with_config(config: &GameConfig) -> Self {
        Self {
            scene: Scene::new(),
            graph: TransformGraph::new(),
            camera: Camera3D::from_config(&config.camera),
            controls: OrbitControls::from_config(&config.camera),
            textures: TextureRegistry::new(),
            lights: LightState::new(),
            points: Vec::new(),
            events: Vec::with_capacity(config.max_events),
            next_id: 1,
        }
    }

    /// Generate the next unique node ID.
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Emit a game event to be forwarded to TypeScript.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear per-frame transient data.
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Render context for optional custom render commands.
pub struct RenderContext<'a> {
    pub render_buffer: &'a mut RenderBuffer,
    pub camera: &'a Camera3D,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut ctx = EngineContext::new();
        let a = ctx.next_id();
        let b = ctx.next_id();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn events_clear_each_frame() {
        let mut ctx = EngineContext::new();
        ctx.emit_event(GameEvent::new(1.0, 0.0, 0.0, 0.0));
        assert_eq!(ctx.events.len(), 1);
        ctx.clear_frame_data();
        assert!(ctx.events.is_empty());
    }

    #[test]
    fn context_uses_camera_config() {
        let config = GameConfig {
            camera: CameraConfig { position: [0.0, 10.0, 20.0], min_distance: 2.0, ..Default::default() },
            ..Default::default()
        };
        let ctx = EngineContext::with_config(&config);
        assert_eq!(ctx.camera.position.y, 10.0);
        assert_eq!(ctx.controls.min_distance, 2.0);
    }
}
