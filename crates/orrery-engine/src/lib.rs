pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod assets;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext, RenderContext};
pub use api::types::{NodeId, GameEvent};
pub use components::node::Node;
pub use components::mesh::{MeshComponent, MeshShape, Rgb};
pub use core::scene::Scene;
pub use core::time::{FixedTimestep, SimClock};
pub use core::rng::Rng;
pub use renderer::instance::{BodyInstance, MaterialState, PointInstance, RenderBuffer};
pub use renderer::camera::{Camera3D, CameraConfig, CameraUniform, OrbitControls};
pub use input::queue::{InputEvent, InputQueue};
pub use assets::manifest::{AssetManifest, TextureDescriptor};
pub use assets::registry::{AssetState, TextureRegistry, TextureSlot};
pub use bridge::protocol::ProtocolLayout;
pub use systems::lighting::{PointLight, LightState};
pub use systems::render::{build_render_buffer, material_for};

// Extensions: decoupled optional systems
pub use extensions::{lerp, lerp_vec3, approach, TransformGraph, LocalTransform};

// Math and POD crates, re-exported so bridge crates share one version.
pub use glam;
pub use bytemuck;
