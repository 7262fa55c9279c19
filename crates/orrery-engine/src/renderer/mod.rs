pub mod camera;
pub mod instance;

pub use camera::{Camera3D, CameraConfig, CameraUniform, OrbitControls};
pub use instance::{BodyInstance, MaterialState, PointInstance, RenderBuffer};
