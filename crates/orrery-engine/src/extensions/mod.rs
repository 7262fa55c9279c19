// extensions/mod.rs
//
// Optional extension modules for the engine.
// Decoupled from core Node/Scene; games opt in by creating these systems.

pub mod smoothing;
pub mod transform;

pub use smoothing::{lerp, lerp_vec3, approach};
pub use transform::{TransformGraph, LocalTransform};
