use bytemuck::{Pod, Zeroable};
use glam::{Quat, Vec3};

use crate::assets::registry::TextureSlot;
use crate::components::mesh::{MeshComponent, Rgb};

/// Which surface the renderer should draw for an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialState {
    /// No texture was ever requested: draw the flat color.
    Flat,
    /// Texture still loading: draw the placeholder.
    Pending,
    /// Texture loaded: sample the slot.
    Textured(TextureSlot),
    /// Texture failed to load: draw the flat color.
    Fallback,
}

impl MaterialState {
    /// Wire encoding: slot index (>= 0) when textured, negative codes otherwise.
    pub fn encode(self) -> f32 {
        match self {
            MaterialState::Flat => -1.0,
            MaterialState::Pending => -2.0,
            MaterialState::Fallback => -3.0,
            MaterialState::Textured(slot) => slot.0 as f32,
        }
    }

    pub fn decode(value: f32) -> Self {
        if value >= 0.0 {
            MaterialState::Textured(TextureSlot(value as u32))
        } else if value == -2.0 {
            MaterialState::Pending
        } else if value == -3.0 {
            MaterialState::Fallback
        } else {
            MaterialState::Flat
        }
    }
}

/// Per-instance render data written to SharedArrayBuffer for the TypeScript renderer.
/// Must match the TypeScript protocol: 16 floats = 64 bytes stride (four vec4s).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct BodyInstance {
    /// World position.
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Sphere radius, or ring inner radius.
    pub size_a: f32,
    /// World rotation quaternion (x, y, z, w).
    pub qx: f32,
    pub qy: f32,
    pub qz: f32,
    pub qw: f32,
    /// Flat/fallback color.
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub opacity: f32,
    /// Ring outer radius (0 for spheres).
    pub size_b: f32,
    /// HDR glow multiplier.
    pub emissive: f32,
    /// `MeshShape::code`.
    pub shape: f32,
    /// `MaterialState::encode`.
    pub material: f32,
}

impl BodyInstance {
    pub const FLOATS: usize = 16;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn new(position: Vec3, rotation: Quat, mesh: &MeshComponent, material: MaterialState) -> Self {
        let (size_a, size_b) = mesh.shape.extents();
        let Rgb { r, g, b } = mesh.color;
        Self {
            x: position.x,
            y: position.y,
            z: position.z,
            size_a,
            qx: rotation.x,
            qy: rotation.y,
            qz: rotation.z,
            qw: rotation.w,
            r,
            g,
            b,
            opacity: mesh.opacity,
            size_b,
            emissive: mesh.emissive,
            shape: mesh.shape.code(),
            material: material.encode(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_xyzw(self.qx, self.qy, self.qz, self.qw)
    }

    pub fn material_state(&self) -> MaterialState {
        MaterialState::decode(self.material)
    }
}

/// A background point (star or Oort-cloud particle). 8 floats = 32 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct PointInstance {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Point size in pixels.
    pub size: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub alpha: f32,
}

impl PointInstance {
    pub const FLOATS: usize = 8;

    pub fn new(position: Vec3, size: f32, color: Rgb, alpha: f32) -> Self {
        Self {
            x: position.x,
            y: position.y,
            z: position.z,
            size,
            r: color.r,
            g: color.g,
            b: color.b,
            alpha,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// Render buffer containing all body instances.
pub struct RenderBuffer {
    /// Opaque instances first, then transparent ones starting at `transparent_split`.
    pub instances: Vec<BodyInstance>,
    /// Index of the first transparent instance.
    pub transparent_split: u32,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            transparent_split: 0,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.transparent_split = 0;
    }

    pub fn push(&mut self, instance: BodyInstance) {
        self.instances.push(instance);
    }

    pub fn set_transparent_split(&mut self, split: u32) {
        self.transparent_split = split;
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Raw pointer to instance data for SharedArrayBuffer reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}
