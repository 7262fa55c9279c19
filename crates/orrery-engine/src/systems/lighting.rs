/// Point lights and ambient term for the 3D scene.
///
/// Lights are persistent: they stay until explicitly removed. The runner
/// publishes them each frame for the renderer's lighting pass.

use glam::Vec3;

use crate::components::mesh::Rgb;

/// A 3D point light.
///
/// Wire format (12 floats / 48 bytes, three vec4s):
/// `[x, y, z, intensity, r, g, b, distance, decay, pad, pad, pad]`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(C)]
pub struct PointLight {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub intensity: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// Cutoff distance (0 = infinite).
    pub distance: f32,
    /// Falloff exponent.
    pub decay: f32,
    _pad: [f32; 3],
}

impl PointLight {
    pub fn new(pos: Vec3, color: Rgb, intensity: f32, distance: f32) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            z: pos.z,
            intensity,
            r: color.r,
            g: color.g,
            b: color.b,
            distance,
            decay: 2.0,
            _pad: [0.0; 3],
        }
    }

    pub fn with_decay(mut self, decay: f32) -> Self {
        self.decay = decay;
        self
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Attenuation factor at `d` world units, following the renderer's
    /// `pow(saturate(1 - (d / distance)^4), decay)` cutoff curve.
    pub fn attenuation(&self, d: f32) -> f32 {
        if self.distance <= 0.0 {
            return 1.0;
        }
        let ratio = (d / self.distance).powi(4);
        (1.0 - ratio).clamp(0.0, 1.0).powf(self.decay)
    }
}

/// Active point lights plus the ambient term.
pub struct LightState {
    lights: Vec<PointLight>,
    ambient: Rgb,
    ambient_intensity: f32,
}

impl LightState {
    pub fn new() -> Self {
        Self {
            lights: Vec::new(),
            ambient: Rgb::WHITE,
            ambient_intensity: 1.0,
        }
    }

    pub fn add(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    pub fn clear(&mut self) {
        self.lights.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &PointLight> {
        self.lights.iter()
    }

    pub fn count(&self) -> usize {
        self.lights.len()
    }

    pub fn set_ambient(&mut self, color: Rgb, intensity: f32) {
        self.ambient = color;
        self.ambient_intensity = intensity;
    }

    /// Ambient color premultiplied by its intensity.
    pub fn ambient(&self) -> [f32; 3] {
        [
            self.ambient.r * self.ambient_intensity,
            self.ambient.g * self.ambient_intensity,
            self.ambient.b * self.ambient_intensity,
        ]
    }

    /// Pointer to the lights data for SAB serialization.
    pub fn buffer_ptr(&self) -> *const f32 {
        self.lights.as_ptr() as *const f32
    }
}

impl Default for LightState {
    fn default() -> Self {
        Self::new()
    }
}
