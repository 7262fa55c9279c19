/// Linear RGB color (0.0–1.0 per channel).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 1.0, g: 1.0, b: 1.0 };

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RRGGBB` (or `RRGGBB`) hex string.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let h = hex.trim().trim_start_matches('#');
        if h.len() != 6 || !h.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&h[0..2], 16).ok()?;
        let g = u8::from_str_radix(&h[2..4], 16).ok()?;
        let b = u8::from_str_radix(&h[4..6], 16).ok()?;
        Some(Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0))
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self { r: 0.6, g: 0.6, b: 0.8 }
    }
}

/// Mesh primitive understood by the host renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeshShape {
    /// Sphere centered on the node origin.
    Sphere { radius: f32 },
    /// Flat annulus in the node's local XZ plane.
    Ring { inner: f32, outer: f32 },
}

impl MeshShape {
    /// Wire code written into render instances.
    pub fn code(&self) -> f32 {
        match self {
            MeshShape::Sphere { .. } => 0.0,
            MeshShape::Ring { .. } => 1.0,
        }
    }

    /// The two size parameters (sphere: radius, 0; ring: inner, outer).
    pub fn extents(&self) -> (f32, f32) {
        match *self {
            MeshShape::Sphere { radius } => (radius, 0.0),
            MeshShape::Ring { inner, outer } => (inner, outer),
        }
    }
}

/// Renderable mesh attached to a node.
#[derive(Debug, Clone, Copy)]
pub struct MeshComponent {
    pub shape: MeshShape,
    /// Flat color; also the fallback when a texture is missing or failed.
    pub color: Rgb,
    /// HDR glow multiplier (0.0 = lit normally).
    pub emissive: f32,
    /// 1.0 = opaque. Anything lower is drawn in the transparent pass.
    pub opacity: f32,
}

impl Default for MeshComponent {
    fn default() -> Self {
        Self {
            shape: MeshShape::Sphere { radius: 1.0 },
            color: Rgb::default(),
            emissive: 0.0,
            opacity: 1.0,
        }
    }
}

impl MeshComponent {
    pub fn new(shape: MeshShape, color: Rgb) -> Self {
        Self {
            shape,
            color,
            ..Default::default()
        }
    }

    pub fn sphere(radius: f32, color: Rgb) -> Self {
        Self::new(MeshShape::Sphere { radius }, color)
    }

    pub fn ring(inner: f32, outer: f32, color: Rgb) -> Self {
        Self::new(MeshShape::Ring { inner, outer }, color)
    }

    pub fn with_emissive(mut self, emissive: f32) -> Self {
        self.emissive = emissive;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}
