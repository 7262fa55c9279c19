use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// Camera and orbit-control tuning. Arrays keep the JSON form plain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Initial eye position.
    pub position: [f32; 3],
    /// Initial look-at point.
    pub target: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
    /// Orbit controls: closest allowed eye-to-target distance.
    pub min_distance: f32,
    /// Orbit controls: farthest allowed eye-to-target distance.
    pub max_distance: f32,
    /// Drag sensitivity (1.0 = a full viewport-height drag turns 2π).
    pub rotate_speed: f32,
    /// Wheel sensitivity exponent applied to the 0.95 zoom step.
    pub zoom_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 60.0, 150.0],
            target: [0.0, 0.0, 0.0],
            fov_y_deg: 45.0,
            near: 0.1,
            far: 2000.0,
            min_distance: 5.0,
            max_distance: 500.0,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
        }
    }
}

/// Perspective camera. Y-up, right-handed, depth in [0, 1].
#[derive(Debug, Clone)]
pub struct Camera3D {
    /// Eye position in world space.
    pub position: Vec3,
    /// Look-at point in world space.
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view (radians).
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    /// Viewport size in CSS pixels.
    pub viewport: Vec2,
}

/// GPU-side uniform data for the camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    /// Eye position (w = 1).
    pub eye: [f32; 4],
}

impl CameraUniform {
    pub const FLOATS: usize = 36;
}

impl Default for Camera3D {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl Camera3D {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            position: Vec3::from_array(config.position),
            target: Vec3::from_array(config.target),
            up: Vec3::Y,
            fov_y: config.fov_y_deg.to_radians(),
            near: config.near,
            far: config.far,
            viewport: Vec2::new(1280.0, 720.0),
        }
    }

    pub fn aspect(&self) -> f32 {
        if self.viewport.y > 0.0 {
            self.viewport.x / self.viewport.y
        } else {
            1.0
        }
    }

    /// Resize the viewport (e.g. on canvas resize). Zero sizes are ignored.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.viewport = Vec2::new(width, height);
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect(), self.near, self.far)
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view: self.view_matrix().to_cols_array_2d(),
            projection: self.projection_matrix().to_cols_array_2d(),
            eye: self.position.extend(1.0).to_array(),
        }
    }

    /// Eye-to-target distance.
    pub fn distance_to_target(&self) -> f32 {
        self.position.distance(self.target)
    }

    /// World-space ray through a viewport pixel. Returns (origin, unit direction).
    pub fn screen_ray(&self, x: f32, y: f32) -> (Vec3, Vec3) {
        let ndc_x = 2.0 * x / self.viewport.x.max(1.0) - 1.0;
        let ndc_y = 1.0 - 2.0 * y / self.viewport.y.max(1.0);
        let inv = (self.projection_matrix() * self.view_matrix()).inverse();
        let far = inv.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));
        let dir = (far - self.position).normalize_or_zero();
        (self.position, dir)
    }
}

/// Pointer travel (pixels) before a press becomes a drag instead of a click.
const DRAG_THRESHOLD: f32 = 5.0;
/// Keeps the polar angle off the poles so `look_at` stays well defined.
const POLAR_EPS: f32 = 1e-3;
/// Multiplicative dolly per wheel step at zoom_speed 1.
const ZOOM_STEP: f32 = 0.95;

/// Drag-to-rotate / wheel-to-zoom controller orbiting `Camera3D::target`.
///
/// Input accumulates into pending deltas; `update` applies them, clamps the
/// distance, and re-aims the camera. It is always live, so a user can zoom or
/// rotate while something else is steering the camera.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub min_distance: f32,
    pub max_distance: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub enabled: bool,
    pending_azimuth: f32,
    pending_polar: f32,
    pending_scale: f32,
    dragging: bool,
    drag_moved: bool,
    drag_start: Vec2,
    last_pointer: Vec2,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl OrbitControls {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            min_distance: config.min_distance,
            max_distance: config.max_distance.max(config.min_distance),
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
            enabled: true,
            pending_azimuth: 0.0,
            pending_polar: 0.0,
            pending_scale: 1.0,
            dragging: false,
            drag_moved: false,
            drag_start: Vec2::ZERO,
            last_pointer: Vec2::ZERO,
        }
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.dragging = true;
        self.drag_moved = false;
        self.drag_start = Vec2::new(x, y);
        self.last_pointer = self.drag_start;
    }

    /// Rotate while dragging. `viewport_height` maps pixels to angles.
    pub fn pointer_move(&mut self, x: f32, y: f32, viewport_height: f32) {
        if !self.dragging || !self.enabled {
            return;
        }
        let p = Vec2::new(x, y);
        if p.distance(self.drag_start) > DRAG_THRESHOLD {
            self.drag_moved = true;
        }
        if self.drag_moved {
            let delta = p - self.last_pointer;
            let h = viewport_height.max(1.0);
            self.rotate(
                -TAU * delta.x / h * self.rotate_speed,
                -TAU * delta.y / h * self.rotate_speed,
            );
        }
        self.last_pointer = p;
    }

    /// End a press. Returns true if the gesture was a click (no drag).
    pub fn pointer_up(&mut self) -> bool {
        let was_click = self.dragging && !self.drag_moved;
        self.dragging = false;
        self.drag_moved = false;
        was_click
    }

    /// Wheel input: positive `delta_y` zooms out, negative zooms in.
    pub fn wheel(&mut self, delta_y: f32) {
        if !self.enabled || delta_y == 0.0 {
            return;
        }
        let step = ZOOM_STEP.powf(self.zoom_speed);
        if delta_y < 0.0 {
            self.dolly(step);
        } else {
            self.dolly(1.0 / step);
        }
    }

    /// Queue a rotation about the target (radians).
    pub fn rotate(&mut self, azimuth: f32, polar: f32) {
        self.pending_azimuth += azimuth;
        self.pending_polar += polar;
    }

    /// Queue a distance multiplier (< 1 moves closer).
    pub fn dolly(&mut self, scale: f32) {
        if scale.is_finite() && scale > 0.0 {
            self.pending_scale *= scale;
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging && self.drag_moved
    }

    /// Apply pending input and distance limits, keeping the camera aimed at its target.
    pub fn update(&mut self, camera: &mut Camera3D) {
        let offset = camera.position - camera.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            self.clear_pending();
            return;
        }

        let mut azimuth = offset.x.atan2(offset.z);
        let mut polar = (offset.y / radius).clamp(-1.0, 1.0).acos();

        azimuth += self.pending_azimuth;
        polar = (polar + self.pending_polar).clamp(POLAR_EPS, PI - POLAR_EPS);
        let radius = (radius * self.pending_scale).clamp(self.min_distance, self.max_distance);

        let sin_polar = polar.sin();
        let new_offset = Vec3::new(
            radius * sin_polar * azimuth.sin(),
            radius * polar.cos(),
            radius * sin_polar * azimuth.cos(),
        );
        camera.position = camera.target + new_offset;
        self.clear_pending();
    }

    fn clear_pending(&mut self) {
        self.pending_azimuth = 0.0;
        self.pending_polar = 0.0;
        self.pending_scale = 1.0;
    }
}
