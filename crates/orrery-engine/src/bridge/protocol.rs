/// SharedArrayBuffer layout.
/// Must stay in sync with TypeScript `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Instances: max_instances × 16 floats]
/// [Events: max_events × 4 floats]
/// [Camera: 36 floats (view, projection, eye)]
/// [Lights: max_lights × 12 floats]
/// [Points: max_points × 8 floats]
/// ```
///
/// Capacities are written once into the header at init.
/// TypeScript reads them from the header to compute offsets dynamically.

use crate::api::game::GameConfig;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_INSTANCES: usize = 2;
pub const HEADER_INSTANCE_COUNT: usize = 3;
pub const HEADER_TRANSPARENT_SPLIT: usize = 4;
pub const HEADER_MAX_EVENTS: usize = 5;
pub const HEADER_EVENT_COUNT: usize = 6;
pub const HEADER_MAX_LIGHTS: usize = 7;
pub const HEADER_LIGHT_COUNT: usize = 8;
pub const HEADER_MAX_POINTS: usize = 9;
pub const HEADER_POINT_COUNT: usize = 10;
pub const HEADER_PROTOCOL_VERSION: usize = 11;
pub const HEADER_AMBIENT_R: usize = 12;
pub const HEADER_AMBIENT_G: usize = 13;
pub const HEADER_AMBIENT_B: usize = 14;
pub const HEADER_POINTS_DIRTY: usize = 15;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per body instance (wire format, never changes).
pub const INSTANCE_FLOATS: usize = 16;

/// Floats per game event: kind, a, b, c (wire format, never changes).
pub const EVENT_FLOATS: usize = 4;

/// Floats in the camera block: view (16) + projection (16) + eye (4).
pub const CAMERA_FLOATS: usize = 36;

/// Floats per point light: x, y, z, intensity, r, g, b, distance, decay, pad×3.
pub const LIGHT_FLOATS: usize = 12;

/// Floats per background point: x, y, z, size, r, g, b, alpha.
pub const POINT_FLOATS: usize = 8;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_instances: usize,
    pub max_events: usize,
    pub max_lights: usize,
    pub max_points: usize,

    pub instance_data_floats: usize,
    pub event_data_floats: usize,
    pub light_data_floats: usize,
    pub point_data_floats: usize,

    /// Offset (in floats) where instance data begins.
    pub instance_data_offset: usize,
    pub event_data_offset: usize,
    pub camera_data_offset: usize,
    pub light_data_offset: usize,
    pub point_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_instances: usize, max_events: usize, max_lights: usize, max_points: usize) -> Self {
        let instance_data_floats = max_instances * INSTANCE_FLOATS;
        let event_data_floats = max_events * EVENT_FLOATS;
        let light_data_floats = max_lights * LIGHT_FLOATS;
        let point_data_floats = max_points * POINT_FLOATS;

        let instance_data_offset = HEADER_FLOATS;
        let event_data_offset = instance_data_offset + instance_data_floats;
        let camera_data_offset = event_data_offset + event_data_floats;
        let light_data_offset = camera_data_offset + CAMERA_FLOATS;
        let point_data_offset = light_data_offset + light_data_floats;

        let buffer_total_floats = point_data_offset + point_data_floats;

        Self {
            max_instances,
            max_events,
            max_lights,
            max_points,
            instance_data_floats,
            event_data_floats,
            light_data_floats,
            point_data_floats,
            instance_data_offset,
            event_data_offset,
            camera_data_offset,
            light_data_offset,
            point_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    /// Compute layout from a GameConfig.
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.max_instances, config.max_events, config.max_lights, config.max_points)
    }

    /// Header with capacities and version filled in; counts zeroed.
    pub fn initial_header(&self) -> [f32; HEADER_FLOATS] {
        let mut header = [0.0; HEADER_FLOATS];
        header[HEADER_MAX_INSTANCES] = self.max_instances as f32;
        header[HEADER_MAX_EVENTS] = self.max_events as f32;
        header[HEADER_MAX_LIGHTS] = self.max_lights as f32;
        header[HEADER_MAX_POINTS] = self.max_points as f32;
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::camera::CameraUniform;
    use crate::renderer::instance::{BodyInstance, PointInstance};

    #[test]
    fn wire_sizes_match_types() {
        assert_eq!(INSTANCE_FLOATS, BodyInstance::FLOATS);
        assert_eq!(POINT_FLOATS, PointInstance::FLOATS);
        assert_eq!(CAMERA_FLOATS, CameraUniform::FLOATS);
        assert_eq!(std::mem::size_of::<CameraUniform>(), CAMERA_FLOATS * 4);
    }

    #[test]
    fn custom_capacities_compute_correctly() {
        let layout = ProtocolLayout::new(256, 32, 4, 8192);

        assert_eq!(layout.instance_data_floats, 256 * 16);
        assert_eq!(layout.event_data_floats, 32 * 4);
        assert_eq!(layout.light_data_floats, 4 * 12);
        assert_eq!(layout.point_data_floats, 8192 * 8);

        let expected_total = HEADER_FLOATS + 256 * 16 + 32 * 4 + CAMERA_FLOATS + 4 * 12 + 8192 * 8;
        assert_eq!(layout.buffer_total_floats, expected_total);
        assert_eq!(layout.buffer_total_bytes, expected_total * 4);
    }

    #[test]
    fn offsets_are_contiguous() {
        let layout = ProtocolLayout::from_config(&GameConfig::default());

        assert_eq!(layout.instance_data_offset, HEADER_FLOATS);
        assert_eq!(layout.event_data_offset, layout.instance_data_offset + layout.instance_data_floats);
        assert_eq!(layout.camera_data_offset, layout.event_data_offset + layout.event_data_floats);
        assert_eq!(layout.light_data_offset, layout.camera_data_offset + CAMERA_FLOATS);
        assert_eq!(layout.point_data_offset, layout.light_data_offset + layout.light_data_floats);
        assert_eq!(layout.buffer_total_floats, layout.point_data_offset + layout.point_data_floats);
    }

    #[test]
    fn initial_header_carries_capacities() {
        let layout = ProtocolLayout::new(10, 20, 3, 40);
        let header = layout.initial_header();
        assert_eq!(header[HEADER_MAX_INSTANCES], 10.0);
        assert_eq!(header[HEADER_MAX_EVENTS], 20.0);
        assert_eq!(header[HEADER_MAX_LIGHTS], 3.0);
        assert_eq!(header[HEADER_MAX_POINTS], 40.0);
        assert_eq!(header[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);
        assert_eq!(header[HEADER_INSTANCE_COUNT], 0.0);
    }
}
