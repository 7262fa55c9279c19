//! Camera follow/zoom controller.
//!
//! Runs once per tick after the scene has propagated and before the orbit
//! controls re-aim the camera. It owns the look-at target; the camera
//! position is only touched while a tracking transition is in progress.

use glam::Vec3;
use orrery_engine::{approach, Camera3D};
use serde::Deserialize;

use crate::error::ConfigError;

/// Smoothing and arrival tuning.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackerConfig {
    /// Per-tick lerp factor for the look-at target.
    pub alpha_target: f32,
    /// Per-tick lerp factor for the camera position during a transition.
    pub alpha_zoom: f32,
    /// Viewing distance in body radii.
    pub view_distance_factor: f32,
    /// Distance beyond the viewing distance at which a transition ends.
    pub arrival_slack: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            alpha_target: 0.1,
            alpha_zoom: 0.05,
            view_distance_factor: 6.0,
            arrival_slack: 1.0,
        }
    }
}

impl TrackerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Zoom must settle slower than the target so the camera never leads the aim point.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (target, zoom) = (self.alpha_target, self.alpha_zoom);
        if !(zoom > 0.0 && zoom < target && target <= 1.0) {
            return Err(ConfigError::Smoothing { target, zoom });
        }
        if !(self.view_distance_factor > 0.0 && self.view_distance_factor.is_finite()) {
            return Err(ConfigError::ViewDistance(self.view_distance_factor));
        }
        if !(self.arrival_slack >= 0.0 && self.arrival_slack.is_finite()) {
            return Err(ConfigError::ArrivalSlack(self.arrival_slack));
        }
        Ok(())
    }
}

/// The selected body as seen this tick.
#[derive(Debug, Clone, Copy)]
pub struct TrackedBody<'a> {
    pub name: &'a str,
    pub position: Vec3,
    pub radius: f32,
}

#[derive(Debug, Clone)]
pub struct CameraTracker {
    config: TrackerConfig,
    target: Vec3,
    is_transitioning: bool,
    last_selected: Option<String>,
}

impl CameraTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self::with_target(config, Vec3::ZERO)
    }

    pub fn with_target(config: TrackerConfig, target: Vec3) -> Self {
        Self {
            config,
            target,
            is_transitioning: false,
            last_selected: None,
        }
    }

    /// One tick. `tracked = None` means free mode: the target drifts back to
    /// the origin and the camera is left to the user.
    pub fn update(&mut self, tracked: Option<TrackedBody<'_>>, camera: &mut Camera3D) {
        match tracked {
            None => {
                self.target = approach(self.target, Vec3::ZERO, self.config.alpha_target);
                self.last_selected = None;
            }
            Some(body) => {
                self.target = approach(self.target, body.position, self.config.alpha_target);

                if self.last_selected.as_deref() != Some(body.name) {
                    log::debug!("tracking {}: transition started", body.name);
                    self.is_transitioning = true;
                    self.last_selected = Some(body.name.to_owned());
                } else if self.is_transitioning {
                    self.zoom_toward(body, camera);
                }
            }
        }
        camera.target = self.target;
    }

    fn zoom_toward(&mut self, body: TrackedBody<'_>, camera: &mut Camera3D) {
        let min_distance = body.radius * self.config.view_distance_factor;
        let offset = camera.position - body.position;
        let current = offset.length();

        if current > min_distance + self.config.arrival_slack {
            let dir = offset.try_normalize().unwrap_or(Vec3::Z);
            let goal = body.position + dir * min_distance;
            camera.position = approach(camera.position, goal, self.config.alpha_zoom);
        } else {
            log::debug!("tracking {}: arrived at {:.1}", body.name, current);
            self.is_transitioning = false;
        }
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn is_transitioning(&self) -> bool {
        self.is_transitioning
    }

    pub fn last_selected(&self) -> Option<&str> {
        self.last_selected.as_deref()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }
}

impl Default for CameraTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_engine::CameraConfig;

    fn camera() -> Camera3D {
        Camera3D::from_config(&CameraConfig::default())
    }

    fn body(name: &str, position: Vec3, radius: f32) -> TrackedBody<'_> {
        TrackedBody { name, position, radius }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(TrackerConfig::default().validate().is_ok());
    }

    #[test]
    fn zoom_must_be_slower_than_target() {
        let cfg = TrackerConfig { alpha_zoom: 0.2, ..TrackerConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::Smoothing { .. })));
        let cfg = TrackerConfig { alpha_zoom: 0.0, ..TrackerConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn from_json_fills_missing_fields() {
        let cfg = TrackerConfig::from_json(r#"{ "viewDistanceFactor": 8 }"#).unwrap();
        assert_eq!(cfg.view_distance_factor, 8.0);
        assert_eq!(cfg.alpha_target, 0.1);
        assert!(matches!(
            TrackerConfig::from_json(r#"{ "arrivalSlack": -1 }"#),
            Err(ConfigError::ArrivalSlack(_))
        ));
        assert!(matches!(TrackerConfig::from_json("nope"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn converges_on_stationary_body() {
        let mut cam = camera();
        let mut tracker = CameraTracker::default();
        let p = Vec3::new(30.0, 0.0, 0.0);

        for _ in 0..600 {
            tracker.update(Some(body("Earth", p, 4.5)), &mut cam);
        }
        let d = cam.position.distance(p);
        assert!(!tracker.is_transitioning());
        assert!(d >= 27.0 - 1e-3 && d <= 28.0, "distance = {d}");
        assert!(tracker.target().distance(p) < 1e-3);
        assert_eq!(cam.target, tracker.target());
    }

    #[test]
    fn stays_transitioning_while_far() {
        let mut cam = camera();
        let mut tracker = CameraTracker::default();
        let p = Vec3::new(30.0, 0.0, 0.0);

        let mut released = false;
        for _ in 0..1000 {
            tracker.update(Some(body("Earth", p, 4.5)), &mut cam);
            let d = cam.position.distance(p);
            if !tracker.is_transitioning() {
                assert!(d <= 28.0, "released at {d}");
                released = true;
                break;
            }
            assert!(d > 27.0, "overshot to {d}");
        }
        assert!(released);
    }

    #[test]
    fn selection_change_restarts_transition() {
        let mut cam = camera();
        let mut tracker = CameraTracker::default();
        for _ in 0..600 {
            tracker.update(Some(body("Earth", Vec3::new(30.0, 0.0, 0.0), 4.5)), &mut cam);
        }
        assert!(!tracker.is_transitioning());

        tracker.update(Some(body("Mars", Vec3::new(-40.0, 0.0, 0.0), 3.5)), &mut cam);
        assert!(tracker.is_transitioning());
        assert_eq!(tracker.last_selected(), Some("Mars"));
    }

    #[test]
    fn change_tick_does_not_move_camera() {
        let mut cam = camera();
        let start = cam.position;
        let mut tracker = CameraTracker::default();
        tracker.update(Some(body("Earth", Vec3::new(30.0, 0.0, 0.0), 4.5)), &mut cam);
        assert_eq!(cam.position, start);
        tracker.update(Some(body("Earth", Vec3::new(30.0, 0.0, 0.0), 4.5)), &mut cam);
        assert_ne!(cam.position, start);
    }

    #[test]
    fn clearing_selection_returns_target_home() {
        let mut cam = camera();
        let mut tracker = CameraTracker::default();
        tracker.update(Some(body("Earth", Vec3::new(30.0, 0.0, 0.0), 4.5)), &mut cam);
        assert!(tracker.is_transitioning());

        let camera_before = cam.position;
        for _ in 0..200 {
            tracker.update(None, &mut cam);
        }
        assert!(tracker.target().length() < 1e-3);
        assert_eq!(tracker.last_selected(), None);
        // Free mode leaves the transition flag alone.
        assert!(tracker.is_transitioning());
        // Free mode never moves the camera itself.
        assert_eq!(cam.position, camera_before);
    }

    #[test]
    fn camera_inside_view_distance_releases() {
        let mut cam = camera();
        let p = Vec3::new(10.0, 0.0, 0.0);
        cam.position = p;
        let mut tracker = CameraTracker::default();
        for _ in 0..600 {
            tracker.update(Some(body("Venus", p, 4.0)), &mut cam);
        }
        // Already inside the viewing distance: the transition ends immediately.
        assert!(!tracker.is_transitioning());
        assert!(cam.position.is_finite());
    }
}
