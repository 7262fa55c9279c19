//! Error types for catalog loading, UI state changes, and tracker configuration.

use thiserror::Error;

/// Problems found while parsing or validating the body catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalog has no planets")]
    Empty,

    #[error("duplicate planet name: {0}")]
    DuplicatePlanet(String),

    #[error("duplicate moon '{moon}' under planet '{planet}'")]
    DuplicateMoon { planet: String, moon: String },

    #[error("body '{name}': {field} must be positive and finite, got {value}")]
    NonPositive { name: String, field: &'static str, value: f64 },

    #[error("body '{name}': invalid color '{color}'")]
    BadColor { name: String, color: String },

    #[error("moon '{0}' has moons of its own")]
    NestedMoons(String),

    #[error("body '{name}': {field} must be finite")]
    NotFinite { name: String, field: &'static str },
}

/// Rejected UI input. State is left unchanged.
#[derive(Error, Debug, PartialEq)]
pub enum StateError {
    #[error("unknown body: {0}")]
    UnknownBody(String),

    #[error("moon '{moon}' of {planet} cannot be selected")]
    MoonNotSelectable { moon: String, planet: String },

    #[error("invalid time speed: {0}")]
    InvalidTimeSpeed(f64),

    #[error("planet index out of range: {0}")]
    IndexOutOfRange(i32),
}

/// Invalid camera-tracker tuning.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("tracker config JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("smoothing factors must satisfy 0 < alpha_zoom < alpha_target <= 1 (got zoom {zoom}, target {target})")]
    Smoothing { target: f32, zoom: f32 },

    #[error("view distance factor must be positive, got {0}")]
    ViewDistance(f32),

    #[error("arrival slack must be non-negative, got {0}")]
    ArrivalSlack(f32),
}
