//! Simulation-wide settings mutated by UI input.

use serde::Serialize;

use crate::bodies::Catalog;
use crate::error::StateError;

/// Slider maximum for the time multiplier.
pub const MAX_TIME_SPEED: f64 = 10.0;

// ── Custom event kinds from the UI ───────────────────────────────────

const CUSTOM_SELECT_PLANET: u32 = 1;
const CUSTOM_SET_SPEED: u32 = 2;
const CUSTOM_SET_ORBITS: u32 = 3;
const CUSTOM_CLEAR_SELECTION: u32 = 4;
/// Viewport resize (sent by the worker as kind=99).
const CUSTOM_RESIZE: u32 = 99;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationState {
    time_speed: f64,
    show_orbits: bool,
    selected_body: Option<String>,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            time_speed: 1.0,
            show_orbits: true,
            selected_body: None,
        }
    }
}

impl SimulationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a planet by name, or clear with `None`. Moons and unknown names
    /// are rejected and the current selection is kept.
    pub fn select_body(&mut self, name: Option<&str>, catalog: &Catalog) -> Result<(), StateError> {
        let Some(name) = name else {
            self.selected_body = None;
            return Ok(());
        };
        if catalog.planet(name).is_some() {
            if self.selected_body.as_deref() != Some(name) {
                log::info!("selected {name}");
            }
            self.selected_body = Some(name.to_owned());
            return Ok(());
        }
        match catalog.moon_parent(name) {
            Some(planet) => Err(StateError::MoonNotSelectable {
                moon: name.to_owned(),
                planet: planet.name.clone(),
            }),
            None => Err(StateError::UnknownBody(name.to_owned())),
        }
    }

    /// Select by catalog index; a negative index clears the selection.
    pub fn select_index(&mut self, index: i32, catalog: &Catalog) -> Result<(), StateError> {
        if index < 0 {
            self.selected_body = None;
            return Ok(());
        }
        let planet = catalog
            .planet_at(index as usize)
            .ok_or(StateError::IndexOutOfRange(index))?;
        let name = planet.name.clone();
        self.select_body(Some(&name), catalog)
    }

    /// Accepts any finite non-negative value; anything above the slider range is clamped.
    pub fn set_time_speed(&mut self, speed: f64) -> Result<(), StateError> {
        if !speed.is_finite() || speed < 0.0 {
            return Err(StateError::InvalidTimeSpeed(speed));
        }
        self.time_speed = speed.min(MAX_TIME_SPEED);
        Ok(())
    }

    pub fn set_show_orbits(&mut self, show: bool) {
        self.show_orbits = show;
    }

    pub fn time_speed(&self) -> f64 {
        self.time_speed
    }

    pub fn show_orbits(&self) -> bool {
        self.show_orbits
    }

    pub fn selected_body(&self) -> Option<&str> {
        self.selected_body.as_deref()
    }

    /// Descriptive record for the info panel.
    pub fn selected_info(&self, catalog: &Catalog) -> Option<SelectedBodyInfo> {
        let body = catalog.planet(self.selected_body.as_deref()?)?;
        Some(SelectedBodyInfo {
            name: body.name.clone(),
            description: body.description.clone(),
            distance: body.distance,
            radius: body.radius,
            moons: body.moons.iter().map(|m| m.name.clone()).collect(),
            has_rings: body.has_rings,
        })
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedBodyInfo {
    pub name: String,
    pub description: String,
    pub distance: f64,
    pub radius: f64,
    pub moons: Vec<String>,
    pub has_rings: bool,
}

/// A decoded `InputEvent::Custom` from the UI layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiCommand {
    /// Negative index clears.
    SelectPlanet(i32),
    SetTimeSpeed(f64),
    SetShowOrbits(bool),
    ClearSelection,
    Resize { width: f32, height: f32 },
}

impl UiCommand {
    /// `None` for unknown kinds and for non-finite payloads where an index,
    /// flag or size is expected. Speeds pass through; the state rejects them.
    pub fn decode(kind: u32, a: f32, b: f32, _c: f32) -> Option<Self> {
        match kind {
            CUSTOM_SELECT_PLANET if a.is_finite() => Some(Self::SelectPlanet(a.round() as i32)),
            CUSTOM_SET_SPEED => Some(Self::SetTimeSpeed(a as f64)),
            CUSTOM_SET_ORBITS if a.is_finite() => Some(Self::SetShowOrbits(a != 0.0)),
            CUSTOM_CLEAR_SELECTION => Some(Self::ClearSelection),
            CUSTOM_RESIZE if a.is_finite() && b.is_finite() => Some(Self::Resize { width: a, height: b }),
            _ => None,
        }
    }
}
