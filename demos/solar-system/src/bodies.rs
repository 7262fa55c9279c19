/// Body catalog: the sun, eight planets, and their moons.
///
/// Loaded from embedded JSON and validated once. Distances and radii are
/// scene units chosen for readability, not to scale.

use std::collections::HashMap;

use orrery_engine::Rgb;
use serde::Deserialize;

use crate::error::CatalogError;

const EMBEDDED_CATALOG: &str = include_str!("../data/bodies.json");

/// Saturn-style ring: inner/outer radius as multiples of the planet radius.
pub const RING_INNER_FACTOR: f32 = 1.4;
pub const RING_OUTER_FACTOR: f32 = 2.2;
pub const RING_OPACITY: f32 = 0.8;

/// A planet or a moon. Moons leave the orbital-plane angles at zero and
/// never carry moons themselves.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    pub name: String,
    pub radius: f64,
    /// Orbital radius around the parent.
    pub distance: f64,
    /// Multiplier of simulated time, radians per unit.
    pub angular_speed: f64,
    /// Spin increment per tick at time speed 1.
    #[serde(default)]
    pub self_rotation_speed: f64,
    #[serde(default)]
    pub orbit_inclination_deg: f64,
    #[serde(default)]
    pub orbit_ascending_node_deg: f64,
    /// `#RRGGBB`, also the fallback when the texture fails.
    pub color: String,
    #[serde(default)]
    pub texture_url: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub has_rings: bool,
    #[serde(default)]
    pub ring_color: Option<String>,
    #[serde(default)]
    pub moons: Vec<Body>,
}

impl Body {
    /// Parsed flat color. Validated at load, so the fallback is never hit for catalog bodies.
    pub fn rgb(&self) -> Rgb {
        Rgb::from_hex(&self.color).unwrap_or_default()
    }

    pub fn ring_rgb(&self) -> Rgb {
        self.ring_color
            .as_deref()
            .and_then(Rgb::from_hex)
            .unwrap_or_else(|| self.rgb())
    }

    pub fn moon(&self, name: &str) -> Option<&Body> {
        self.moons.iter().find(|m| m.name == name)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SunData {
    pub name: String,
    pub radius: f64,
    pub color: String,
    /// Radians per simulated second.
    pub spin_rate: f64,
    #[serde(default)]
    pub texture_url: Option<String>,
}

impl SunData {
    pub fn rgb(&self) -> Rgb {
        Rgb::from_hex(&self.color).unwrap_or_default()
    }
}

impl Default for SunData {
    fn default() -> Self {
        Self {
            name: "Sun".to_string(),
            radius: 7.0,
            color: "#FDB813".to_string(),
            spin_rate: 0.05,
            texture_url: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(default)]
    sun: SunData,
    planets: Vec<Body>,
}

/// Immutable, validated body table with name lookup over planets.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    sun: SunData,
    planets: Vec<Body>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// The catalog compiled into the crate.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        Self::new(raw.sun, raw.planets)
    }

    pub fn new(sun: SunData, planets: Vec<Body>) -> Result<Self, CatalogError> {
        if planets.is_empty() {
            return Err(CatalogError::Empty);
        }
        check_positive(&sun.name, "radius", sun.radius)?;
        check_color(&sun.name, &sun.color)?;

        let mut index = HashMap::with_capacity(planets.len());
        for (i, planet) in planets.iter().enumerate() {
            validate_body(planet)?;
            if planet.orbit_inclination_deg.is_nan() || planet.orbit_ascending_node_deg.is_nan() {
                return Err(CatalogError::NotFinite { name: planet.name.clone(), field: "orbit plane" });
            }
            if let Some(ring) = &planet.ring_color {
                check_color(&planet.name, ring)?;
            }
            if index.insert(planet.name.clone(), i).is_some() {
                return Err(CatalogError::DuplicatePlanet(planet.name.clone()));
            }

            let mut seen: Vec<&str> = Vec::with_capacity(planet.moons.len());
            for moon in &planet.moons {
                validate_body(moon)?;
                if !moon.moons.is_empty() {
                    return Err(CatalogError::NestedMoons(moon.name.clone()));
                }
                if seen.contains(&moon.name.as_str()) {
                    return Err(CatalogError::DuplicateMoon {
                        planet: planet.name.clone(),
                        moon: moon.name.clone(),
                    });
                }
                seen.push(&moon.name);
            }
        }

        Ok(Self { sun, planets, index })
    }

    /// A catalog with a sun and nothing else. Used when the embedded data is unusable.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn sun(&self) -> &SunData {
        &self.sun
    }

    pub fn planets(&self) -> &[Body] {
        &self.planets
    }

    pub fn planet(&self, name: &str) -> Option<&Body> {
        self.index.get(name).map(|&i| &self.planets[i])
    }

    pub fn planet_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn planet_at(&self, index: usize) -> Option<&Body> {
        self.planets.get(index)
    }

    /// The planet a moon belongs to.
    pub fn moon_parent(&self, moon: &str) -> Option<&Body> {
        self.planets.iter().find(|p| p.moon(moon).is_some())
    }

    pub fn len(&self) -> usize {
        self.planets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planets.is_empty()
    }
}

fn validate_body(body: &Body) -> Result<(), CatalogError> {
    check_positive(&body.name, "radius", body.radius)?;
    check_positive(&body.name, "distance", body.distance)?;
    if !body.angular_speed.is_finite() {
        return Err(CatalogError::NotFinite { name: body.name.clone(), field: "angularSpeed" });
    }
    if !body.self_rotation_speed.is_finite() {
        return Err(CatalogError::NotFinite { name: body.name.clone(), field: "selfRotationSpeed" });
    }
    check_color(&body.name, &body.color)
}

fn check_positive(name: &str, field: &'static str, value: f64) -> Result<(), CatalogError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CatalogError::NonPositive { name: name.to_string(), field, value })
    }
}

fn check_color(name: &str, color: &str) -> Result<(), CatalogError> {
    match Rgb::from_hex(color) {
        Some(_) => Ok(()),
        None => Err(CatalogError::BadColor { name: name.to_string(), color: color.to_string() }),
    }
}
