//! Solar system definitions stored as RON.
//!
//! A definition is a list of body records. Angles are written in degrees and
//! periods in days, the way ephemeris tables usually quote them; they are
//! converted to radians and seconds on load. Parent names may refer to bodies
//! further down the list.

use std::collections::HashMap;
use std::path::Path;

use orrery_math::{days_to_seconds, format_distance};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::body::{Body, BodyIndex, Spin};
use crate::elements::{ElementSet, OrbitalElements};
use crate::error::{ConfigLoadError, ElementError};
use crate::system::SolarSystem;

/// Root of a solar system file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SystemRecord {
    pub bodies: Vec<BodyRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyRecord {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    /// Metres.
    pub radius: f64,
    pub orbit: OrbitRecord,
    #[serde(default)]
    pub spin: Option<SpinRecord>,
}

/// Orbital elements as written in the file. Angles in degrees.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrbitRecord {
    /// Metres.
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    #[serde(default)]
    pub inclination: f64,
    #[serde(default)]
    pub longitude_ascending_node: f64,
    #[serde(default)]
    pub argument_periapsis: f64,
    #[serde(default)]
    pub mean_anomaly_epoch: f64,
    pub rate: OrbitalRate,
    /// Reference epoch in simulated seconds.
    #[serde(default)]
    pub epoch: f64,
}

/// How fast a body goes around its orbit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum OrbitalRate {
    /// Orbital period in days.
    Period(f64),
    /// Mean motion in degrees per day.
    MeanMotion(f64),
}

impl OrbitalRate {
    /// Orbital period in seconds.
    fn period_seconds(self) -> Result<f64, ElementError> {
        match self {
            Self::Period(days) => Ok(days_to_seconds(days)),
            Self::MeanMotion(deg_per_day) if deg_per_day > 0.0 => {
                Ok(days_to_seconds(360.0 / deg_per_day))
            }
            Self::MeanMotion(deg_per_day) if deg_per_day.is_nan() => Err(ElementError::NonFinite {
                field: "mean_motion",
            }),
            Self::MeanMotion(deg_per_day) => Err(ElementError::NonPositivePeriod(deg_per_day)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpinRecord {
    /// Degrees.
    #[serde(default)]
    pub axial_tilt: f64,
    /// Sidereal days. Negative for retrograde rotation.
    pub rotation_period: f64,
}

impl OrbitRecord {
    fn to_element_set(&self) -> Result<ElementSet, ElementError> {
        Ok(ElementSet {
            semi_major_axis: self.semi_major_axis,
            eccentricity: self.eccentricity,
            inclination: self.inclination.to_radians(),
            longitude_ascending: self.longitude_ascending_node.to_radians(),
            argument_periapsis: self.argument_periapsis.to_radians(),
            mean_anomaly_epoch: self.mean_anomaly_epoch.to_radians(),
            orbital_period: self.rate.period_seconds()?,
            epoch: self.epoch,
        })
    }
}

impl SpinRecord {
    fn to_spin(self) -> Result<Spin, &'static str> {
        if !self.axial_tilt.is_finite() {
            return Err("axial tilt must be finite");
        }
        if !self.rotation_period.is_finite() || self.rotation_period == 0.0 {
            return Err("rotation period must be finite and non-zero");
        }
        Ok(Spin {
            axial_tilt: self.axial_tilt.to_radians(),
            rotation_period: days_to_seconds(self.rotation_period),
        })
    }
}

impl SystemRecord {
    /// Validate every record, resolve parent names and build the system.
    pub fn into_system(self) -> Result<SolarSystem, ConfigLoadError> {
        let mut indices: HashMap<&str, usize> = HashMap::with_capacity(self.bodies.len());
        for (index, record) in self.bodies.iter().enumerate() {
            if indices.insert(record.name.as_str(), index).is_some() {
                return Err(ConfigLoadError::DuplicateBody {
                    name: record.name.clone(),
                });
            }
        }

        let mut bodies = Vec::with_capacity(self.bodies.len());
        for record in &self.bodies {
            let parent = match &record.parent {
                Some(parent) => match indices.get(parent.as_str()) {
                    Some(&index) => Some(BodyIndex(index)),
                    None => {
                        return Err(ConfigLoadError::UnknownParent {
                            body: record.name.clone(),
                            parent: parent.clone(),
                        });
                    }
                },
                None => None,
            };
            bodies.push(build_body(record, parent)?);
        }

        let system = SolarSystem::new(bodies)?;
        info!(bodies = system.len(), "Solar system loaded");
        Ok(system)
    }
}

fn build_body(record: &BodyRecord, parent: Option<BodyIndex>) -> Result<Body, ConfigLoadError> {
    if !record.radius.is_finite() || record.radius <= 0.0 {
        return Err(ConfigLoadError::InvalidRadius {
            body: record.name.clone(),
            radius: record.radius,
        });
    }

    let invalid = |source| ConfigLoadError::InvalidElements {
        body: record.name.clone(),
        source,
    };
    let set = record.orbit.to_element_set().map_err(invalid)?;
    let elements = OrbitalElements::new(set).map_err(invalid)?;

    debug!(
        body = %record.name,
        parent = record.parent.as_deref().unwrap_or("-"),
        semi_major_axis = %format_distance(elements.semi_major_axis()),
        eccentricity = elements.eccentricity(),
        "Loaded body"
    );

    let mut body = Body::new(record.name.clone(), elements, record.radius);
    if let Some(parent) = parent {
        body = body.with_parent(parent);
    }
    if let Some(spin) = record.spin {
        let spin = spin.to_spin().map_err(|reason| ConfigLoadError::InvalidSpin {
            body: record.name.clone(),
            reason,
        })?;
        body = body.with_spin(spin);
    }
    Ok(body)
}

/// Parse a solar system definition from RON text.
pub fn parse_solar_system(text: &str) -> Result<SolarSystem, ConfigLoadError> {
    let record: SystemRecord = ron::from_str(text)?;
    record.into_system()
}

/// Read and parse a solar system definition file.
pub fn load_solar_system(path: &Path) -> Result<SolarSystem, ConfigLoadError> {
    info!(path = %path.display(), "Loading solar system");
    let text = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_solar_system(&text)
}
