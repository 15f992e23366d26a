//! Keplerian orbital elements.

use orrery_math::{DQuat, DVec3, normalize_angle, orbit_frame_rotation};

use crate::error::ElementError;
use crate::kepler::kepler_position_at_time;

/// Raw element values before validation. Angles in radians, times in seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementSet {
    /// Semi-major axis in metres. Zero pins the body to its parent.
    pub semi_major_axis: f64,
    /// Eccentricity in `[0, 1)`. 0 = circular orbit.
    pub eccentricity: f64,
    /// Inclination relative to the reference plane.
    pub inclination: f64,
    /// Longitude of the ascending node.
    pub longitude_ascending: f64,
    /// Argument of periapsis.
    pub argument_periapsis: f64,
    /// Mean anomaly at [`epoch`](Self::epoch).
    pub mean_anomaly_epoch: f64,
    /// Orbital period.
    pub orbital_period: f64,
    /// Reference epoch `t0` in simulated seconds.
    pub epoch: f64,
}

impl ElementSet {
    /// A circular, uninclined orbit starting at periapsis at `t = 0`.
    pub fn circular(radius: f64, orbital_period: f64) -> Self {
        Self {
            semi_major_axis: radius,
            eccentricity: 0.0,
            inclination: 0.0,
            longitude_ascending: 0.0,
            argument_periapsis: 0.0,
            mean_anomaly_epoch: 0.0,
            orbital_period,
            epoch: 0.0,
        }
    }
}

/// Validated, immutable Keplerian elements.
///
/// The rotation from the orbital plane into the reference frame is composed
/// once at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitalElements {
    set: ElementSet,
    frame: DQuat,
}

impl OrbitalElements {
    /// Validate `set` and precompute the orbital frame.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError`] when a value is not finite, the semi-major axis
    /// is negative, the eccentricity is outside `[0, 1)`, or the period is not
    /// positive.
    pub fn new(set: ElementSet) -> Result<Self, ElementError> {
        let fields = [
            ("semi_major_axis", set.semi_major_axis),
            ("eccentricity", set.eccentricity),
            ("inclination", set.inclination),
            ("longitude_ascending", set.longitude_ascending),
            ("argument_periapsis", set.argument_periapsis),
            ("mean_anomaly_epoch", set.mean_anomaly_epoch),
            ("orbital_period", set.orbital_period),
            ("epoch", set.epoch),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ElementError::NonFinite { field });
        }
        if set.semi_major_axis < 0.0 {
            return Err(ElementError::NegativeSemiMajorAxis(set.semi_major_axis));
        }
        if !(0.0..1.0).contains(&set.eccentricity) {
            return Err(ElementError::Eccentricity(set.eccentricity));
        }
        if set.orbital_period <= 0.0 {
            return Err(ElementError::NonPositivePeriod(set.orbital_period));
        }

        let frame = orbit_frame_rotation(
            set.longitude_ascending,
            set.inclination,
            set.argument_periapsis,
        );
        Ok(Self { set, frame })
    }

    /// The validated raw values.
    pub fn set(&self) -> &ElementSet {
        &self.set
    }

    pub fn semi_major_axis(&self) -> f64 {
        self.set.semi_major_axis
    }

    pub fn eccentricity(&self) -> f64 {
        self.set.eccentricity
    }

    pub fn orbital_period(&self) -> f64 {
        self.set.orbital_period
    }

    pub fn epoch(&self) -> f64 {
        self.set.epoch
    }

    /// Rotation from orbital-plane coordinates into the reference frame.
    pub fn frame(&self) -> DQuat {
        self.frame
    }

    /// Mean motion `n = 2π / period` in radians per second.
    pub fn mean_motion(&self) -> f64 {
        std::f64::consts::TAU / self.set.orbital_period
    }

    /// Mean anomaly at simulated time `t`, wrapped into `[0, 2π)`.
    pub fn mean_anomaly_at(&self, t: f64) -> f64 {
        normalize_angle(
            self.set.mean_anomaly_epoch
                + std::f64::consts::TAU * (t - self.set.epoch) / self.set.orbital_period,
        )
    }

    /// Position relative to the orbited focus at time `t`.
    pub fn position_at_time(&self, t: f64) -> DVec3 {
        kepler_position_at_time(self, t)
    }
}

impl TryFrom<ElementSet> for OrbitalElements {
    type Error = ElementError;

    fn try_from(set: ElementSet) -> Result<Self, Self::Error> {
        Self::new(set)
    }
}
