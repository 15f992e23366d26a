//! Bodies of the solar system and their per-update state.

use std::fmt;

use orrery_math::{DQuat, DVec3};

use crate::elements::OrbitalElements;

/// Index of a body in [`SolarSystem::bodies`](crate::SolarSystem::bodies).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyIndex(pub usize);

impl fmt::Display for BodyIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Axial tilt and sidereal rotation of a body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spin {
    /// Tilt of the rotation axis away from +Z, radians.
    pub axial_tilt: f64,
    /// Sidereal rotation period in seconds. Negative spins retrograde.
    pub rotation_period: f64,
}

impl Spin {
    /// Orientation at simulated time `t`: spin about the body's own axis,
    /// then tilt that axis.
    pub fn orientation_at(&self, t: f64) -> DQuat {
        let angle = std::f64::consts::TAU * (t / self.rotation_period).fract();
        DQuat::from_rotation_x(self.axial_tilt) * DQuat::from_rotation_z(angle)
    }
}

/// A named body following a Keplerian orbit around the origin or a parent.
#[derive(Clone, Debug)]
pub struct Body {
    name: String,
    elements: OrbitalElements,
    radius: f64,
    parent: Option<BodyIndex>,
    spin: Option<Spin>,

    position: DVec3,
    velocity: DVec3,
    orientation: DQuat,
}

impl Body {
    pub fn new(name: impl Into<String>, elements: OrbitalElements, radius: f64) -> Self {
        Self {
            name: name.into(),
            elements,
            radius,
            parent: None,
            spin: None,
            position: DVec3::ZERO,
            velocity: DVec3::ZERO,
            orientation: DQuat::IDENTITY,
        }
    }

    pub fn with_parent(mut self, parent: BodyIndex) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_spin(mut self, spin: Spin) -> Self {
        self.spin = Some(spin);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn elements(&self) -> &OrbitalElements {
        &self.elements
    }

    /// Physical radius in metres.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn parent(&self) -> Option<BodyIndex> {
        self.parent
    }

    pub fn spin(&self) -> Option<&Spin> {
        self.spin.as_ref()
    }

    /// Global position as of the last update.
    pub fn position(&self) -> DVec3 {
        self.position
    }

    /// Global velocity as of the last update, metres per second.
    pub fn velocity(&self) -> DVec3 {
        self.velocity
    }

    pub fn orientation(&self) -> DQuat {
        self.orientation
    }

    pub(crate) fn set_state(&mut self, position: DVec3, velocity: DVec3, orientation: DQuat) {
        self.position = position;
        self.velocity = velocity;
        self.orientation = orientation;
    }
}
