//! Error types for orbital element validation and solar system loading.

use std::path::PathBuf;

/// An orbital element value outside the range the solver accepts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ElementError {
    /// A field was NaN or infinite.
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },

    /// Semi-major axis below zero.
    #[error("semi-major axis must not be negative, got {0}")]
    NegativeSemiMajorAxis(f64),

    /// Eccentricity outside `[0, 1)`. Open orbits are not supported.
    #[error("eccentricity must be in [0, 1), got {0}")]
    Eccentricity(f64),

    /// Orbital period (or mean motion) zero or negative.
    #[error("orbital period must be positive, got {0}")]
    NonPositivePeriod(f64),
}

/// Errors raised while loading a solar system definition.
///
/// All of these are fatal: the application reports the error once and exits
/// before the render loop starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    /// The definition file could not be read.
    #[error("failed to read solar system file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed RON, or a required field is missing.
    #[error("failed to parse solar system definition: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Two bodies share a name.
    #[error("duplicate body name '{name}'")]
    DuplicateBody { name: String },

    /// A parent name does not match any body.
    #[error("body '{body}' references unknown parent '{parent}'")]
    UnknownParent { body: String, parent: String },

    /// A parent index points past the end of the body list.
    #[error("body '{body}' references parent index {index}, but only {count} bodies exist")]
    DanglingParent {
        body: String,
        index: usize,
        count: usize,
    },

    /// This body lies on a loop of parent links.
    #[error("parent links of body '{body}' form a cycle")]
    ParentCycle { body: String },

    /// Radius zero, negative, or not finite.
    #[error("body '{body}' has invalid radius {radius}")]
    InvalidRadius { body: String, radius: f64 },

    /// The orbital elements failed validation.
    #[error("body '{body}' has invalid orbital elements: {source}")]
    InvalidElements {
        body: String,
        #[source]
        source: ElementError,
    },

    /// Spin parameters unusable.
    #[error("body '{body}' has invalid spin: {reason}")]
    InvalidSpin { body: String, reason: &'static str },
}
