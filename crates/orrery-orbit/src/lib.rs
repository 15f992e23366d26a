//! Keplerian orbit mechanics for the orrery.
//!
//! Bodies carry immutable orbital elements; their positions are a pure
//! function of simulated time and are recomputed from scratch on every
//! [`SolarSystem::update`], parents before children.

mod body;
mod elements;
mod error;
mod kepler;
mod loader;
mod system;

pub use body::{Body, BodyIndex, Spin};
pub use elements::{ElementSet, OrbitalElements};
pub use error::{ConfigLoadError, ElementError};
pub use kepler::{
    KEPLER_MAX_ITERATIONS, KEPLER_TOLERANCE, KeplerSolution, OrbitalState,
    kepler_position_at_time, kepler_state_at_time, solve_kepler, solve_kepler_bounded,
};
pub use loader::{
    BodyRecord, OrbitRecord, OrbitalRate, SpinRecord, SystemRecord, load_solar_system,
    parse_solar_system,
};
pub use system::SolarSystem;
