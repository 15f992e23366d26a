//! Vector, quaternion and unit helpers shared by the orrery crates.
//!
//! Vectors and quaternions are `glam`'s double-precision types; orbital
//! distances span twelve orders of magnitude, so everything on the
//! simulation side stays in `f64` until the renderer rebases to the camera.

mod quaternion;
mod units;

pub use glam::{DMat3, DMat4, DQuat, DVec3};
pub use quaternion::{look_at_rotation, orbit_frame_rotation, quat_transform};
pub use units::{
    METERS_PER_AU, SECONDS_PER_DAY, days_to_seconds, format_distance, normalize_angle,
};
