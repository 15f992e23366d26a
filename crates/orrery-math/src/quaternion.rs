//! Quaternion composition helpers.

use glam::{DMat3, DQuat, DVec3};

/// Rotate `v` by the unit quaternion `q`.
#[inline]
pub fn quat_transform(q: DQuat, v: DVec3) -> DVec3 {
    q * v
}

/// Rotation taking orbital-plane coordinates (periapsis on +X, angular
/// momentum on +Z) into the reference frame.
///
/// Composed as `Rz(longitude_ascending) * Rx(inclination) * Rz(argument_periapsis)`,
/// so the argument of periapsis is applied first and the node longitude last.
pub fn orbit_frame_rotation(
    longitude_ascending: f64,
    inclination: f64,
    argument_periapsis: f64,
) -> DQuat {
    DQuat::from_rotation_z(longitude_ascending)
        * DQuat::from_rotation_x(inclination)
        * DQuat::from_rotation_z(argument_periapsis)
}

/// Orientation of an observer at `eye` looking toward `target`, with `up` as
/// the vertical hint. The observer's local -Z axis points at the target.
///
/// Returns `None` if `eye == target` or `up` is parallel to the view direction.
pub fn look_at_rotation(eye: DVec3, target: DVec3, up: DVec3) -> Option<DQuat> {
    let forward = (target - eye).try_normalize()?;
    let right = forward.cross(up).try_normalize()?;
    let true_up = right.cross(forward);
    let basis = DMat3::from_cols(right, true_up, -forward);
    Some(DQuat::from_mat3(&basis).normalize())
}
