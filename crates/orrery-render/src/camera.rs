//! Perspective camera with orbit, free-look and dolly controls.
//!
//! The camera lives in double precision alongside the simulation. Rendering
//! is camera-relative: every world position is rebased to the camera before
//! it is narrowed to `f32`, so the view matrix only carries rotation.

use glam::{DMat4, DQuat, DVec3, Mat4, Vec3};
use orrery_math::look_at_rotation;

/// Pitch is kept this far (radians) away from the up axis.
const POLE_MARGIN: f64 = 1e-3;

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: DVec3,
    /// Point the camera looks at and orbits around.
    pub target: DVec3,
    /// Vertical hint; need not be orthogonal to the view direction.
    pub up: DVec3,
    /// Vertical field of view in radians.
    pub fov_y: f64,
    /// Width / height.
    pub aspect_ratio: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: DVec3::new(0.0, 0.0, 1.5e11),
            target: DVec3::ZERO,
            up: DVec3::Y,
            fov_y: std::f64::consts::FRAC_PI_4,
            aspect_ratio: 1024.0 / 768.0,
            near: 1.0e6,
            far: 1.0e13,
        }
    }
}

impl Camera {
    pub fn distance(&self) -> f64 {
        self.position.distance(self.target)
    }

    /// Unit view direction. Falls back to -Z if position and target coincide.
    pub fn forward(&self) -> DVec3 {
        (self.target - self.position)
            .try_normalize()
            .unwrap_or(DVec3::NEG_Z)
    }

    pub fn right(&self) -> DVec3 {
        self.forward()
            .cross(self.up)
            .try_normalize()
            .unwrap_or(DVec3::X)
    }

    /// World orientation: local -Z toward the target, local +Y toward `up`.
    pub fn orientation(&self) -> DQuat {
        look_at_rotation(self.position, self.target, self.up).unwrap_or(DQuat::IDENTITY)
    }

    /// Aim at `target` without moving.
    pub fn look_at(&mut self, target: DVec3) {
        if target != self.position {
            self.target = target;
        }
    }

    /// Square the up hint against the current view: the new up is the
    /// camera's own local +Y while it keeps looking at the target. When the
    /// hint is parallel to the view it falls back to world +Y, or +Z when
    /// looking straight along Y.
    pub fn relevel(&mut self) {
        let forward = self.forward();
        let squared = forward.cross(self.up).cross(forward);
        self.up = if squared.length_squared() > POLE_MARGIN * POLE_MARGIN {
            squared.normalize()
        } else if forward.cross(DVec3::Y).length_squared() > POLE_MARGIN * POLE_MARGIN {
            DVec3::Y
        } else {
            DVec3::Z
        };
    }

    /// Swing the camera around its target. `yaw` turns about the up hint,
    /// positive `pitch` raises the camera toward it. Distance to the target
    /// is preserved.
    pub fn orbit(&mut self, yaw: f64, pitch: f64) {
        let offset = self.position - self.target;
        self.position = self.target + self.turn(offset, yaw, pitch);
    }

    /// Turn the view direction in place; positive `pitch` looks up.
    pub fn rotate(&mut self, yaw: f64, pitch: f64) {
        let view = self.target - self.position;
        self.target = self.position + self.turn(view, yaw, pitch);
    }

    /// Rotate `v` about the up hint, then tilt it toward the up hint with the
    /// angle between them clamped short of the poles.
    fn turn(&self, v: DVec3, yaw: f64, pitch: f64) -> DVec3 {
        let Some(up) = self.up.try_normalize() else {
            return v;
        };
        let v = DQuat::from_axis_angle(up, yaw) * v;
        let Some(axis) = v.cross(up).try_normalize() else {
            return v;
        };
        let angle = v.angle_between(up);
        let clamped = (angle - pitch).clamp(POLE_MARGIN, std::f64::consts::PI - POLE_MARGIN);
        DQuat::from_axis_angle(axis, angle - clamped) * v
    }

    /// Move along the view direction. Positive `amount` closes in by a factor
    /// of `e^amount`, so the target is approached but never reached.
    pub fn dolly(&mut self, amount: f64) {
        let distance = self.distance();
        if distance <= 0.0 {
            return;
        }
        // Far wins when the two limits overlap.
        let new_distance = (distance * (-amount).exp())
            .max(self.near)
            .min(self.far * 0.5);
        if !new_distance.is_finite() {
            return;
        }
        self.position = self.target - self.forward() * new_distance;
    }

    /// Update the aspect ratio for perspective projection.
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect_ratio = f64::from(width / height);
        }
    }

    /// Position of `world` relative to the camera, narrowed to `f32`.
    pub fn relative(&self, world: DVec3) -> Vec3 {
        (world - self.position).as_vec3()
    }

    /// Rotation-only view matrix for camera-relative coordinates.
    pub fn view_matrix(&self) -> Mat4 {
        DMat4::look_to_rh(DVec3::ZERO, self.forward(), self.up).as_mat4()
    }

    /// Reverse-Z perspective: near maps to depth 1, far to depth 0.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y as f32,
            self.aspect_ratio as f32,
            self.far as f32,
            self.near as f32,
        )
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn close(a: DVec3, b: DVec3, tol: f64) -> bool {
        (a - b).length() <= tol
    }

    #[test]
    fn test_default_camera_looks_at_origin() {
        let camera = Camera::default();
        assert!(close(camera.forward(), DVec3::NEG_Z, 1e-12));
        assert_eq!(camera.distance(), 1.5e11);
    }

    #[test]
    fn test_orbit_keeps_distance() {
        let mut camera = Camera::default();
        let d = camera.distance();
        for _ in 0..50 {
            camera.orbit(0.13, 0.07);
            assert!((camera.distance() - d).abs() < d * 1e-12);
        }
        assert!(!close(camera.position, Camera::default().position, 1.0));
    }

    #[test]
    fn test_orbit_stops_at_pole() {
        let mut camera = Camera::default();
        for _ in 0..100 {
            camera.orbit(0.0, 0.1);
        }
        let angle = (camera.position - camera.target).angle_between(camera.up);
        assert!((angle - POLE_MARGIN).abs() < 1e-6, "angle {angle}");
        assert!(camera.orientation().is_finite());
    }

    #[test]
    fn test_rotate_keeps_position() {
        let mut camera = Camera::default();
        camera.rotate(0.3, -0.2);
        assert_eq!(camera.position, Camera::default().position);
        assert!(!close(camera.forward(), DVec3::NEG_Z, 1e-3));
    }

    #[test]
    fn test_dolly_moves_toward_target_without_crossing() {
        let mut camera = Camera::default();
        camera.dolly(0.5);
        let d = camera.distance();
        assert!(d < 1.5e11 && d > 0.0);
        for _ in 0..1000 {
            camera.dolly(10.0);
        }
        assert!(camera.distance() >= camera.near);
        assert!(camera.position.z > 0.0, "crossed the target");
        assert!(close(camera.forward(), DVec3::NEG_Z, 1e-9));
    }

    #[test]
    fn test_dolly_out_is_bounded() {
        let mut camera = Camera::default();
        camera.dolly(-1000.0);
        assert!(camera.distance() <= camera.far * 0.5 * (1.0 + 1e-12));
    }

    #[test]
    fn test_dolly_with_near_beyond_half_far() {
        let mut camera = Camera {
            near: 1.0e12,
            far: 1.0e12,
            ..Camera::default()
        };
        camera.dolly(0.1);
        assert!(camera.distance().is_finite());
        assert!((camera.distance() - 5.0e11).abs() < 1.0);
        assert!(camera.position.z > 0.0);
    }

    #[test]
    fn test_look_at_basis_is_orthonormal() {
        let mut camera = Camera {
            position: DVec3::new(3.0e10, -2.0e10, 5.0e10),
            ..Camera::default()
        };
        camera.look_at(DVec3::new(1.0e9, 0.0, 0.0));
        let q = camera.orientation();
        let (x, y, z) = (q * DVec3::X, q * DVec3::Y, q * DVec3::Z);
        for axis in [x, y, z] {
            assert!((axis.length() - 1.0).abs() < 1e-12);
        }
        assert!(x.dot(y).abs() < 1e-12 && y.dot(z).abs() < 1e-12 && z.dot(x).abs() < 1e-12);
        assert!(close(-z, camera.forward(), 1e-12));
        assert!(y.dot(camera.up) > 0.0);
    }

    #[test]
    fn test_relevel_keeps_current_up() {
        let mut camera = Camera {
            up: DVec3::new(0.3, 0.9, 0.1),
            ..Camera::default()
        };
        let local_y = camera.orientation() * DVec3::Y;
        camera.relevel();

        assert!((camera.up.length() - 1.0).abs() < 1e-12);
        assert!(camera.up.dot(camera.forward()).abs() < 1e-12);
        assert!(close(camera.up, local_y, 1e-9));
        assert!(close(camera.up, DVec3::new(0.3, 0.9, 0.0).normalize(), 1e-12));
    }

    #[test]
    fn test_relevel_after_orbit_looks_at_target() {
        let mut camera = Camera::default();
        camera.orbit(0.4, 0.3);
        camera.relevel();
        assert_eq!(camera.target, DVec3::ZERO);
        assert!(camera.up.dot(camera.forward()).abs() < 1e-12);
        assert!(camera.up.dot(DVec3::Y) > 0.0);
    }

    #[test]
    fn test_relevel_with_up_along_view_falls_back() {
        let mut overhead = Camera {
            position: DVec3::new(0.0, 1.0e11, 0.0),
            ..Camera::default()
        };
        overhead.relevel();
        assert_eq!(overhead.up, DVec3::Z);

        let mut sideways = Camera {
            up: DVec3::NEG_Z,
            ..Camera::default()
        };
        sideways.relevel();
        assert_eq!(sideways.up, DVec3::Y);
    }

    #[test]
    fn test_reverse_z_depth_range() {
        let camera = Camera::default();
        let proj = camera.projection_matrix();
        let near = proj * Vec4::new(0.0, 0.0, -camera.near as f32, 1.0);
        let far = proj * Vec4::new(0.0, 0.0, -camera.far as f32, 1.0);
        assert!((near.z / near.w - 1.0).abs() < 1e-4);
        assert!((far.z / far.w).abs() < 1e-4);
    }

    #[test]
    fn test_target_projects_to_screen_center() {
        let camera = Camera {
            position: DVec3::new(1.0e11, 2.0e10, 3.0e10),
            ..Camera::default()
        };
        let rel = camera.relative(camera.target);
        let clip = camera.view_projection_matrix() * rel.extend(1.0);
        assert!((clip.x / clip.w).abs() < 1e-4);
        assert!((clip.y / clip.w).abs() < 1e-4);
    }

    #[test]
    fn test_aspect_ratio_ignores_zero_size() {
        let mut camera = Camera::default();
        camera.set_aspect_ratio(1920.0, 1080.0);
        assert!((camera.aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
        camera.set_aspect_ratio(0.0, 0.0);
        assert!((camera.aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
    }
}
