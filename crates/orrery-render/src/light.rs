//! Point light and Phong material terms.

use glam::DVec3;

/// A point light with the Phong terms applied to every body.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// World position in metres.
    pub position: DVec3,
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    /// Specular exponent.
    pub shininess: f32,
}

impl Default for Light {
    /// Light at the origin (inside the Sun) with a pearl-like material.
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            ambient: [0.25, 0.20725, 0.20725],
            diffuse: [1.0, 0.829, 0.829],
            specular: [0.296648; 3],
            shininess: 0.088 * 128.0,
        }
    }
}
