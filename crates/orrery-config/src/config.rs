//! Configuration sections with defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub simulation: SimulationConfig,
    pub lighting: LightingConfig,
    pub render: RenderConfig,
    pub debug: DebugConfig,
}

/// Size, title and presentation of the main window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Logical pixels.
    pub width: u32,
    pub height: u32,
    /// Base window title. The frame rate is appended at runtime.
    pub title: String,
    /// Present with Fifo. When off, the lowest-latency mode is used.
    pub vsync: bool,
}

/// Camera configuration. Distances in metres.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f64,
    pub near: f64,
    pub far: f64,
    /// Initial distance from the origin along +Z.
    pub start_distance: f64,
    /// Radians of orbit/rotation per pixel of mouse motion.
    pub orbit_sensitivity: f64,
    /// Fraction of the target distance covered per wheel line.
    pub dolly_sensitivity: f64,
}

/// Simulation clock configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulated seconds advanced per rendered frame.
    pub time_step_seconds: f64,
    /// Solar-system description. Relative paths resolve against the asset
    /// directory.
    pub system_file: PathBuf,
}

/// Phong light parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightingConfig {
    /// World position of the point light, metres.
    pub position: [f64; 3],
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub shininess: f32,
}

/// How bodies are drawn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Linear RGB clear color.
    pub clear_color: [f64; 3],
    /// Physical radii are multiplied by this before drawing.
    pub body_scale: f64,
    /// Smallest radius a body is drawn with, metres.
    pub min_display_radius: f64,
    /// Extra factor applied to the mesh after clamping.
    pub mesh_scale: f64,
    /// Start in wireframe mode when the adapter supports it.
    pub wireframe: bool,
}

/// Diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Filter directive, e.g. `"debug"` or `"info,orrery_orbit=trace"`.
    /// `RUST_LOG` takes precedence.
    pub log_level: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            title: "Orrery".to_string(),
            vsync: true,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 1.0e6,
            far: 1.0e13,
            start_distance: 1.5e11,
            orbit_sensitivity: 0.005,
            dolly_sensitivity: 0.1,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step_seconds: 86_400.0,
            system_file: PathBuf::from("sol.ron"),
        }
    }
}

impl Default for LightingConfig {
    fn default() -> Self {
        // Pearl-like material, light at the sun.
        Self {
            position: [0.0, 0.0, 0.0],
            ambient: [0.25, 0.20725, 0.20725],
            diffuse: [1.0, 0.829, 0.829],
            specular: [0.296_648, 0.296_648, 0.296_648],
            shininess: 0.088 * 128.0,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [100.0 / 255.0, 149.0 / 255.0, 237.0 / 255.0],
            body_scale: 30.0,
            min_display_radius: 1.5e9,
            mesh_scale: 1.0,
            wireframe: false,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info,wgpu=warn,naga=warn".to_string(),
        }
    }
}

impl CameraConfig {
    /// Check the values the camera cannot recover from.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(self.near.is_finite() && self.near > 0.0) {
            return Err("camera.near must be positive and finite");
        }
        if !(self.far.is_finite() && self.far > self.near) {
            return Err("camera.far must be finite and greater than camera.near");
        }
        if !(self.fov_degrees.is_finite() && self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err("camera.fov_degrees must be between 0 and 180");
        }
        if !self.start_distance.is_finite() {
            return Err("camera.start_distance must be finite");
        }
        Ok(())
    }
}

impl Config {
    /// Load `config.ron` from `config_dir`, or write and return the defaults
    /// when it does not exist yet.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONFIG_FILE_NAME);

        if path.exists() {
            let config = Self::load(&path)?;
            log::info!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", path.display());
            Ok(config)
        }
    }

    /// Parse a config file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = ron::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config
            .camera
            .validate()
            .map_err(|reason| ConfigError::Invalid {
                path: path.to_path_buf(),
                reason,
            })?;
        Ok(config)
    }

    /// Save as `config.ron` in `config_dir`, creating the directory.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let path = config_dir.join(CONFIG_FILE_NAME);
        let write_err = |source| ConfigError::Write {
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(config_dir).map_err(write_err)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(false)
            .enumerate_arrays(false);
        let serialized = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&path, serialized).map_err(write_err)
    }
}
