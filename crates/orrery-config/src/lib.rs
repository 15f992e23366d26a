//! Application settings for the orrery viewer.
//!
//! Settings persist as `config.ron` in the platform config directory and are
//! created with defaults on first run. Every section tolerates missing fields,
//! so files written by older builds keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE_NAME, CameraConfig, Config, DebugConfig, LightingConfig, RenderConfig,
    SimulationConfig, WindowConfig,
};
pub use error::ConfigError;
