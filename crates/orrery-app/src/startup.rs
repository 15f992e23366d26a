//! Loading everything the frame loop needs before a window exists.

use std::fmt::Display;
use std::path::Path;

use orrery_config::{CliArgs, Config};
use orrery_mesh::{Mesh, load_mesh};
use orrery_orbit::{SolarSystem, load_solar_system};
use tracing::{error, info};

use crate::error::AppError;
use crate::platform::{PlatformDirs, locate_asset};

/// Platform directories plus the persisted config, created on first run.
pub fn prepare() -> Result<(PlatformDirs, Config), AppError> {
    let dirs = PlatformDirs::resolve_and_create()?;
    let config = Config::load_or_create(&dirs.config_dir)?;
    Ok((dirs, config))
}

/// Where a fatal error ends up. Without a subscriber `error!` goes nowhere,
/// so the message must be written to stderr directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalSink {
    Log,
    Stderr,
}

impl FatalSink {
    pub fn new(logging_installed: bool) -> Self {
        if logging_installed {
            Self::Log
        } else {
            Self::Stderr
        }
    }

    pub fn report(self, err: &dyn Display) {
        match self {
            Self::Log => error!("{err}"),
            Self::Stderr => eprintln!("orrery: {err}"),
        }
    }
}

/// Load the solar system named in the config and the body mesh named on the
/// command line.
pub fn load_scene(
    args: &CliArgs,
    config: &Config,
    dirs: &PlatformDirs,
) -> Result<(SolarSystem, Mesh), AppError> {
    let system_path = locate_asset(&config.simulation.system_file, &dirs.asset_dirs());
    let system = load_solar_system(&system_path)?;
    info!(bodies = system.len(), "Solar system ready");

    let mesh = load_mesh(args.mesh.as_deref())?;
    log_mesh(args.mesh.as_deref(), &mesh);
    Ok((system, mesh))
}

fn log_mesh(path: Option<&Path>, mesh: &Mesh) {
    match path {
        Some(path) => info!(
            path = %path.display(),
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "Mesh loaded"
        ),
        None => info!(
            vertices = mesh.vertex_count(),
            "No mesh given, using built-in sphere"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_dirs() -> (tempfile::TempDir, PlatformDirs) {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::resolve_with_root(tmp.path());
        (tmp, dirs)
    }

    #[test]
    fn test_fatal_errors_reach_stderr_without_logging() {
        assert_eq!(FatalSink::new(false), FatalSink::Stderr);
        assert_eq!(FatalSink::new(true), FatalSink::Log);

        let (_tmp, dirs) = temp_dirs();
        let mut config = Config::default();
        config.simulation.system_file = PathBuf::from("missing.ron");
        let err = load_scene(&CliArgs { mesh: None }, &config, &dirs).unwrap_err();
        FatalSink::new(false).report(&err);
    }

    #[test]
    fn test_bundled_scene_loads() {
        let (_tmp, dirs) = temp_dirs();
        let (system, mesh) = load_scene(&CliArgs { mesh: None }, &Config::default(), &dirs).unwrap();
        assert!(system.find("Earth").is_some());
        assert!(mesh.triangle_count() > 0);
    }

    #[test]
    fn test_user_system_file_preferred() {
        let (_tmp, dirs) = temp_dirs();
        let assets = &dirs.asset_dirs()[0];
        std::fs::create_dir_all(assets).unwrap();
        std::fs::write(
            assets.join("sol.ron"),
            "(bodies: [(name: \"Lonely\", radius: 1.0, orbit: (semi_major_axis: 0.0, eccentricity: 0.0, rate: Period(1.0)))])",
        )
        .unwrap();

        let (system, _) = load_scene(&CliArgs { mesh: None }, &Config::default(), &dirs).unwrap();
        assert_eq!(system.len(), 1);
        assert!(system.find("Lonely").is_some());
    }

    #[test]
    fn test_missing_system_file_fails() {
        let (_tmp, dirs) = temp_dirs();
        let mut config = Config::default();
        config.simulation.system_file = PathBuf::from("no-such-system.ron");
        let err = load_scene(&CliArgs { mesh: None }, &config, &dirs).unwrap_err();
        assert!(matches!(err, AppError::System(_)));
    }

    #[test]
    fn test_missing_mesh_fails() {
        let (tmp, dirs) = temp_dirs();
        let args = CliArgs {
            mesh: Some(tmp.path().join("missing.obj")),
        };
        let err = load_scene(&args, &Config::default(), &dirs).unwrap_err();
        assert!(matches!(err, AppError::Mesh(_)));
    }
}
