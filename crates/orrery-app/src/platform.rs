//! Per-user directories and asset lookup.

use std::io;
use std::path::{Path, PathBuf};

/// Errors resolving or creating the application directories.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("could not determine OS configuration directory")]
    NoConfigDir,

    #[error("platform I/O error: {0}")]
    Io(#[from] io::Error),
}

const APP_NAME: &str = "orrery";

/// OS-specific directories (XDG on Linux, Known Folders on Windows, Library
/// on macOS).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDirs {
    /// Holds `config.ron`.
    pub config_dir: PathBuf,
    /// User-installed assets live in `data_dir/assets`.
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl PlatformDirs {
    /// Resolve directories without touching the disk.
    ///
    /// # Errors
    ///
    /// [`PlatformError::NoConfigDir`] if the OS exposes no config directory.
    pub fn resolve() -> Result<Self, PlatformError> {
        let app_config = dirs::config_dir()
            .ok_or(PlatformError::NoConfigDir)?
            .join(APP_NAME);
        let data_dir = dirs::data_dir()
            .map(|dir| dir.join(APP_NAME))
            .unwrap_or_else(|| app_config.join("data"));

        Ok(Self {
            config_dir: app_config.clone(),
            data_dir,
            log_dir: app_config.join("logs"),
        })
    }

    /// Resolve and create every directory.
    pub fn resolve_and_create() -> Result<Self, PlatformError> {
        let dirs = Self::resolve()?;
        dirs.create_dirs()?;
        Ok(dirs)
    }

    /// Directories under `root`, for tests and portable installs.
    pub fn resolve_with_root(root: &Path) -> Self {
        let app_dir = root.join(APP_NAME);
        Self {
            config_dir: app_dir.join("config"),
            data_dir: app_dir.join("data"),
            log_dir: app_dir.join("logs"),
        }
    }

    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }

    /// Asset directories in lookup order: the user's, then the bundled one.
    pub fn asset_dirs(&self) -> [PathBuf; 2] {
        [self.data_dir.join("assets"), bundled_asset_dir()]
    }
}

/// The `assets/` directory shipped at the workspace root.
pub fn bundled_asset_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("assets")
}

/// Resolve a relative asset path against `search`, returning the first
/// existing candidate. Absolute paths are returned unchanged; when nothing
/// exists the last directory wins so the load error names a real location.
pub fn locate_asset(file: &Path, search: &[PathBuf]) -> PathBuf {
    if file.is_absolute() {
        return file.to_path_buf();
    }
    search
        .iter()
        .map(|dir| dir.join(file))
        .find(|candidate| candidate.exists())
        .or_else(|| search.last().map(|dir| dir.join(file)))
        .unwrap_or_else(|| file.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_with_root_layout() {
        let root = Path::new("portable");
        let dirs = PlatformDirs::resolve_with_root(root);
        assert_eq!(dirs.config_dir, root.join("orrery").join("config"));
        assert_eq!(dirs.log_dir, root.join("orrery").join("logs"));
        assert!(dirs.asset_dirs()[0].starts_with(&dirs.data_dir));
    }

    #[test]
    fn test_directory_creation() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::resolve_with_root(tmp.path());
        dirs.create_dirs().unwrap();
        assert!(dirs.config_dir.is_dir());
        assert!(dirs.data_dir.is_dir());
        assert!(dirs.log_dir.is_dir());
    }

    #[test]
    fn test_bundled_assets_present() {
        assert!(bundled_asset_dir().join("sol.ron").is_file());
    }

    #[test]
    fn test_user_asset_shadows_bundled() {
        let user = tempfile::tempdir().unwrap();
        let bundled = tempfile::tempdir().unwrap();
        std::fs::write(user.path().join("sol.ron"), "").unwrap();
        std::fs::write(bundled.path().join("sol.ron"), "").unwrap();
        std::fs::write(bundled.path().join("other.ron"), "").unwrap();
        let search = [user.path().to_path_buf(), bundled.path().to_path_buf()];

        assert_eq!(
            locate_asset(Path::new("sol.ron"), &search),
            user.path().join("sol.ron")
        );
        assert_eq!(
            locate_asset(Path::new("other.ron"), &search),
            bundled.path().join("other.ron")
        );
    }

    #[test]
    fn test_missing_asset_points_at_last_dir() {
        let search = [PathBuf::from("first"), PathBuf::from("second")];
        assert_eq!(
            locate_asset(Path::new("gone.ron"), &search),
            Path::new("second").join("gone.ron")
        );
    }

    #[test]
    fn test_absolute_asset_untouched() {
        let absolute = std::env::temp_dir().join("sol.ron");
        assert_eq!(locate_asset(&absolute, &[]), absolute);
    }
}
