//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Orrery command-line arguments.
///
/// Everything else is read from `config.ron`.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "orrery", about = "Real-time Keplerian solar system viewer")]
pub struct CliArgs {
    /// Wavefront OBJ mesh drawn for every body. Defaults to a built-in sphere.
    pub mesh: Option<PathBuf>,
}
