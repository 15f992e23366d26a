//! `orrery [MESH]`: open a window and animate the configured solar system,
//! drawing every body with the given OBJ mesh.

use std::process::ExitCode;

use clap::Parser;
use orrery_app::FatalSink;
use orrery_config::CliArgs;
use tracing::info;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let (dirs, config) = match orrery_app::prepare() {
        Ok(prepared) => prepared,
        Err(err) => {
            eprintln!("orrery: {err}");
            return ExitCode::FAILURE;
        }
    };

    let logging =
        orrery_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    if let Err(err) = &logging {
        eprintln!("orrery: logging unavailable: {err}");
    }
    let fatal = FatalSink::new(logging.is_ok());

    info!("Orrery {}", env!("CARGO_PKG_VERSION"));
    info!(config = %dirs.config_dir.display(), logs = %dirs.log_dir.display(), "Directories");

    let result = orrery_app::load_scene(&args, &config, &dirs)
        .and_then(|(system, mesh)| orrery_app::run(config, system, mesh));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            fatal.report(&err);
            ExitCode::FAILURE
        }
    }
}
