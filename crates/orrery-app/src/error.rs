//! Fatal application errors.

use orrery_config::ConfigError;
use orrery_mesh::MeshImportError;
use orrery_orbit::ConfigLoadError;
use orrery_render::RendererError;

use crate::platform::PlatformError;

/// Everything that stops the viewer before or while starting the frame loop.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to load solar system: {0}")]
    System(#[from] ConfigLoadError),

    #[error("failed to load mesh: {0}")]
    Mesh(#[from] MeshImportError),

    #[error("failed to start renderer: {0}")]
    Renderer(#[from] RendererError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}
