//! The orrery application: window, event handling and the frame loop.

pub mod clock;
pub mod error;
pub mod fps;
pub mod input;
pub mod platform;
pub mod startup;
pub mod window;

pub use error::AppError;
pub use startup::{FatalSink, load_scene, prepare};
pub use window::{App, run};
