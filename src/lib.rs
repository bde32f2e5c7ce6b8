//! Tattie
//!
//! A small wgpu scene viewer that walks through building a lit 3D scene one
//! step at a time: a spinning cube, basic and Lambert materials, lights, hand
//! written geometry and shaders, and finally textures with imported models.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod import;
pub mod prelude;
pub mod presets;
pub mod ui;
pub mod wgpu_utils;

pub use app::TattieApp;
pub use config::ViewerConfig;
pub use error::{Result, TattieError};
pub use presets::ScenePreset;

/// Opens a window and runs the viewer until it is closed
pub fn run(config: ViewerConfig) -> Result<()> {
    TattieApp::new(config)?.run()
}
