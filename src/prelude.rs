//! # Tattie Prelude
//!
//! Commonly used types in one import.
//!
//! ```no_run
//! use tattie::prelude::*;
//!
//! fn main() -> tattie::Result<()> {
//!     let config = ViewerConfig::default().with_preset(ScenePreset::CustomShader);
//!     TattieApp::new(config)?.run()
//! }
//! ```

pub use crate::app::TattieApp;
pub use crate::config::ViewerConfig;
pub use crate::error::{Result, TattieError};
pub use crate::presets::{PresetAssets, ScenePreset};

pub use crate::gfx::camera::CameraManager;
pub use crate::gfx::geometry::{generate_box, generate_custom_box, generate_torus_knot, GeometryData};
pub use crate::gfx::lighting::{Color, ColorEncoding, Lights, NormalTransform};
pub use crate::gfx::resources::{CustomLambert, Material, Shading, TextureAsset};
pub use crate::gfx::scene::{Object, Scene, SceneNode};
pub use crate::import::{import_model, import_with_substitution};

pub use cgmath::Vector3;
