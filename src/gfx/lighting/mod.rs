//! Lighting model
//!
//! Color-space conversion, the ambient + Lambert diffuse reference model, the
//! per-frame normal matrix and the scene's light sources.

pub mod color;
pub mod lambert;
pub mod lights;
pub mod normal_matrix;

pub use color::{linear_to_srgb, srgb_to_linear, Color, ColorEncoding};
pub use lambert::{lambert_diffuse, shade, shade_display, LambertParams};
pub use lights::{AmbientLight, DirectionalLight, Lights};
pub use normal_matrix::{normal_matrix, NormalMatrixUniform, NormalTransform};
