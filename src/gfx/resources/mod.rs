//! GPU resource management
//!
//! Handles materials, textures, and the global bind group used for rendering.

pub mod global_bindings;
pub mod material;
pub mod texture_asset;
pub mod texture_library;
pub mod texture_resource;

pub use global_bindings::{GlobalBindings, GlobalUBO, GlobalUniform};
pub use material::{CustomLambert, Material, MaterialManager, Shading, ShadingModel};
pub use texture_asset::{SamplerSettings, TextureAsset};
pub use texture_library::{TextureId, TextureLibrary};
pub use texture_resource::TextureResource;
