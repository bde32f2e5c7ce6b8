//! Error types for Tattie
//!
//! Startup is fail-fast: anything that goes wrong while creating the GPU
//! context, compiling shaders or loading assets is reported as a
//! [`TattieError`] and aborts the viewer.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TattieError>;

#[derive(Debug, Error)]
pub enum TattieError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create render surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to request GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,

    #[error("shader '{name}' failed to compile: {message}")]
    ShaderCompilation { name: String, message: String },

    #[error("pipeline '{name}' could not be created: {message}")]
    Pipeline { name: String, message: String },

    #[error("failed to load texture {path}: {source}")]
    TextureLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to import glTF model {path}: {source}")]
    GltfImport {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },

    #[error("failed to import OBJ model {path}: {source}")]
    ObjImport {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("unsupported model format for {0}")]
    UnsupportedModel(PathBuf),

    #[error("invalid mesh '{name}': {detail}")]
    InvalidMesh { name: String, detail: String },

    #[error("unsupported image layout in {name}: {detail}")]
    ImageLayout { name: String, detail: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
