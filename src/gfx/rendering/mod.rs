//! Core rendering functionality
//!
//! Handles render pipelines, per-frame uniforms and frame rendering.

pub mod frame_context;
pub mod pipeline_manager;
pub mod render_engine;

pub use frame_context::FrameContext;
pub use pipeline_manager::{PipelineConfig, PipelineManager, PipelineStats, VertexLayout};
pub use render_engine::{shader_output_encoding, RenderEngine};
