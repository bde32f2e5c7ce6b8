//! # Graphics Module
//!
//! Everything between a [`Scene`] and pixels on the surface.
//!
//! - **Camera** ([`camera`]) - Perspective orbit camera and its controller
//! - **Geometry** ([`geometry`]) - Box, torus knot and line helper generators
//! - **Lighting** ([`lighting`]) - Color encodings, lights and the normal matrix
//! - **Rendering** ([`rendering`]) - Pipelines, per-frame uniforms and frame submission
//! - **Resources** ([`resources`]) - Materials, textures and the global bind group
//! - **Scene** ([`scene`]) - Objects, helpers and imported node trees
//!
//! ```no_run
//! use tattie::gfx::RenderEngine;
//!
//! // Created by the app once the window exists:
//! // let engine = pollster::block_on(RenderEngine::new(window, 1200, 800, true))?;
//! ```
//!
//! [`Scene`]: scene::Scene

pub mod camera;
pub mod geometry;
pub mod lighting;
pub mod rendering;
pub mod resources;
pub mod scene;

pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
