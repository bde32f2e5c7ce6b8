//! # User Interface Module
//!
//! Dear ImGui overlay for the viewer.
//!
//! - [`UiManager`] - ImGui context, winit input glue and the wgpu renderer
//! - [`lighting_panel`] - Light, custom material and spin controls
//!
//! The UI is built before the frame's uniforms are collected, so edits made
//! in a panel show up in the same frame. Input captured by the UI never
//! reaches the camera controller.

pub mod manager;
pub mod panel;

pub use manager::UiManager;
pub use panel::lighting_panel;
