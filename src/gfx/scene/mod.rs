//! # Scene Management Module
//!
//! Scene organization for Tattie: objects with their transforms, materials
//! and lights, line helpers, and the node trees produced by model import.
//!
//! ## Key Components
//!
//! - [`Scene`] - The main scene container that manages objects, camera, lights and materials
//! - [`Object`] - Individual 3D objects with meshes, a material and a TRS transform
//! - [`SceneNode`] - Imported group/mesh trees, walked with a [`NodeVisitor`]
//! - [`Vertex3D`] - 3D vertex data structure with position, normal, and texture coordinates
//!
//! ## Usage
//!
//! ```no_run
//! use tattie::gfx::camera::{CameraController, CameraManager, OrbitCamera};
//! use tattie::gfx::geometry::generate_box;
//! use tattie::gfx::scene::Scene;
//!
//! let camera = OrbitCamera::new(5.0, 0.0, 0.0, cgmath::Vector3::new(0.0, 0.0, 0.0), 1.5);
//! let mut scene = Scene::new(CameraManager::new(camera, CameraController::new(0.005, 0.1)));
//! scene.add_geometry("cube", &generate_box(1.0, 1.0, 1.0), "default");
//! ```

pub mod line_helper;
pub mod node;
pub mod object;
pub mod scene;
pub mod vertex;

pub use line_helper::LineHelper;
pub use node::{GroupNode, MaterialSubstitution, MeshNode, NodeMaterial, NodeTexture, NodeVisitor, SceneNode};
pub use object::{DrawObject, Object, ObjectUniform};
pub use scene::{Scene, SceneStatistics};
pub use vertex::{LineVertex, Vertex3D};
