//! Per-frame shader inputs
//!
//! A [`FrameContext`] is rebuilt from the scene every frame, after the scene
//! update and before drawing. It carries everything the shaders read that
//! changes per frame, so nothing about a frame lives in long-lived state.

use crate::gfx::{
    lighting::ColorEncoding,
    resources::global_bindings::GlobalUniform,
    scene::{object::ObjectUniform, Scene},
};

#[derive(Debug, Clone)]
pub struct FrameContext {
    /// Seconds since the previous frame
    pub dt: f32,
    pub global: GlobalUniform,
    /// One entry per scene object, in scene order
    pub objects: Vec<ObjectUniform>,
}

impl FrameContext {
    /// Captures camera, lights and object transforms from the scene
    ///
    /// Normal matrices are derived from the model matrices as they are now,
    /// so spins applied by `Scene::update` are reflected in the same frame.
    /// `output_encoding` is the encoding the shaders must apply themselves.
    pub fn build(scene: &Scene, dt: f32, output_encoding: ColorEncoding) -> Self {
        let global = GlobalUniform::new(
            scene.camera_manager.camera.uniform,
            &scene.lights,
            output_encoding,
        );

        let objects = scene
            .objects
            .iter()
            .map(|object| ObjectUniform::from_model(object.model_matrix()))
            .collect();

        Self {
            dt,
            global,
            objects,
        }
    }

    pub fn object_uniform(&self, index: usize) -> Option<&ObjectUniform> {
        self.objects.get(index)
    }
}
