//! Global uniform bindings for camera and scene data
//!
//! Manages GPU uniform buffers and bind groups for global rendering state
//! that is shared across all objects in a frame: camera matrices, the
//! scene's ambient and directional light, and the output color encoding.

use crate::{
    gfx::{
        camera::camera_utils::CameraUniform,
        lighting::{ColorEncoding, Lights},
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Global uniform buffer content structure
///
/// MUST match the GlobalUniform struct in the shaders exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniform {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
    /// Ambient color premultiplied by intensity
    pub ambient: [f32; 3],
    /// `ColorEncoding::shader_flag` of the surface output
    pub output_encoding: u32,
    /// Unit vector towards the directional light
    pub light_direction: [f32; 3],
    _padding0: f32,
    /// Directional color premultiplied by intensity
    pub light_color: [f32; 3],
    _padding1: f32,
}

impl GlobalUniform {
    pub fn new(camera: CameraUniform, lights: &Lights, output_encoding: ColorEncoding) -> Self {
        Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            ambient: lights.ambient.radiance().to_array(),
            output_encoding: output_encoding.shader_flag(),
            light_direction: lights.directional.direction().into(),
            _padding0: 0.0,
            light_color: lights.directional.radiance().to_array(),
            _padding1: 0.0,
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUniform>;

/// Manages bind group layouts and bind groups for global uniforms
///
/// Bound to slot 0 in all render pipelines.
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: Option<wgpu::BindGroup>,
}

impl GlobalBindings {
    /// Sets up the layout; the bind group is created by `create_bind_group()`
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group: None,
        }
    }

    pub fn create_bind_group(&mut self, device: &wgpu::Device, ubo: &GlobalUBO) {
        self.bind_group = Some(
            BindGroupBuilder::new(&self.bind_group_layout)
                .resource(ubo.binding_resource())
                .create(device, "Global Bind Group"),
        );
    }

    /// Used when creating render pipelines that need access to global uniforms.
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    /// `None` until `create_bind_group()` has been called
    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.bind_group.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::lighting::{AmbientLight, Color, DirectionalLight};

    #[test]
    fn test_global_uniform_layout() {
        assert_eq!(std::mem::size_of::<GlobalUniform>(), 128);
    }

    #[test]
    fn test_global_uniform_from_lights() {
        let lights = Lights {
            ambient: AmbientLight::new(Color::WHITE, 0.2),
            directional: DirectionalLight::new(Color::WHITE, 1.0).with_position(0.0, 0.0, 3.0),
        };
        let uniform = GlobalUniform::new(CameraUniform::default(), &lights, ColorEncoding::Srgb);

        assert_eq!(uniform.ambient, [0.2, 0.2, 0.2]);
        assert_eq!(uniform.light_direction, [0.0, 0.0, 1.0]);
        assert_eq!(uniform.light_color, [1.0, 1.0, 1.0]);
        assert_eq!(uniform.output_encoding, 1);
    }
}
