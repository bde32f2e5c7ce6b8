//! Material system
//!
//! Provides material definitions and centralized management with GPU resource handling.
//! Materials are stored in MaterialManager and objects reference them by ID.
//!
//! Three shading models exist, each drawn by its own pipeline:
//! - [`Shading::Basic`]: unlit, color times texture
//! - [`Shading::Lambert`]: ambient + diffuse from the scene lights
//! - [`Shading::LambertCustom`]: the hand-written Lambert shader, which ignores
//!   the scene lights and reads its own light parameters from the material

use std::collections::HashMap;

use cgmath::Vector3;
use wgpu::Device;

use super::texture_library::{TextureId, TextureLibrary};
use crate::gfx::lighting::{Color, ColorEncoding, LambertParams, NormalTransform};
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::UniformBuffer,
};

/// Material ID for referencing materials
pub type MaterialId = String;

/// Which render pipeline draws a material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShadingModel {
    Basic,
    Lambert,
    LambertCustom,
}

impl ShadingModel {
    pub const ALL: [ShadingModel; 3] = [
        ShadingModel::Basic,
        ShadingModel::Lambert,
        ShadingModel::LambertCustom,
    ];

    pub fn pipeline_name(self) -> &'static str {
        match self {
            ShadingModel::Basic => "basic",
            ShadingModel::Lambert => "lambert",
            ShadingModel::LambertCustom => "lambert_custom",
        }
    }
}

/// Parameters of the hand-written Lambert shader
///
/// The light here is private to the material: changing the scene's
/// directional light does not affect objects using it.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomLambert {
    pub ambient_intensity: f32,
    /// Light position; only its direction from the origin is used
    pub light_position: Vector3<f32>,
    pub light_color: Color,
    pub object_color: Color,
    /// Diffuse texture (`sDiffuse`), decoded to linear in the shader
    pub diffuse: Option<TextureId>,
    pub normal_transform: NormalTransform,
}

impl Default for CustomLambert {
    fn default() -> Self {
        Self {
            ambient_intensity: 0.2,
            light_position: Vector3::new(1.0, 1.0, 1.0),
            light_color: Color::WHITE,
            object_color: Color::WHITE,
            diffuse: None,
            normal_transform: NormalTransform::NormalMatrix,
        }
    }
}

impl CustomLambert {
    pub fn with_light_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.light_position = Vector3::new(x, y, z);
        self
    }

    pub fn with_diffuse(mut self, texture: impl Into<TextureId>) -> Self {
        self.diffuse = Some(texture.into());
        self
    }

    pub fn with_normal_transform(mut self, normal_transform: NormalTransform) -> Self {
        self.normal_transform = normal_transform;
        self
    }

    /// The CPU reference parameters equivalent to this material
    pub fn params(&self) -> LambertParams {
        LambertParams {
            ambient_intensity: self.ambient_intensity,
            light_direction: self.light_position,
            light_color: self.light_color,
            object_color: self.object_color,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shading {
    /// Unlit (`MeshBasicMaterial`)
    Basic {
        color: Color,
        texture: Option<TextureId>,
    },
    /// Lit by the scene's ambient and directional light (`MeshLambertMaterial`)
    Lambert {
        color: Color,
        texture: Option<TextureId>,
    },
    LambertCustom(CustomLambert),
}

impl Shading {
    pub fn model(&self) -> ShadingModel {
        match self {
            Shading::Basic { .. } => ShadingModel::Basic,
            Shading::Lambert { .. } => ShadingModel::Lambert,
            Shading::LambertCustom(_) => ShadingModel::LambertCustom,
        }
    }

    pub fn texture(&self) -> Option<&TextureId> {
        match self {
            Shading::Basic { texture, .. } | Shading::Lambert { texture, .. } => texture.as_ref(),
            Shading::LambertCustom(custom) => custom.diffuse.as_ref(),
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Shading::Basic { color, .. } | Shading::Lambert { color, .. } => *color,
            Shading::LambertCustom(custom) => custom.object_color,
        }
    }

    /// Packs the shading parameters for the material uniform
    ///
    /// `texture` is the encoding of the bound texture, or `None` when the
    /// white fallback is bound.
    pub fn uniform(&self, texture: Option<ColorEncoding>) -> MaterialUniform {
        let mut uniform = MaterialUniform {
            color: self.color().to_array(),
            has_texture: texture.is_some() as u32,
            texture_encoding: texture.unwrap_or_default().shader_flag(),
            ..Default::default()
        };

        if let Shading::LambertCustom(custom) = self {
            uniform.ambient_intensity = custom.ambient_intensity;
            uniform.light_position = custom.light_position.into();
            uniform.light_color = custom.light_color.to_array();
            uniform.normal_transform = custom.normal_transform.shader_flag();
        }

        uniform
    }
}

/// GPU uniform data for materials
///
/// MUST match `MaterialUniform` in the mesh shaders.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub color: [f32; 3],
    pub ambient_intensity: f32,
    pub light_position: [f32; 3],
    pub has_texture: u32,
    pub light_color: [f32; 3],
    pub texture_encoding: u32,
    pub normal_transform: u32,
    _padding: [u32; 3],
}

impl Default for MaterialUniform {
    fn default() -> Self {
        Self {
            color: [1.0; 3],
            ambient_intensity: 0.0,
            light_position: [0.0, 1.0, 0.0],
            has_texture: 0,
            light_color: [1.0; 3],
            texture_encoding: 0,
            normal_transform: 0,
            _padding: [0; 3],
        }
    }
}

type MaterialUBO = UniformBuffer<MaterialUniform>;

/// Layout of the material bind group (group 2): uniform, texture, sampler
pub fn create_material_layout(device: &Device) -> BindGroupLayoutWithDesc {
    BindGroupLayoutBuilder::new()
        .next_binding_rendering(binding_types::uniform())
        .next_binding_fragment(binding_types::texture_2d())
        .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
        .create(device, "Material Bind Group Layout")
}

struct MaterialGpu {
    ubo: MaterialUBO,
    bind_group: wgpu::BindGroup,
    bound_texture: Option<TextureId>,
}

/// A named shading setup, shared by every object that references it
pub struct Material {
    pub name: String,
    pub shading: Shading,

    gpu: Option<MaterialGpu>,
}

impl Default for Material {
    fn default() -> Self {
        Self::new(
            "default",
            Shading::Lambert {
                color: Color::linear(0.8, 0.8, 0.8),
                texture: None,
            },
        )
    }
}

impl Material {
    pub fn new(name: &str, shading: Shading) -> Self {
        Self {
            name: name.to_string(),
            shading,
            gpu: None,
        }
    }

    pub fn basic(name: &str, color: Color) -> Self {
        Self::new(name, Shading::Basic { color, texture: None })
    }

    pub fn lambert(name: &str, color: Color) -> Self {
        Self::new(name, Shading::Lambert { color, texture: None })
    }

    pub fn lambert_custom(name: &str, custom: CustomLambert) -> Self {
        Self::new(name, Shading::LambertCustom(custom))
    }

    /// Builder pattern: set the color texture of any shading model
    pub fn with_texture(mut self, id: impl Into<TextureId>) -> Self {
        let id = Some(id.into());
        match &mut self.shading {
            Shading::Basic { texture, .. } | Shading::Lambert { texture, .. } => *texture = id,
            Shading::LambertCustom(custom) => custom.diffuse = id,
        }
        self
    }

    pub fn model(&self) -> ShadingModel {
        self.shading.model()
    }

    /// Updates GPU resources for this material
    ///
    /// The bind group is rebuilt when the bound texture changed; the uniform
    /// is rewritten only when its content changed.
    pub fn update_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
        textures: &TextureLibrary,
    ) {
        let wanted = self.shading.texture().cloned();
        let Some(binding) = textures.binding(wanted.as_deref()) else {
            log::warn!(
                "Material '{}' updated before textures were uploaded",
                self.name
            );
            return;
        };

        let stale = self
            .gpu
            .as_ref()
            .map_or(true, |gpu| gpu.bound_texture != wanted);
        if stale {
            let ubo = MaterialUBO::new(device);
            let bind_group = BindGroupBuilder::new(layout)
                .resource(ubo.binding_resource())
                .texture(&binding.resource.view)
                .sampler(&binding.resource.sampler)
                .create(device, &format!("Material Bind Group: {}", self.name));
            self.gpu = Some(MaterialGpu {
                ubo,
                bind_group,
                bound_texture: wanted,
            });
        }

        let encoding = binding.present.then_some(binding.encoding);
        let uniform = self.shading.uniform(encoding);
        if let Some(gpu) = &mut self.gpu {
            gpu.ubo.update_content(queue, uniform);
        }
    }

    /// Gets the bind group for rendering
    pub fn get_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu.as_ref().map(|gpu| &gpu.bind_group)
    }
}

/// Manages all materials in the engine
///
/// Centralized storage for all materials. Objects reference materials by ID
/// rather than storing material data directly, enabling efficient sharing
/// of GPU resources between objects.
pub struct MaterialManager {
    materials: HashMap<MaterialId, Material>,
    default_material_id: MaterialId,
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialManager {
    /// Creates a new material manager with a default material
    pub fn new() -> Self {
        let default_material = Material::default();
        let default_material_id = default_material.name.clone();

        let mut materials = HashMap::new();
        materials.insert(default_material_id.clone(), default_material);

        Self {
            materials,
            default_material_id,
        }
    }

    /// Adds a material, replacing any material with the same name
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = material.name.clone();
        self.materials.insert(id.clone(), material);
        id
    }

    /// Returns a name based on `desired` that no material uses yet
    pub fn unique_name(&self, desired: &str) -> MaterialId {
        let mut counter = 0;
        let mut name = desired.to_string();
        while self.materials.contains_key(&name) {
            counter += 1;
            name = format!("{} ({})", desired, counter);
        }
        name
    }

    pub fn get_material(&self, id: &str) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn get_material_mut(&mut self, id: &str) -> Option<&mut Material> {
        self.materials.get_mut(id)
    }

    pub fn get_default_material(&self) -> &Material {
        &self.materials[&self.default_material_id]
    }

    /// Gets material for an object with fallback to default
    ///
    /// Handles objects with no material assigned and dangling material ids.
    pub fn get_material_for_object(&self, material_id: Option<&MaterialId>) -> &Material {
        material_id
            .and_then(|id| self.get_material(id))
            .unwrap_or_else(|| self.get_default_material())
    }

    /// Lists all material IDs
    pub fn list_materials(&self) -> Vec<&MaterialId> {
        self.materials.keys().collect()
    }

    pub fn materials_mut(&mut self) -> impl Iterator<Item = &mut Material> {
        self.materials.values_mut()
    }

    /// Updates GPU resources for all materials
    pub fn update_all_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
        textures: &TextureLibrary,
    ) {
        for material in self.materials.values_mut() {
            material.update_gpu_resources(device, queue, layout, textures);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_uniform_layout() {
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 64);
    }

    #[test]
    fn test_shading_models() {
        assert_eq!(Material::basic("b", Color::WHITE).model(), ShadingModel::Basic);
        assert_eq!(Material::lambert("l", Color::WHITE).model(), ShadingModel::Lambert);
        assert_eq!(
            Material::lambert_custom("c", CustomLambert::default()).model(),
            ShadingModel::LambertCustom
        );
        assert_eq!(ShadingModel::LambertCustom.pipeline_name(), "lambert_custom");
    }

    #[test]
    fn test_with_texture_targets_the_right_slot() {
        let material = Material::lambert_custom("c", CustomLambert::default()).with_texture("dirt");
        match &material.shading {
            Shading::LambertCustom(custom) => assert_eq!(custom.diffuse.as_deref(), Some("dirt")),
            other => panic!("unexpected shading {:?}", other),
        }

        let material = Material::basic("b", Color::WHITE).with_texture("dirt");
        assert_eq!(material.shading.texture().map(String::as_str), Some("dirt"));
    }

    #[test]
    fn test_custom_uniform_carries_private_light() {
        let custom = CustomLambert::default()
            .with_light_position(1.0, 1.0, -1.0)
            .with_normal_transform(NormalTransform::ModelMatrix);
        let uniform = Shading::LambertCustom(custom).uniform(Some(ColorEncoding::Srgb));

        assert_eq!(uniform.ambient_intensity, 0.2);
        assert_eq!(uniform.light_position, [1.0, 1.0, -1.0]);
        assert_eq!(uniform.has_texture, 1);
        assert_eq!(uniform.texture_encoding, ColorEncoding::Srgb.shader_flag());
        assert_eq!(uniform.normal_transform, NormalTransform::ModelMatrix.shader_flag());
    }

    #[test]
    fn test_fallback_texture_reports_no_texture() {
        let uniform = Shading::Lambert {
            color: Color::linear(1.0, 0.5, 0.0),
            texture: None,
        }
        .uniform(None);
        assert_eq!(uniform.has_texture, 0);
        assert_eq!(uniform.color, [1.0, 0.5, 0.0]);
        assert_eq!(uniform.texture_encoding, ColorEncoding::Linear.shader_flag());
    }

    #[test]
    fn test_mesh_shaders_skip_fallback_texel() {
        let shaders = [
            ("basic", include_str!("../rendering/shaders/basic.wgsl")),
            ("lambert", include_str!("../rendering/shaders/lambert.wgsl")),
            (
                "lambert_custom",
                include_str!("../rendering/shaders/lambert_custom.wgsl"),
            ),
        ];
        for (name, source) in shaders {
            assert!(
                source.contains("material.has_texture == 0u"),
                "{} ignores has_texture",
                name
            );
        }
    }

    #[test]
    fn test_manager_default_and_fallback() {
        let mut manager = MaterialManager::new();
        assert_eq!(manager.get_default_material().name, "default");

        let id = manager.add_material(Material::basic("orange", Color::from_srgb(1.0, 0.5, 0.0)));
        assert_eq!(manager.get_material_for_object(Some(&id)).name, "orange");
        assert_eq!(
            manager
                .get_material_for_object(Some(&"missing".to_string()))
                .name,
            "default"
        );
        assert_eq!(manager.get_material_for_object(None).name, "default");
    }

    #[test]
    fn test_unique_name() {
        let mut manager = MaterialManager::new();
        manager.add_material(Material::basic("mat", Color::WHITE));
        assert_eq!(manager.unique_name("mat"), "mat (1)");
        assert_eq!(manager.unique_name("fresh"), "fresh");
    }
}
