use std::ops::Range;

use cgmath::{Matrix4, Rad, SquareMatrix, Vector3, Zero};
use wgpu::Device;

use super::vertex::Vertex3D;
use crate::gfx::geometry::GeometryData;
use crate::gfx::lighting::{normal_matrix, NormalMatrixUniform};
use crate::gfx::resources::material::MaterialId;
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::UniformBuffer,
};

pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    index_count: u32,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex3D>, indices: Vec<u32>) -> Self {
        let index_count = indices.len() as u32;
        Self {
            vertices,
            indices,
            vertex_buffer: None,
            index_buffer: None,
            index_count,
        }
    }

    pub fn from_geometry(geometry: &GeometryData) -> Self {
        let (vertices, indices) = geometry.to_scene_format();
        Self::new(vertices, indices)
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    fn init_gpu_resources(&mut self, device: &Device) {
        self.vertex_buffer = Some(wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Vertex Buffer"),
                contents: bytemuck::cast_slice(&self.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        ));
        self.index_buffer = Some(wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Index Buffer"),
                contents: bytemuck::cast_slice(&self.indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        ));
    }
}

/// Per-object transform data, bound at group 1
///
/// MUST match `ObjectUniform` in the mesh shaders.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: NormalMatrixUniform,
}

impl ObjectUniform {
    /// Derives the normal matrix from the given model matrix
    pub fn from_model(model: Matrix4<f32>) -> Self {
        Self {
            model: model.into(),
            normal_matrix: normal_matrix(&model).into(),
        }
    }
}

pub type ObjectUBO = UniformBuffer<ObjectUniform>;

/// Layout of the per-object bind group: one vertex-stage uniform
pub fn create_object_layout(device: &Device) -> BindGroupLayoutWithDesc {
    BindGroupLayoutBuilder::new()
        .next_binding_vertex(binding_types::uniform())
        .create(device, "Object Bind Group Layout")
}

pub struct ObjectGpuResources {
    pub ubo: ObjectUBO,
    pub bind_group: wgpu::BindGroup,
}

/// A drawable scene object
///
/// The model matrix is `parent_transform * T * R * S`, with the rotation
/// applied as Euler angles in X, then Y, then Z order about the object's
/// own axes. `parent_transform` carries the accumulated transform of the
/// group an imported mesh came from and is identity otherwise.
pub struct Object {
    pub name: String,
    pub meshes: Vec<Mesh>,
    pub position: Vector3<f32>,
    /// Euler angles in radians
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
    pub parent_transform: Matrix4<f32>,
    /// Angular velocity in radians per second, added to `rotation`
    pub spin: Vector3<f32>,
    pub visible: bool,
    material_id: Option<MaterialId>,
    pub gpu_resources: Option<ObjectGpuResources>, // None until init_gpu_resources called
}

impl Object {
    /// Create a new Object with identity transformation
    pub fn new(meshes: Vec<Mesh>) -> Self {
        Self {
            name: "Object".to_string(),
            meshes,
            position: Vector3::zero(),
            rotation: Vector3::zero(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            parent_transform: Matrix4::identity(),
            spin: Vector3::zero(),
            visible: true,
            material_id: None,
            gpu_resources: None,
        }
    }

    pub fn from_geometry(name: &str, geometry: &GeometryData) -> Self {
        Self::new(vec![Mesh::from_geometry(geometry)]).with_name(name)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vector3::new(x, y, z);
        self
    }

    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Vector3::new(x, y, z);
        self
    }

    pub fn with_scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = Vector3::new(x, y, z);
        self
    }

    pub fn with_spin(mut self, x: f32, y: f32, z: f32) -> Self {
        self.spin = Vector3::new(x, y, z);
        self
    }

    pub fn with_material(mut self, material_id: &str) -> Self {
        self.set_material(material_id);
        self
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn set_material(&mut self, material_id: &str) {
        self.material_id = Some(material_id.to_string());
    }

    pub fn get_material_id(&self) -> Option<&MaterialId> {
        self.material_id.as_ref()
    }

    /// Advances the rotation by `spin * dt`
    pub fn advance_spin(&mut self, dt: f32) {
        self.rotation += self.spin * dt;
    }

    pub fn rotation_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        let t = Matrix4::from_translation(self.position);
        let s = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        self.parent_transform * t * self.rotation_matrix() * s // Order matters: T * R * S
    }

    /// Writes this frame's transform data to the object's uniform buffer
    pub fn upload_uniform(&mut self, queue: &wgpu::Queue, uniform: ObjectUniform) {
        if let Some(gpu_resources) = &mut self.gpu_resources {
            gpu_resources.ubo.update_content(queue, uniform);
        }
    }

    pub fn get_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu_resources.as_ref().map(|res| &res.bind_group)
    }

    pub fn init_gpu_resources(&mut self, device: &Device, layout: &BindGroupLayoutWithDesc) {
        for mesh in self.meshes.iter_mut() {
            mesh.init_gpu_resources(device);
        }

        let ubo = ObjectUBO::new_with_data(device, &ObjectUniform::from_model(self.model_matrix()));
        let bind_group = BindGroupBuilder::new(layout)
            .resource(ubo.binding_resource())
            .create(device, &format!("Object Bind Group: {}", self.name));

        log::debug!(
            "Created GPU resources for '{}' ({} meshes)",
            self.name,
            self.meshes.len()
        );

        self.gpu_resources = Some(ObjectGpuResources { ubo, bind_group });
    }
}

pub trait DrawObject<'a> {
    fn draw_mesh(&mut self, mesh: &'a Mesh);
    fn draw_mesh_instanced(&mut self, mesh: &'a Mesh, instances: Range<u32>);
    fn draw_object(&mut self, object: &'a Object);
}

impl<'a, 'b> DrawObject<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh) {
        self.draw_mesh_instanced(mesh, 0..1);
    }

    fn draw_mesh_instanced(&mut self, mesh: &'b Mesh, instances: Range<u32>) {
        let (Some(vertex_buffer), Some(index_buffer)) = (&mesh.vertex_buffer, &mesh.index_buffer)
        else {
            return; // Skip drawing if not uploaded
        };

        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, instances);
    }

    fn draw_object(&mut self, object: &'b Object) {
        for mesh in &object.meshes {
            self.draw_mesh(mesh);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_box;
    use approx::assert_relative_eq;
    use cgmath::{InnerSpace, Vector4};

    #[test]
    fn test_default_transform_is_identity() {
        let object = Object::from_geometry("box", &generate_box(1.0, 1.0, 1.0));
        assert_eq!(object.model_matrix(), Matrix4::identity());
        assert_eq!(object.meshes[0].vertex_count(), 24);
        assert_eq!(object.meshes[0].index_count(), 36);
    }

    #[test]
    fn test_trs_order() {
        let object = Object::new(Vec::new())
            .with_position(2.0, 0.0, 0.0)
            .with_rotation(0.0, std::f32::consts::FRAC_PI_2, 0.0)
            .with_scale(3.0, 1.0, 1.0);

        // Scale first, then rotate +X onto -Z, then translate
        let p = object.model_matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(p.x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.z, -3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_parent_transform_applies_last() {
        let mut object = Object::new(Vec::new()).with_position(1.0, 0.0, 0.0);
        object.parent_transform = Matrix4::from_scale(2.0);
        let p = object.model_matrix() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(p.x, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_spin_accumulates() {
        let mut object = Object::new(Vec::new()).with_spin(0.6, 0.6, 0.0);
        for _ in 0..10 {
            object.advance_spin(0.1);
        }
        assert_relative_eq!(object.rotation.x, 0.6, epsilon = 1e-5);
        assert_relative_eq!(object.rotation.y, 0.6, epsilon = 1e-5);
        assert_eq!(object.rotation.z, 0.0);
    }

    #[test]
    fn test_object_uniform_tracks_rotation() {
        let object = Object::new(Vec::new()).with_rotation(0.3, 0.7, 0.0);
        let uniform = ObjectUniform::from_model(object.model_matrix());

        // For a pure rotation the normal matrix is the rotation itself
        let model = object.model_matrix();
        for c in 0..3 {
            for r in 0..3 {
                assert_relative_eq!(uniform.normal_matrix.cols[c][r], model[c][r], epsilon = 1e-5);
            }
            let column = Vector3::new(
                uniform.normal_matrix.cols[c][0],
                uniform.normal_matrix.cols[c][1],
                uniform.normal_matrix.cols[c][2],
            );
            assert_relative_eq!(column.magnitude(), 1.0, epsilon = 1e-5);
        }
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 112);
    }

    #[test]
    fn test_material_assignment() {
        let object = Object::new(Vec::new()).with_material("dirt");
        assert_eq!(object.get_material_id().map(String::as_str), Some("dirt"));
    }
}
