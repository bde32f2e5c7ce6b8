use std::sync::Arc;

use cgmath::{Matrix4, SquareMatrix};
use wgpu::Device;

use super::{
    line_helper::LineHelper,
    node::{MeshNode, SceneNode},
    object::{Mesh, Object},
};
use crate::gfx::{
    camera::camera_utils::CameraManager,
    geometry::{GeometryData, LineData},
    lighting::Lights,
    resources::{
        material::{Material, MaterialId, MaterialManager},
        texture_asset::TextureAsset,
        texture_library::{TextureId, TextureLibrary},
    },
};
use crate::wgpu_utils::BindGroupLayoutWithDesc;

/// Main scene containing objects, lights, materials, textures and camera
pub struct Scene {
    pub camera_manager: CameraManager,
    pub objects: Vec<Object>,
    pub helpers: Vec<LineHelper>,
    pub lights: Lights,
    pub material_manager: MaterialManager,
    pub textures: TextureLibrary,
    /// Freezes every object's spin while set
    pub spin_paused: bool,
}

impl Scene {
    /// Creates a new scene with the given camera manager
    pub fn new(camera_manager: CameraManager) -> Self {
        Self {
            camera_manager,
            objects: Vec::new(),
            helpers: Vec::new(),
            lights: Lights::default(),
            material_manager: MaterialManager::new(),
            textures: TextureLibrary::new(),
            spin_paused: false,
        }
    }

    /// Advances the scene by `dt` seconds: spins first, then the camera
    pub fn update(&mut self, dt: f32) {
        if !self.spin_paused {
            for object in &mut self.objects {
                object.advance_spin(dt);
            }
        }
        self.camera_manager.camera.update_view_proj();
    }

    /// Adds an object, renaming it if the name is already taken
    pub fn add_object(&mut self, mut object: Object) -> &mut Object {
        let name = self.ensure_unique_name(&object.name);
        object.set_name(name);
        self.objects.push(object);
        let index = self.objects.len() - 1;
        &mut self.objects[index]
    }

    /// Adds an object built from procedural or imported geometry
    pub fn add_geometry(
        &mut self,
        name: &str,
        geometry: &GeometryData,
        material_id: &str,
    ) -> &mut Object {
        self.add_object(Object::from_geometry(name, geometry).with_material(material_id))
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.material_manager.add_material(material)
    }

    pub fn add_texture(&mut self, id: impl Into<TextureId>, asset: TextureAsset) -> TextureId {
        self.textures.insert(id, Arc::new(asset))
    }

    pub fn add_helper(&mut self, name: &str, lines: LineData) {
        self.helpers.push(LineHelper::new(name, lines));
    }

    /// Flattens a node tree into scene objects
    ///
    /// Each mesh node becomes one object whose parent transform is the
    /// product of the transforms on its path from the root. Textures are
    /// registered with the texture library and materials with the material
    /// manager; an identical material already present under the same name
    /// is reused. Returns the number of objects added.
    pub fn add_node_tree(&mut self, root: SceneNode) -> usize {
        let mut added = 0;
        self.flatten_node(root, Matrix4::identity(), &mut added);
        added
    }

    fn flatten_node(&mut self, node: SceneNode, parent: Matrix4<f32>, added: &mut usize) {
        match node {
            SceneNode::Mesh(mesh) => {
                self.add_mesh_node(mesh, parent);
                *added += 1;
            }
            SceneNode::Group(group) => {
                let transform = parent * group.transform;
                for child in group.children {
                    self.flatten_node(child, transform, added);
                }
            }
        }
    }

    fn add_mesh_node(&mut self, mesh: MeshNode, parent: Matrix4<f32>) {
        let MeshNode {
            name,
            geometry,
            material,
            transform,
        } = mesh;

        if let Some(texture) = material.diffuse_map {
            self.textures.insert(texture.id, texture.asset);
        }

        let reusable = self
            .material_manager
            .get_material(&material.name)
            .is_some_and(|existing| existing.shading == material.shading);
        let material_id = if reusable {
            material.name
        } else {
            let unique = self.material_manager.unique_name(&material.name);
            self.add_material(Material::new(&unique, material.shading))
        };

        let object = self.add_object(Object::from_geometry(&name, &geometry).with_material(&material_id));
        object.parent_transform = parent * transform;
    }

    /// Initializes GPU resources for all objects, helpers, textures and materials
    ///
    /// Must be called after the GPU context is available and before rendering.
    pub fn init_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        object_layout: &BindGroupLayoutWithDesc,
        material_layout: &BindGroupLayoutWithDesc,
    ) {
        for object in self.objects.iter_mut() {
            object.init_gpu_resources(device, object_layout);
        }
        for helper in self.helpers.iter_mut() {
            helper.init_gpu_resources(device);
        }

        self.textures.upload_all(device, queue);
        self.update_materials(device, queue, material_layout);

        let stats = self.get_statistics();
        log::info!(
            "Scene ready: {} objects, {} materials, {} textures, {} triangles",
            stats.object_count,
            stats.material_count,
            self.textures.len(),
            stats.total_triangles
        );
    }

    /// Syncs material parameters to the GPU
    ///
    /// Call this after modifying material properties.
    pub fn update_materials(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        material_layout: &BindGroupLayoutWithDesc,
    ) {
        self.material_manager
            .update_all_gpu_resources(device, queue, material_layout, &self.textures);
    }

    /// Gets material for rendering an object
    ///
    /// Returns the material assigned to the object, or the default material
    /// if no material is assigned or the assigned material doesn't exist.
    pub fn get_material_for_object(&self, object: &Object) -> &Material {
        self.material_manager
            .get_material_for_object(object.get_material_id())
    }

    pub fn get_object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn find_object(&self, name: &str) -> Option<&Object> {
        self.objects.iter().find(|object| object.name == name)
    }

    pub fn find_object_mut(&mut self, name: &str) -> Option<&mut Object> {
        self.objects.iter_mut().find(|object| object.name == name)
    }

    /// Gets statistics about the scene
    pub fn get_statistics(&self) -> SceneStatistics {
        let total_triangles: u32 = self
            .objects
            .iter()
            .map(|obj| obj.meshes.iter().map(|m| m.index_count() / 3).sum::<u32>())
            .sum();

        let total_vertices: u32 = self
            .objects
            .iter()
            .map(|obj| obj.meshes.iter().map(Mesh::vertex_count).sum::<u32>())
            .sum();

        SceneStatistics {
            object_count: self.objects.len(),
            material_count: self.material_manager.list_materials().len(),
            total_triangles,
            total_vertices,
        }
    }

    pub fn ensure_unique_name(&self, desired_name: &str) -> String {
        let mut counter = 0;
        let mut test_name = desired_name.to_string();

        while self.objects.iter().any(|obj| obj.name == test_name) {
            counter += 1;
            test_name = format!("{} ({})", desired_name, counter);
        }

        test_name
    }
}

/// Scene statistics for debugging and UI display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub material_count: usize,
    pub total_triangles: u32,
    pub total_vertices: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::{CameraController, OrbitCamera};
    use crate::gfx::geometry::generate_box;
    use crate::gfx::lighting::Color;
    use crate::gfx::resources::material::Shading;
    use crate::gfx::scene::node::{GroupNode, NodeMaterial, NodeTexture};
    use approx::assert_relative_eq;
    use cgmath::{Vector3, Vector4, Zero};

    fn scene() -> Scene {
        let camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.5);
        Scene::new(CameraManager::new(camera, CameraController::disabled()))
    }

    fn mesh_node(name: &str, material: &str, transform: Matrix4<f32>) -> SceneNode {
        SceneNode::Mesh(MeshNode {
            name: name.to_string(),
            geometry: generate_box(1.0, 1.0, 1.0),
            material: NodeMaterial {
                name: material.to_string(),
                shading: Shading::Lambert {
                    color: Color::WHITE,
                    texture: Some(format!("{}.png", material)),
                },
                diffuse_map: Some(NodeTexture {
                    id: format!("{}.png", material),
                    asset: Arc::new(TextureAsset::solid(material, [255; 4])),
                }),
            },
            transform,
        })
    }

    #[test]
    fn test_update_spins_objects() {
        let mut scene = scene();
        scene.add_geometry("box", &generate_box(1.0, 1.0, 1.0), "default");
        scene.objects[0].spin = Vector3::new(0.6, 0.6, 0.0);

        scene.update(0.5);
        assert_relative_eq!(scene.objects[0].rotation.x, 0.3);

        scene.spin_paused = true;
        scene.update(0.5);
        assert_relative_eq!(scene.objects[0].rotation.x, 0.3);
    }

    #[test]
    fn test_unique_object_names() {
        let mut scene = scene();
        let geometry = generate_box(1.0, 1.0, 1.0);
        scene.add_geometry("box", &geometry, "default");
        scene.add_geometry("box", &geometry, "default");
        assert_eq!(scene.objects[1].name, "box (1)");
    }

    #[test]
    fn test_add_node_tree_composes_transforms() {
        let mut scene = scene();

        let mut inner = GroupNode::new("inner");
        inner.transform = Matrix4::from_scale(2.0);
        inner
            .children
            .push(mesh_node("tower", "stone", Matrix4::from_translation(Vector3::new(1.0, 0.0, 0.0))));

        let mut root = GroupNode::new("root");
        root.transform = Matrix4::from_translation(Vector3::new(0.0, 10.0, 0.0));
        root.children.push(SceneNode::Group(inner));
        root.children.push(mesh_node("ground", "grass", Matrix4::identity()));

        let added = scene.add_node_tree(SceneNode::Group(root));
        assert_eq!(added, 2);
        assert_eq!(scene.get_object_count(), 2);

        let tower = scene.find_object("tower").unwrap();
        let origin = tower.model_matrix() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(origin.x, 2.0);
        assert_relative_eq!(origin.y, 10.0);

        assert!(scene.textures.contains("stone.png"));
        assert!(scene.textures.contains("grass.png"));
        assert_eq!(
            scene.get_material_for_object(tower).shading.texture().map(String::as_str),
            Some("stone.png")
        );
    }

    #[test]
    fn test_identical_materials_are_shared() {
        let mut scene = scene();
        let mut root = GroupNode::new("root");
        root.children.push(mesh_node("a", "stone", Matrix4::identity()));
        root.children.push(mesh_node("b", "stone", Matrix4::identity()));
        scene.add_node_tree(SceneNode::Group(root));

        // default + stone
        assert_eq!(scene.get_statistics().material_count, 2);
        assert_eq!(
            scene.objects[0].get_material_id(),
            scene.objects[1].get_material_id()
        );
    }

    #[test]
    fn test_statistics() {
        let mut scene = scene();
        scene.add_geometry("box", &generate_box(1.0, 1.0, 1.0), "default");
        let stats = scene.get_statistics();
        assert_eq!(stats.object_count, 1);
        assert_eq!(stats.total_triangles, 12);
        assert_eq!(stats.total_vertices, 24);
    }
}
