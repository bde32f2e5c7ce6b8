//! Scene node trees produced by model import
//!
//! Imported models arrive as a tree of groups and meshes. The tree is a
//! closed sum type: code that needs to touch only meshes implements
//! [`NodeVisitor`] instead of inspecting nodes at runtime. Once a tree is
//! ready it is flattened into scene objects by [`Scene::add_node_tree`].
//!
//! [`Scene::add_node_tree`]: super::Scene::add_node_tree

use std::sync::Arc;

use cgmath::{Matrix4, SquareMatrix};

use crate::gfx::geometry::GeometryData;
use crate::gfx::resources::material::{CustomLambert, Shading};
use crate::gfx::resources::texture_asset::TextureAsset;
use crate::gfx::resources::texture_library::TextureId;

/// A texture an imported material refers to, with its decoded pixels
#[derive(Debug, Clone)]
pub struct NodeTexture {
    pub id: TextureId,
    pub asset: Arc<TextureAsset>,
}

#[derive(Debug, Clone)]
pub struct NodeMaterial {
    pub name: String,
    pub shading: Shading,
    /// The diffuse/base-color map, whatever `shading` currently samples
    pub diffuse_map: Option<NodeTexture>,
}

#[derive(Debug, Clone)]
pub struct MeshNode {
    pub name: String,
    pub geometry: GeometryData,
    pub material: NodeMaterial,
    pub transform: Matrix4<f32>,
}

#[derive(Debug, Clone)]
pub struct GroupNode {
    pub name: String,
    pub transform: Matrix4<f32>,
    pub children: Vec<SceneNode>,
}

impl GroupNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Matrix4::identity(),
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum SceneNode {
    Mesh(MeshNode),
    Group(GroupNode),
}

pub trait NodeVisitor {
    fn visit_mesh(&mut self, mesh: &mut MeshNode);

    fn visit_group(&mut self, _group: &mut GroupNode) {}
}

impl SceneNode {
    pub fn name(&self) -> &str {
        match self {
            SceneNode::Mesh(mesh) => &mesh.name,
            SceneNode::Group(group) => &group.name,
        }
    }

    pub fn transform(&self) -> Matrix4<f32> {
        match self {
            SceneNode::Mesh(mesh) => mesh.transform,
            SceneNode::Group(group) => group.transform,
        }
    }

    /// Depth-first traversal, parents before children
    pub fn accept<V: NodeVisitor + ?Sized>(&mut self, visitor: &mut V) {
        match self {
            SceneNode::Mesh(mesh) => visitor.visit_mesh(mesh),
            SceneNode::Group(group) => {
                visitor.visit_group(group);
                for child in &mut group.children {
                    child.accept(visitor);
                }
            }
        }
    }

    pub fn mesh_count(&self) -> usize {
        match self {
            SceneNode::Mesh(_) => 1,
            SceneNode::Group(group) => group.children.iter().map(SceneNode::mesh_count).sum(),
        }
    }
}

/// Puts every mesh of a tree on the custom Lambert shader
///
/// Each mesh keeps sampling its own original diffuse map, so a model with
/// many textures stays textured per mesh. Groups are left alone.
pub struct MaterialSubstitution {
    pub material: CustomLambert,
    pub replaced: usize,
}

impl MaterialSubstitution {
    pub fn new(material: CustomLambert) -> Self {
        Self {
            material,
            replaced: 0,
        }
    }
}

impl NodeVisitor for MaterialSubstitution {
    fn visit_mesh(&mut self, mesh: &mut MeshNode) {
        let diffuse = mesh
            .material
            .diffuse_map
            .as_ref()
            .map(|texture| texture.id.clone());

        mesh.material.shading = Shading::LambertCustom(CustomLambert {
            diffuse,
            ..self.material.clone()
        });
        self.replaced += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_box;
    use crate::gfx::lighting::Color;
    use crate::gfx::resources::material::ShadingModel;

    fn mesh(name: &str, texture: Option<&str>) -> SceneNode {
        let diffuse_map = texture.map(|id| NodeTexture {
            id: id.to_string(),
            asset: Arc::new(TextureAsset::solid(id, [200, 100, 50, 255])),
        });
        SceneNode::Mesh(MeshNode {
            name: name.to_string(),
            geometry: generate_box(1.0, 1.0, 1.0),
            material: NodeMaterial {
                name: format!("{}_material", name),
                shading: Shading::Lambert {
                    color: Color::WHITE,
                    texture: texture.map(str::to_string),
                },
                diffuse_map,
            },
            transform: Matrix4::identity(),
        })
    }

    fn tree() -> SceneNode {
        let mut inner = GroupNode::new("inner");
        inner.children.push(mesh("roof", Some("roof.png")));
        inner.children.push(mesh("wall", Some("wall.png")));

        let mut root = GroupNode::new("root");
        root.children.push(mesh("ground", None));
        root.children.push(SceneNode::Group(inner));
        SceneNode::Group(root)
    }

    struct NameCollector(Vec<String>);

    impl NodeVisitor for NameCollector {
        fn visit_mesh(&mut self, mesh: &mut MeshNode) {
            self.0.push(mesh.name.clone());
        }

        fn visit_group(&mut self, group: &mut GroupNode) {
            self.0.push(format!("[{}]", group.name));
        }
    }

    #[test]
    fn test_traversal_order() {
        let mut root = tree();
        let mut collector = NameCollector(Vec::new());
        root.accept(&mut collector);
        assert_eq!(
            collector.0,
            vec!["[root]", "ground", "[inner]", "roof", "wall"]
        );
        assert_eq!(root.mesh_count(), 3);
    }

    #[test]
    fn test_substitution_keeps_each_mesh_texture() {
        let mut root = tree();
        let mut substitution = MaterialSubstitution::new(CustomLambert::default());
        root.accept(&mut substitution);
        assert_eq!(substitution.replaced, 3);

        let mut diffuse = Vec::new();
        struct Check<'a>(&'a mut Vec<Option<String>>);
        impl NodeVisitor for Check<'_> {
            fn visit_mesh(&mut self, mesh: &mut MeshNode) {
                assert_eq!(mesh.material.shading.model(), ShadingModel::LambertCustom);
                self.0.push(mesh.material.shading.texture().cloned());
            }
        }
        root.accept(&mut Check(&mut diffuse));

        assert_eq!(
            diffuse,
            vec![None, Some("roof.png".to_string()), Some("wall.png".to_string())]
        );
    }

    #[test]
    fn test_substitution_leaves_groups_alone() {
        let mut root = tree();
        let before = root.transform();
        root.accept(&mut MaterialSubstitution::new(CustomLambert::default()));
        assert_eq!(root.name(), "root");
        assert_eq!(root.transform(), before);
    }
}
