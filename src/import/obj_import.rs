//! Wavefront OBJ import
//!
//! One group per file with a mesh per OBJ model. The MTL diffuse color and
//! diffuse map (`Kd` / `map_Kd`) become a Lambert material.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use cgmath::{Matrix4, SquareMatrix};

use crate::error::{Result, TattieError};
use crate::gfx::geometry::GeometryData;
use crate::gfx::lighting::Color;
use crate::gfx::resources::{material::Shading, texture_asset::TextureAsset};
use crate::gfx::scene::node::{GroupNode, MeshNode, NodeMaterial, NodeTexture, SceneNode};

use super::gltf_import::model_name;

/// Loads an `.obj` file (and its `.mtl`, when present) into a node tree
pub fn import_obj<P: AsRef<Path>>(path: P) -> Result<SceneNode> {
    let path = path.as_ref();
    log::debug!("Importing OBJ from {:?}", path);

    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|source| TattieError::ObjImport {
        path: path.to_path_buf(),
        source,
    })?;

    let materials = materials.unwrap_or_else(|error| {
        log::warn!("No usable MTL for {:?} ({}), using default materials", path, error);
        Vec::new()
    });

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut textures: HashMap<String, NodeTexture> = HashMap::new();
    let mut root = GroupNode::new(model_name(path));

    for (index, model) in models.iter().enumerate() {
        let mesh = &model.mesh;

        let mut geometry = GeometryData::new();
        geometry.vertices = mesh
            .positions
            .chunks_exact(3)
            .map(|p| [p[0], p[1], p[2]])
            .collect();
        // OBJ puts the texture origin at the bottom left
        geometry.tex_coords = mesh
            .texcoords
            .chunks_exact(2)
            .map(|t| [t[0], 1.0 - t[1]])
            .collect();
        geometry.indices = mesh.indices.clone();
        if let Some(index) = geometry.out_of_range_index() {
            return Err(TattieError::InvalidMesh {
                name: model.name.clone(),
                detail: format!(
                    "index {} out of range for {} vertices",
                    index,
                    geometry.vertices.len()
                ),
            });
        }
        if !mesh.normals.is_empty() && mesh.normals.len() == mesh.positions.len() {
            geometry.normals = mesh.normals.chunks_exact(3).map(|n| [n[0], n[1], n[2]]).collect();
        } else {
            geometry.compute_vertex_normals();
        }

        let material = match mesh.material_id.and_then(|id| materials.get(id).map(|m| (id, m))) {
            Some((id, mtl)) => obj_material(id, mtl, base_dir, &mut textures)?,
            None => NodeMaterial {
                name: "obj_default".to_string(),
                shading: Shading::Lambert {
                    color: Color::linear(0.8, 0.8, 0.8),
                    texture: None,
                },
                diffuse_map: None,
            },
        };

        let name = if model.name.is_empty() {
            format!("model_{}", index)
        } else {
            model.name.clone()
        };

        root.children.push(SceneNode::Mesh(MeshNode {
            name,
            geometry,
            material,
            transform: Matrix4::identity(),
        }));
    }

    let root = SceneNode::Group(root);
    log::info!(
        "Imported {} meshes and {} textures from {:?}",
        root.mesh_count(),
        textures.len(),
        path
    );
    Ok(root)
}

fn obj_material(
    index: usize,
    mtl: &tobj::Material,
    base_dir: &Path,
    textures: &mut HashMap<String, NodeTexture>,
) -> Result<NodeMaterial> {
    let name = if mtl.name.is_empty() {
        format!("material_{}", index)
    } else {
        mtl.name.clone()
    };

    // Kd is picked by eye, so it is display encoded
    let [r, g, b] = mtl.diffuse.unwrap_or([0.8, 0.8, 0.8]);

    let diffuse_map = match &mtl.diffuse_texture {
        Some(file) if !file.is_empty() => Some(match textures.get(file) {
            Some(texture) => texture.clone(),
            None => {
                let texture_path = base_dir.join(file);
                let texture = NodeTexture {
                    id: texture_path.display().to_string(),
                    asset: Arc::new(TextureAsset::load(&texture_path)?),
                };
                textures.insert(file.clone(), texture.clone());
                texture
            }
        }),
        _ => None,
    };

    Ok(NodeMaterial {
        name,
        shading: Shading::Lambert {
            color: Color::from_srgb(r, g, b),
            texture: diffuse_map.as_ref().map(|texture| texture.id.clone()),
        },
        diffuse_map,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const QUAD_OBJ: &str = "\
o quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
f 1/1 2/2 3/3 4/4
";

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("tattie-obj-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_import_quad() {
        let path = write_temp("quad.obj", QUAD_OBJ);
        let root = import_obj(&path).unwrap();
        assert_eq!(root.name(), "quad");
        assert_eq!(root.mesh_count(), 1);

        let SceneNode::Group(group) = root else {
            panic!("OBJ root must be a group");
        };
        let SceneNode::Mesh(mesh) = &group.children[0] else {
            panic!("OBJ models must be meshes");
        };
        assert_eq!(mesh.name, "quad");
        // the quad is triangulated
        assert_eq!(mesh.geometry.indices.len(), 6);
        assert_eq!(mesh.geometry.vertices.len(), 4);
        // v is flipped to a top-left origin
        assert_relative_eq!(mesh.geometry.tex_coords[0][1], 1.0);
        assert_relative_eq!(mesh.geometry.normals[0][2], 1.0);
        assert_eq!(mesh.material.name, "obj_default");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = import_obj("does/not/exist.obj");
        assert!(matches!(result, Err(TattieError::ObjImport { .. })));
    }
}
