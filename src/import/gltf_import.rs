//! glTF 2.0 import
//!
//! Nodes become groups (or a single mesh when a node holds exactly one
//! primitive and has no children), primitives become meshes. Base color
//! factors and textures are carried over as Lambert materials; everything
//! else a glTF material can express is dropped.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use cgmath::{Matrix4, SquareMatrix};

use crate::error::{Result, TattieError};
use crate::gfx::geometry::GeometryData;
use crate::gfx::lighting::{Color, ColorEncoding};
use crate::gfx::resources::{
    material::Shading,
    texture_asset::{SamplerSettings, TextureAsset},
};
use crate::gfx::scene::node::{GroupNode, MeshNode, NodeMaterial, NodeTexture, SceneNode};

/// Loads a `.gltf` or `.glb` file into a node tree
pub fn import_gltf<P: AsRef<Path>>(path: P) -> Result<SceneNode> {
    let path = path.as_ref();
    log::debug!("Importing glTF from {:?}", path);

    let (document, buffers, images) =
        gltf::import(path).map_err(|source| TattieError::GltfImport {
            path: path.to_path_buf(),
            source,
        })?;

    let mut importer = GltfImporter {
        source: path.display().to_string(),
        buffers: &buffers,
        images: &images,
        textures: HashMap::new(),
    };

    let mut root = GroupNode::new(model_name(path));
    if let Some(scene) = document
        .default_scene()
        .or_else(|| document.scenes().next())
    {
        for node in scene.nodes() {
            root.children.push(importer.node(&node)?);
        }
    }

    let root = SceneNode::Group(root);
    log::info!(
        "Imported {} meshes and {} textures from {:?}",
        root.mesh_count(),
        importer.textures.len(),
        path
    );
    Ok(root)
}

pub(crate) fn model_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string())
}

struct GltfImporter<'a> {
    source: String,
    buffers: &'a [gltf::buffer::Data],
    images: &'a [gltf::image::Data],
    /// Decoded images by glTF image index, shared between materials
    textures: HashMap<usize, NodeTexture>,
}

impl GltfImporter<'_> {
    fn node(&mut self, node: &gltf::Node) -> Result<SceneNode> {
        let name = node
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("node_{}", node.index()));
        let transform = Matrix4::from(node.transform().matrix());

        let mut meshes = Vec::new();
        if let Some(mesh) = node.mesh() {
            let mesh_name = mesh.name().unwrap_or(&name).to_string();
            for primitive in mesh.primitives() {
                if let Some(mesh_node) = self.primitive(&mesh_name, &primitive)? {
                    meshes.push(mesh_node);
                }
            }
        }

        if meshes.len() == 1 && node.children().next().is_none() {
            if let Some(mut mesh) = meshes.pop() {
                mesh.transform = transform;
                return Ok(SceneNode::Mesh(mesh));
            }
        }

        let mut group = GroupNode::new(name);
        group.transform = transform;
        group.children.extend(meshes.into_iter().map(SceneNode::Mesh));
        for child in node.children() {
            group.children.push(self.node(&child)?);
        }
        Ok(SceneNode::Group(group))
    }

    fn primitive(&mut self, name: &str, primitive: &gltf::Primitive) -> Result<Option<MeshNode>> {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::warn!(
                "Skipping primitive of '{}': {:?} is not supported",
                name,
                primitive.mode()
            );
            return Ok(None);
        }

        let buffers = self.buffers;
        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()].0[..]));

        let Some(positions) = reader.read_positions() else {
            log::warn!("Skipping primitive of '{}': no positions", name);
            return Ok(None);
        };

        let mut geometry = GeometryData::new();
        geometry.vertices = positions.collect();
        geometry.indices = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..geometry.vertices.len() as u32).collect(),
        };
        if let Some(index) = geometry.out_of_range_index() {
            return Err(TattieError::InvalidMesh {
                name: name.to_string(),
                detail: format!(
                    "index {} out of range for {} vertices",
                    index,
                    geometry.vertices.len()
                ),
            });
        }
        if let Some(tex_coords) = reader.read_tex_coords(0) {
            geometry.tex_coords = tex_coords.into_f32().collect();
        }
        match reader.read_normals() {
            Some(normals) => geometry.normals = normals.collect(),
            None => geometry.compute_vertex_normals(),
        }

        let material = self.material(&primitive.material())?;
        Ok(Some(MeshNode {
            name: name.to_string(),
            geometry,
            material,
            transform: Matrix4::identity(),
        }))
    }

    fn material(&mut self, material: &gltf::Material) -> Result<NodeMaterial> {
        let name = match (material.name(), material.index()) {
            (Some(name), _) => name.to_string(),
            (None, Some(index)) => format!("material_{}", index),
            (None, None) => "gltf_default".to_string(),
        };

        let pbr = material.pbr_metallic_roughness();
        let [r, g, b, _] = pbr.base_color_factor();

        let diffuse_map = match pbr.base_color_texture() {
            Some(info) => Some(self.texture(&info.texture())?),
            None => None,
        };

        Ok(NodeMaterial {
            name,
            shading: Shading::Lambert {
                // glTF factors are linear already
                color: Color::linear(r, g, b),
                texture: diffuse_map.as_ref().map(|texture| texture.id.clone()),
            },
            diffuse_map,
        })
    }

    fn texture(&mut self, texture: &gltf::Texture) -> Result<NodeTexture> {
        let index = texture.source().index();
        if let Some(existing) = self.textures.get(&index) {
            return Ok(existing.clone());
        }

        let id = format!("{}#image{}", self.source, index);
        let image = self.images.get(index).ok_or_else(|| TattieError::ImageLayout {
            name: id.clone(),
            detail: "image index out of range".to_string(),
        })?;

        let data = to_rgba8(&id, image)?;
        let asset = TextureAsset::from_rgba(&id, image.width, image.height, data, ColorEncoding::Srgb)?
            .with_sampler(sampler_settings(&texture.sampler()));

        let node_texture = NodeTexture {
            id,
            asset: Arc::new(asset),
        };
        self.textures.insert(index, node_texture.clone());
        Ok(node_texture)
    }
}

fn sampler_settings(sampler: &gltf::texture::Sampler) -> SamplerSettings {
    use gltf::texture::{MagFilter, WrappingMode};

    let filter = match sampler.mag_filter() {
        Some(MagFilter::Nearest) => wgpu::FilterMode::Nearest,
        Some(MagFilter::Linear) | None => wgpu::FilterMode::Linear,
    };
    let address_mode = match sampler.wrap_s() {
        WrappingMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        WrappingMode::MirroredRepeat => wgpu::AddressMode::MirrorRepeat,
        WrappingMode::Repeat => wgpu::AddressMode::Repeat,
    };

    SamplerSettings {
        filter,
        address_mode,
    }
}

/// Expands a decoded glTF image to tightly packed RGBA8
///
/// 16-bit channels keep their high byte. Float images are rejected.
pub(crate) fn to_rgba8(name: &str, image: &gltf::image::Data) -> Result<Vec<u8>> {
    use gltf::image::Format;

    let pixels = &image.pixels;
    let rgba = match image.format {
        Format::R8G8B8A8 => pixels.clone(),
        Format::R8G8B8 => pixels
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        Format::R8G8 => pixels
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[1], 0, 255])
            .collect(),
        Format::R8 => pixels.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        Format::R16G16B16A16 => pixels
            .chunks_exact(8)
            .flat_map(|p| [p[1], p[3], p[5], p[7]])
            .collect(),
        Format::R16G16B16 => pixels
            .chunks_exact(6)
            .flat_map(|p| [p[1], p[3], p[5], 255])
            .collect(),
        Format::R16G16 => pixels
            .chunks_exact(4)
            .flat_map(|p| [p[1], p[3], 0, 255])
            .collect(),
        Format::R16 => pixels
            .chunks_exact(2)
            .flat_map(|p| [p[1], p[1], p[1], 255])
            .collect(),
        other => {
            return Err(TattieError::ImageLayout {
                name: name.to_string(),
                detail: format!("{:?} images are not supported", other),
            })
        }
    };
    Ok(rgba)
}
