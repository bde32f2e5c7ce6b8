//! Named texture storage shared by all materials
//!
//! Assets are registered while a scene is assembled and uploaded together
//! once the GPU context exists. Materials refer to textures by id only.

use std::collections::HashMap;
use std::sync::Arc;

use super::texture_asset::TextureAsset;
use super::texture_resource::TextureResource;
use crate::gfx::lighting::ColorEncoding;

pub type TextureId = String;

struct GpuTexture {
    resource: TextureResource,
    encoding: ColorEncoding,
}

/// What a material binds for one texture slot
pub struct TextureBinding<'a> {
    pub resource: &'a TextureResource,
    pub encoding: ColorEncoding,
    /// False when the white fallback stands in for a missing texture
    pub present: bool,
}

#[derive(Default)]
pub struct TextureLibrary {
    assets: HashMap<TextureId, Arc<TextureAsset>>,
    uploaded: HashMap<TextureId, GpuTexture>,
    fallback: Option<TextureResource>,
}

impl TextureLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an asset under `id`
    ///
    /// The first registration wins; registering an id again keeps the
    /// existing image so shared textures are uploaded once.
    pub fn insert(&mut self, id: impl Into<TextureId>, asset: Arc<TextureAsset>) -> TextureId {
        let id = id.into();
        self.assets.entry(id.clone()).or_insert(asset);
        id
    }

    pub fn contains(&self, id: &str) -> bool {
        self.assets.contains_key(id)
    }

    pub fn asset(&self, id: &str) -> Option<&TextureAsset> {
        self.assets.get(id).map(|asset| asset.as_ref())
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Uploads every asset that is not on the GPU yet, plus the fallback
    pub fn upload_all(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        if self.fallback.is_none() {
            self.fallback = Some(TextureResource::white(device, queue));
        }

        for (id, asset) in &self.assets {
            if self.uploaded.contains_key(id) {
                continue;
            }
            log::debug!(
                "Uploading texture '{}' ({}x{}, {:?})",
                id,
                asset.width,
                asset.height,
                asset.encoding
            );
            self.uploaded.insert(
                id.clone(),
                GpuTexture {
                    resource: TextureResource::from_asset(device, queue, asset),
                    encoding: asset.encoding,
                },
            );
        }
    }

    /// Resolves a texture slot for binding
    ///
    /// Returns `None` only before [`TextureLibrary::upload_all`] has run.
    /// An unknown id resolves to the white fallback.
    pub fn binding(&self, id: Option<&str>) -> Option<TextureBinding<'_>> {
        if let Some(id) = id {
            if let Some(texture) = self.uploaded.get(id) {
                return Some(TextureBinding {
                    resource: &texture.resource,
                    encoding: texture.encoding,
                    present: true,
                });
            }
            log::warn!("Texture '{}' is not loaded, using the white fallback", id);
        }

        self.fallback.as_ref().map(|resource| TextureBinding {
            resource,
            encoding: ColorEncoding::Linear,
            present: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_insert_wins() {
        let mut library = TextureLibrary::new();
        let red = Arc::new(TextureAsset::solid("red", [255, 0, 0, 255]));
        let blue = Arc::new(TextureAsset::solid("blue", [0, 0, 255, 255]));

        let id = library.insert("albedo", red);
        library.insert("albedo", blue);

        assert_eq!(id, "albedo");
        assert_eq!(library.len(), 1);
        assert_eq!(library.asset("albedo").unwrap().name, "red");
    }

    #[test]
    fn test_binding_before_upload_is_none() {
        let mut library = TextureLibrary::new();
        library.insert("dirt", Arc::new(TextureAsset::solid("dirt", [90, 60, 30, 255])));
        assert!(library.contains("dirt"));
        assert!(library.binding(Some("dirt")).is_none());
        assert!(library.binding(None).is_none());
    }
}
