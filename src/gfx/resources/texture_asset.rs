//! CPU-side texture images
//!
//! A [`TextureAsset`] is decoded RGBA8 pixel data plus the color encoding
//! of those pixels and the sampler state it wants on the GPU. Loading never
//! touches the GPU, so assets can be prepared before the window exists.

use std::path::Path;

use crate::error::{Result, TattieError};
use crate::gfx::lighting::ColorEncoding;

/// Filtering and addressing for a texture's sampler
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerSettings {
    pub filter: wgpu::FilterMode,
    pub address_mode: wgpu::AddressMode,
}

impl Default for SamplerSettings {
    /// Nearest-neighbour filtering for a blocky look, clamped at the edges
    fn default() -> Self {
        Self {
            filter: wgpu::FilterMode::Nearest,
            address_mode: wgpu::AddressMode::ClampToEdge,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextureAsset {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 rows, top row first
    pub data: Vec<u8>,
    pub encoding: ColorEncoding,
    pub sampler: SamplerSettings,
}

impl TextureAsset {
    /// Loads an image file as an sRGB-encoded color texture
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading texture from {:?}", path);

        let image = image::open(path).map_err(|source| TattieError::TextureLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();

        log::info!("Loaded texture {}x{} from {:?}", width, height, path);

        Ok(Self {
            name: path.display().to_string(),
            width,
            height,
            data: rgba.into_raw(),
            encoding: ColorEncoding::Srgb,
            sampler: SamplerSettings::default(),
        })
    }

    /// Wraps raw RGBA8 pixels, checking that the buffer matches the size
    pub fn from_rgba(
        name: impl Into<String>,
        width: u32,
        height: u32,
        data: Vec<u8>,
        encoding: ColorEncoding,
    ) -> Result<Self> {
        let name = name.into();
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || data.len() != expected {
            return Err(TattieError::ImageLayout {
                name,
                detail: format!(
                    "{}x{} RGBA8 needs {} bytes, got {}",
                    width,
                    height,
                    expected,
                    data.len()
                ),
            });
        }

        Ok(Self {
            name,
            width,
            height,
            data,
            encoding,
            sampler: SamplerSettings::default(),
        })
    }

    /// A 1x1 texture of a single color
    pub fn solid(name: impl Into<String>, rgba: [u8; 4]) -> Self {
        Self {
            name: name.into(),
            width: 1,
            height: 1,
            data: rgba.to_vec(),
            encoding: ColorEncoding::Linear,
            sampler: SamplerSettings::default(),
        }
    }

    pub fn with_encoding(mut self, encoding: ColorEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_sampler(mut self, sampler: SamplerSettings) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn texel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let mut texel = [0u8; 4];
        texel.copy_from_slice(&self.data[offset..offset + 4]);
        Some(texel)
    }

    /// Texel color in linear space, as the shaders see it after decoding
    pub fn linear_texel(&self, x: u32, y: u32) -> Option<[f32; 3]> {
        self.texel(x, y).map(|t| {
            let rgb = [t[0], t[1], t[2]].map(|c| c as f32 / 255.0);
            rgb.map(|c| self.encoding.decode(c))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_rgba_rejects_wrong_size() {
        let err = TextureAsset::from_rgba("bad", 2, 2, vec![0; 12], ColorEncoding::Srgb);
        assert!(matches!(err, Err(TattieError::ImageLayout { .. })));

        let err = TextureAsset::from_rgba("empty", 0, 4, Vec::new(), ColorEncoding::Srgb);
        assert!(err.is_err());
    }

    #[test]
    fn test_texel_lookup() {
        let data = vec![
            255, 0, 0, 255, // (0, 0)
            0, 255, 0, 255, // (1, 0)
            0, 0, 255, 255, // (0, 1)
            255, 255, 255, 255, // (1, 1)
        ];
        let asset = TextureAsset::from_rgba("quad", 2, 2, data, ColorEncoding::Linear).unwrap();
        assert_eq!(asset.texel(1, 0), Some([0, 255, 0, 255]));
        assert_eq!(asset.texel(0, 1), Some([0, 0, 255, 255]));
        assert_eq!(asset.texel(2, 0), None);
    }

    #[test]
    fn test_linear_texel_decodes_srgb() {
        let asset = TextureAsset::solid("grey", [128, 128, 128, 255]).with_encoding(ColorEncoding::Srgb);
        let texel = asset.linear_texel(0, 0).unwrap();
        assert_relative_eq!(texel[0], 0.2158605, epsilon = 1e-4);

        let raw = TextureAsset::solid("grey", [128, 128, 128, 255]);
        assert_relative_eq!(raw.linear_texel(0, 0).unwrap()[1], 128.0 / 255.0);
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let result = TextureAsset::load("does/not/exist.png");
        assert!(matches!(result, Err(TattieError::TextureLoad { .. })));
    }

    #[test]
    fn test_default_sampler_is_nearest() {
        let asset = TextureAsset::solid("white", [255; 4]);
        assert_eq!(asset.sampler.filter, wgpu::FilterMode::Nearest);
    }
}
