//! Viewer configuration and command line
//!
//! [`ViewerConfig`] is what the app runs on. The binary fills it from a
//! [`Cli`] parsed by clap; library users build it directly.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::gfx::lighting::{Color, ColorEncoding};
use crate::presets::{PresetAssets, ScenePreset};

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Written to the surface as is, without color conversion
    pub clear_color: Color,
    pub preset: ScenePreset,
    /// Replaces the preset's output encoding when set
    pub output_encoding: Option<ColorEncoding>,
    pub vsync: bool,
    pub show_ui: bool,
    pub assets: PresetAssets,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Tattie".to_string(),
            width: 1200,
            height: 800,
            clear_color: Color::linear(0.3, 0.35, 0.4),
            preset: ScenePreset::default(),
            output_encoding: None,
            vsync: true,
            show_ui: true,
            assets: PresetAssets::default(),
        }
    }
}

impl ViewerConfig {
    pub fn with_preset(mut self, preset: ScenePreset) -> Self {
        self.preset = preset;
        self
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// The output encoding the preset asks for, unless overridden
    pub fn output_encoding_for(&self, preset_encoding: ColorEncoding) -> ColorEncoding {
        self.output_encoding.unwrap_or(preset_encoding)
    }
}

/// Output encoding as spelled on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputEncodingArg {
    Linear,
    Srgb,
}

impl From<OutputEncodingArg> for ColorEncoding {
    fn from(arg: OutputEncodingArg) -> Self {
        match arg {
            OutputEncodingArg::Linear => ColorEncoding::Linear,
            OutputEncodingArg::Srgb => ColorEncoding::Srgb,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "tattie", version, about = "Step-by-step scene viewer on wgpu")]
pub struct Cli {
    /// Walkthrough step to show
    #[arg(short, long, value_enum, default_value_t = ScenePreset::Intro)]
    pub preset: ScenePreset,

    /// Color texture for the textured step
    #[arg(long)]
    pub texture: Option<PathBuf>,

    /// glTF or OBJ model to import into the textured step
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Override the preset's output encoding
    #[arg(long, value_enum)]
    pub output_encoding: Option<OutputEncodingArg>,

    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Present without waiting for vertical sync
    #[arg(long)]
    pub no_vsync: bool,

    /// Hide the lighting panel
    #[arg(long)]
    pub no_ui: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl From<Cli> for ViewerConfig {
    fn from(cli: Cli) -> Self {
        Self {
            width: cli.width,
            height: cli.height,
            preset: cli.preset,
            output_encoding: cli.output_encoding.map(ColorEncoding::from),
            vsync: !cli.no_vsync,
            show_ui: !cli.no_ui,
            assets: PresetAssets {
                texture: cli.texture,
                model: cli.model,
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!((config.width, config.height), (1200, 800));
        assert_eq!(config.clear_color, Color::linear(0.3, 0.35, 0.4));
        assert_relative_eq!(config.aspect(), 1.5);
        assert_eq!(config.output_encoding_for(ColorEncoding::Srgb), ColorEncoding::Srgb);
    }

    #[test]
    fn test_cli_defaults_match_config() {
        let cli = Cli::parse_from(["tattie"]);
        assert!(!cli.verbose);
        assert_eq!(ViewerConfig::from(cli), ViewerConfig::default());
    }

    #[test]
    fn test_cli_conversion() {
        let cli = Cli::parse_from([
            "tattie",
            "--preset",
            "custom-shader",
            "--output-encoding",
            "linear",
            "--model",
            "media/scene.gltf",
            "--no-vsync",
            "--no-ui",
        ]);
        let config = ViewerConfig::from(cli);

        assert_eq!(config.preset, ScenePreset::CustomShader);
        assert_eq!(config.output_encoding, Some(ColorEncoding::Linear));
        assert_eq!(config.output_encoding_for(ColorEncoding::Srgb), ColorEncoding::Linear);
        assert_eq!(config.assets.model, Some(PathBuf::from("media/scene.gltf")));
        assert!(config.assets.texture.is_none());
        assert!(!config.vsync);
        assert!(!config.show_ui);
    }

    #[test]
    fn test_zero_height_aspect() {
        let config = ViewerConfig {
            height: 0,
            ..Default::default()
        };
        assert_relative_eq!(config.aspect(), 1200.0);
    }
}
