//! Scene presets
//!
//! Each preset rebuilds one step of the "creating a scene" walkthrough: the
//! same camera and clear color throughout, with shading, color handling and
//! assets added step by step.

use std::path::PathBuf;

use cgmath::Vector3;

use crate::error::Result;
use crate::gfx::{
    camera::{CameraController, CameraManager, OrbitCamera},
    geometry::{axes_helper, directional_light_helper, generate_box, generate_custom_box, generate_torus_knot},
    lighting::{Color, ColorEncoding, NormalTransform},
    resources::{
        material::{CustomLambert, Material},
        texture_asset::TextureAsset,
    },
    scene::Scene,
};
use crate::import::import_with_substitution;

/// Rotation speed of spinning objects, about 0.01 rad per frame at 60 Hz
pub const SPIN_SPEED: f32 = 0.6;

const ORANGE: [f32; 3] = [1.0, 0.85, 0.43];
const DIRT_TEXTURE: &str = "dirt";

/// The walkthrough steps, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ScenePreset {
    /// Spinning orange Lambert box, linear output
    #[default]
    Intro,
    /// Unlit box with a linearized color, sRGB output
    Basic,
    /// Orbit controls, light helper, Lambert box
    Lights,
    /// Hand-written box next to the engine box
    CustomGeometry,
    /// Hand-written Lambert shader next to the engine's
    CustomShader,
    /// Textured materials and optional model import
    Textured,
}

/// How the viewer must be set up for a preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetSettings {
    pub orbit_controls: bool,
    /// Encoding of the values written to the window
    pub output_encoding: ColorEncoding,
}

/// Files a preset may load
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresetAssets {
    /// Color texture for the textured step; a generated one is used if unset
    pub texture: Option<PathBuf>,
    /// glTF or OBJ model imported by the textured step
    pub model: Option<PathBuf>,
}

impl ScenePreset {
    pub const ALL: [ScenePreset; 6] = [
        ScenePreset::Intro,
        ScenePreset::Basic,
        ScenePreset::Lights,
        ScenePreset::CustomGeometry,
        ScenePreset::CustomShader,
        ScenePreset::Textured,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScenePreset::Intro => "Intro",
            ScenePreset::Basic => "Basic material",
            ScenePreset::Lights => "Lights and orbit controls",
            ScenePreset::CustomGeometry => "Custom geometry",
            ScenePreset::CustomShader => "Custom Lambert shader",
            ScenePreset::Textured => "Textures and model import",
        }
    }

    pub fn settings(self) -> PresetSettings {
        match self {
            ScenePreset::Intro => PresetSettings {
                orbit_controls: false,
                output_encoding: ColorEncoding::Linear,
            },
            ScenePreset::Basic => PresetSettings {
                orbit_controls: false,
                output_encoding: ColorEncoding::Srgb,
            },
            _ => PresetSettings {
                orbit_controls: true,
                output_encoding: ColorEncoding::Srgb,
            },
        }
    }

    /// Assembles the preset's scene
    ///
    /// Asset files are loaded here; a missing or broken file is an error.
    pub fn build(self, aspect: f32, assets: &PresetAssets) -> Result<(Scene, PresetSettings)> {
        let settings = self.settings();
        let mut scene = Scene::new(camera_manager(aspect, settings.orbit_controls));
        log::info!("Building preset '{}'", self.name());

        match self {
            ScenePreset::Intro => {
                scene.add_helper("axes", axes_helper(2.0));
                // Picked as a linear value on purpose: this step does no color management
                let orange = scene.add_material(Material::lambert("orange", Color::from(ORANGE)));
                scene
                    .add_geometry("box", &generate_box(1.0, 1.0, 1.0), &orange)
                    .spin = spin();
            }
            ScenePreset::Basic => {
                let orange = scene.add_material(Material::basic("orange", srgb_orange()));
                scene
                    .add_geometry("box", &generate_box(1.0, 1.0, 1.0), &orange)
                    .spin = spin();
            }
            ScenePreset::Lights => {
                add_light_helpers(&mut scene);
                let orange = scene.add_material(Material::lambert("orange", srgb_orange()));
                scene
                    .add_geometry("box", &generate_box(1.0, 1.0, 1.0), &orange)
                    .spin = spin();
            }
            ScenePreset::CustomGeometry => {
                add_light_helpers(&mut scene);
                let orange = scene.add_material(Material::lambert("orange", srgb_orange()));
                scene
                    .add_geometry("box", &generate_box(1.0, 1.0, 1.0), &orange)
                    .position = Vector3::new(2.0, 0.0, 0.0);
                scene.add_geometry("custom box", &generate_custom_box(), &orange);
            }
            ScenePreset::CustomShader => {
                add_light_helpers(&mut scene);
                let lambert = scene.add_material(Material::lambert("lambert", Color::WHITE));
                let custom = scene.add_material(Material::lambert_custom(
                    "lambert_custom",
                    CustomLambert::default(),
                ));
                add_comparison_objects(&mut scene, &lambert, &custom);
            }
            ScenePreset::Textured => {
                add_light_helpers(&mut scene);

                let texture = match &assets.texture {
                    Some(path) => TextureAsset::load(path)?,
                    None => {
                        log::info!("No texture given, using a generated dirt texture");
                        generated_dirt()
                    }
                };
                let dirt = scene.add_texture(DIRT_TEXTURE, texture);

                let custom_lambert = CustomLambert::default()
                    .with_light_position(1.0, 1.0, -1.0)
                    .with_normal_transform(NormalTransform::ModelMatrix);

                let lambert =
                    scene.add_material(Material::lambert("lambert", Color::WHITE).with_texture(&dirt));
                let custom = scene.add_material(Material::lambert_custom(
                    "lambert_custom",
                    custom_lambert.clone().with_diffuse(&dirt),
                ));
                add_comparison_objects(&mut scene, &lambert, &custom);

                if let Some(model) = &assets.model {
                    let root = import_with_substitution(model, custom_lambert)?;
                    let added = scene.add_node_tree(root);
                    log::info!("Added {} imported objects from {:?}", added, model);
                }
            }
        }

        Ok((scene, settings))
    }
}

impl std::fmt::Display for ScenePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn camera_manager(aspect: f32, orbit: bool) -> CameraManager {
    // Eye at (0, 0, 5) looking at the origin
    let camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::new(0.0, 0.0, 0.0), aspect);
    let controller = if orbit {
        CameraController::new(0.005, 0.1)
    } else {
        CameraController::disabled()
    };
    CameraManager::new(camera, controller)
}

fn spin() -> Vector3<f32> {
    Vector3::new(SPIN_SPEED, SPIN_SPEED, 0.0)
}

fn srgb_orange() -> Color {
    Color::from_srgb(ORANGE[0], ORANGE[1], ORANGE[2])
}

fn add_light_helpers(scene: &mut Scene) {
    scene.add_helper("axes", axes_helper(2.0));
    let light = scene.lights.directional;
    scene.add_helper(
        "directional light",
        directional_light_helper(light.position, 0.2, light.color.to_array()),
    );
}

/// Engine Lambert and custom Lambert side by side, on a box and a knot each
fn add_comparison_objects(scene: &mut Scene, lambert: &str, custom: &str) {
    let knot = generate_torus_knot(1.0, 0.4, 80, 20, 2, 3);

    scene.add_geometry("knot", &knot, lambert).position = Vector3::new(5.0, 0.0, -3.0);
    scene.add_geometry("custom knot", &knot, custom).position = Vector3::new(0.0, 0.0, -3.0);
    scene
        .add_geometry("box", &generate_box(1.0, 1.0, 1.0), lambert)
        .position = Vector3::new(2.0, 0.0, 0.0);
    scene.add_geometry("custom box", &generate_custom_box(), custom);
}

/// A blocky brown 16x16 texture standing in for `dirt.png`
fn generated_dirt() -> TextureAsset {
    const SIZE: u32 = 16;
    const SHADES: [[u8; 3]; 4] = [[134, 96, 67], [121, 85, 58], [150, 108, 74], [108, 77, 53]];

    let data = (0..SIZE * SIZE)
        .flat_map(|i| {
            let (x, y) = (i % SIZE, i / SIZE);
            let hash = x.wrapping_mul(73_856_093) ^ y.wrapping_mul(19_349_663);
            let [r, g, b] = SHADES[(hash % SHADES.len() as u32) as usize];
            [r, g, b, 255]
        })
        .collect();

    TextureAsset {
        name: "generated dirt".to_string(),
        width: SIZE,
        height: SIZE,
        data,
        encoding: ColorEncoding::Srgb,
        sampler: Default::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::resources::material::{Shading, ShadingModel};
    use approx::assert_relative_eq;

    fn build(preset: ScenePreset) -> (Scene, PresetSettings) {
        preset.build(1.5, &PresetAssets::default()).unwrap()
    }

    #[test]
    fn test_every_preset_builds() {
        for preset in ScenePreset::ALL {
            let (scene, _) = build(preset);
            assert!(scene.get_object_count() > 0, "{} has no objects", preset);
        }
    }

    #[test]
    fn test_intro_spins_with_linear_output() {
        let (scene, settings) = build(ScenePreset::Intro);
        assert_eq!(settings.output_encoding, ColorEncoding::Linear);
        assert!(!settings.orbit_controls);
        assert!(!scene.camera_manager.controller.enabled);
        assert_eq!(scene.objects[0].spin, Vector3::new(SPIN_SPEED, SPIN_SPEED, 0.0));
        assert_eq!(scene.helpers.len(), 1);

        let material = scene.get_material_for_object(&scene.objects[0]);
        assert_eq!(material.shading.color(), Color::linear(1.0, 0.85, 0.43));
    }

    #[test]
    fn test_basic_linearizes_color() {
        let (scene, settings) = build(ScenePreset::Basic);
        assert_eq!(settings.output_encoding, ColorEncoding::Srgb);

        let material = scene.get_material_for_object(&scene.objects[0]);
        assert_eq!(material.model(), ShadingModel::Basic);
        assert_relative_eq!(material.shading.color().r, 1.0, epsilon = 1e-6);
        assert!(material.shading.color().g < 0.85);
    }

    #[test]
    fn test_custom_shader_layout() {
        let (scene, settings) = build(ScenePreset::CustomShader);
        assert!(settings.orbit_controls);
        assert_eq!(scene.get_object_count(), 4);
        assert_eq!(scene.helpers.len(), 2);

        let knot = scene.find_object("knot").unwrap();
        assert_eq!(knot.position, Vector3::new(5.0, 0.0, -3.0));
        assert_eq!(scene.get_material_for_object(knot).model(), ShadingModel::Lambert);

        let custom_box = scene.find_object("custom box").unwrap();
        let Shading::LambertCustom(custom) = &scene.get_material_for_object(custom_box).shading
        else {
            panic!("custom box must use the custom shader");
        };
        assert_eq!(custom.normal_transform, NormalTransform::NormalMatrix);
        assert_relative_eq!(custom.ambient_intensity, 0.2);
    }

    #[test]
    fn test_textured_binds_dirt_everywhere() {
        let (scene, _) = build(ScenePreset::Textured);
        assert!(scene.textures.contains(DIRT_TEXTURE));

        for object in &scene.objects {
            let material = scene.get_material_for_object(object);
            assert_eq!(material.shading.texture().map(String::as_str), Some(DIRT_TEXTURE));
        }

        let custom_box = scene.find_object("custom box").unwrap();
        let Shading::LambertCustom(custom) = &scene.get_material_for_object(custom_box).shading
        else {
            panic!("custom box must use the custom shader");
        };
        assert_eq!(custom.normal_transform, NormalTransform::ModelMatrix);
        assert_eq!(custom.light_position, Vector3::new(1.0, 1.0, -1.0));
    }

    #[test]
    fn test_missing_texture_fails() {
        let assets = PresetAssets {
            texture: Some(PathBuf::from("does/not/exist.png")),
            model: None,
        };
        assert!(ScenePreset::Textured.build(1.0, &assets).is_err());
    }

    #[test]
    fn test_generated_dirt_is_srgb() {
        let dirt = generated_dirt();
        assert_eq!(dirt.data.len(), 16 * 16 * 4);
        assert_eq!(dirt.encoding, ColorEncoding::Srgb);
        assert_eq!(dirt.sampler.filter, wgpu::FilterMode::Nearest);
    }
}
