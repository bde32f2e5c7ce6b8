//! Lighting panel
//!
//! Live controls for the scene lights, the custom Lambert materials and the
//! spinning objects.

use cgmath::Vector3;

use crate::gfx::lighting::NormalTransform;
use crate::gfx::resources::material::Shading;
use crate::gfx::scene::Scene;
use crate::presets::{ScenePreset, SPIN_SPEED};

/// Builds the lighting panel
///
/// Returns true when a material was edited, in which case the caller has to
/// re-upload material uniforms before drawing. Light edits need no upload
/// because the global uniform is rebuilt every frame.
pub fn lighting_panel(ui: &imgui::Ui, scene: &mut Scene, preset: ScenePreset) -> bool {
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return false;
    }

    let mut materials_changed = false;

    ui.window("Lighting")
        .size([360.0, 480.0], imgui::Condition::FirstUseEver)
        .position([20.0, 20.0], imgui::Condition::FirstUseEver)
        .resizable(true)
        .collapsible(true)
        .build(|| {
            render_frame_info(ui, scene, preset);
            ui.separator();
            render_spin_controls(ui, scene);
            ui.separator();
            render_light_controls(ui, scene);
            ui.separator();
            materials_changed = render_custom_materials(ui, scene);
        });

    materials_changed
}

fn render_frame_info(ui: &imgui::Ui, scene: &Scene, preset: ScenePreset) {
    let framerate = ui.io().framerate;
    let frame_ms = if framerate > 0.0 { 1000.0 / framerate } else { 0.0 };
    let stats = scene.get_statistics();

    ui.text(format!("Step: {}", preset.name()));
    ui.text(format!("{:.2} ms/frame ({:.0} FPS)", frame_ms, framerate));
    ui.text(format!(
        "{} objects, {} triangles",
        stats.object_count, stats.total_triangles
    ));
}

fn render_spin_controls(ui: &imgui::Ui, scene: &mut Scene) {
    ui.checkbox("Pause spinning", &mut scene.spin_paused);

    if ui.button("Spin all") {
        for object in &mut scene.objects {
            object.spin = Vector3::new(SPIN_SPEED, SPIN_SPEED, 0.0);
        }
    }
    ui.same_line();
    if ui.button("Stop all") {
        for object in &mut scene.objects {
            object.spin = Vector3::new(0.0, 0.0, 0.0);
        }
    }
}

fn render_light_controls(ui: &imgui::Ui, scene: &mut Scene) {
    if !ui.collapsing_header("Scene lights", imgui::TreeNodeFlags::DEFAULT_OPEN) {
        return;
    }

    let lights = &mut scene.lights;
    ui.slider("Ambient", 0.0, 1.0, &mut lights.ambient.intensity);
    ui.slider("Directional", 0.0, 2.0, &mut lights.directional.intensity);

    let mut position: [f32; 3] = lights.directional.position.into();
    if ui
        .slider_config("Light position", -10.0, 10.0)
        .build_array(&mut position)
    {
        lights.directional.position = position.into();
    }
}

fn render_custom_materials(ui: &imgui::Ui, scene: &mut Scene) -> bool {
    if !ui.collapsing_header("Custom materials", imgui::TreeNodeFlags::DEFAULT_OPEN) {
        return false;
    }

    let mut changed = false;
    let mut any = false;

    for material in scene.material_manager.materials_mut() {
        let Shading::LambertCustom(custom) = &mut material.shading else {
            continue;
        };
        any = true;

        ui.text(&material.name);

        changed |= ui.slider(
            format!("Ambient##{}", material.name),
            0.0,
            1.0,
            &mut custom.ambient_intensity,
        );

        let mut position: [f32; 3] = custom.light_position.into();
        if ui
            .slider_config(format!("Light##{}", material.name), -5.0, 5.0)
            .build_array(&mut position)
        {
            custom.light_position = position.into();
            changed = true;
        }

        let mut use_model = custom.normal_transform == NormalTransform::ModelMatrix;
        if ui.checkbox(format!("Model matrix normals##{}", material.name), &mut use_model) {
            custom.normal_transform = if use_model {
                NormalTransform::ModelMatrix
            } else {
                NormalTransform::NormalMatrix
            };
            changed = true;
        }
        ui.spacing();
    }

    if !any {
        ui.text_disabled("No custom materials in this step");
    }

    changed
}
