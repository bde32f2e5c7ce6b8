//! External model import
//!
//! Models are loaded into a [`SceneNode`] tree without touching the GPU.
//! [`import_with_substitution`] additionally puts every mesh of the model on
//! the custom Lambert shader, keeping each mesh's own diffuse map.

mod gltf_import;
mod obj_import;

use std::path::Path;

use crate::error::{Result, TattieError};
use crate::gfx::resources::material::CustomLambert;
use crate::gfx::scene::node::{MaterialSubstitution, SceneNode};

pub use gltf_import::import_gltf;
pub use obj_import::import_obj;

/// Imports a model, picking the loader from the file extension
pub fn import_model<P: AsRef<Path>>(path: P) -> Result<SceneNode> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());

    match extension.as_deref() {
        Some("gltf") | Some("glb") => import_gltf(path),
        Some("obj") => import_obj(path),
        _ => Err(TattieError::UnsupportedModel(path.to_path_buf())),
    }
}

/// Imports a model and substitutes `material` onto every mesh
pub fn import_with_substitution<P: AsRef<Path>>(
    path: P,
    material: CustomLambert,
) -> Result<SceneNode> {
    let mut root = import_model(path)?;
    let mut substitution = MaterialSubstitution::new(material);
    root.accept(&mut substitution);
    log::debug!(
        "Substituted the custom Lambert material on {} meshes of '{}'",
        substitution.replaced,
        root.name()
    );
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::resources::material::{Shading, ShadingModel};

    #[test]
    fn test_unknown_extension_is_rejected() {
        let result = import_model("scene.fbx");
        assert!(matches!(result, Err(TattieError::UnsupportedModel(_))));
        assert!(matches!(
            import_model("no_extension"),
            Err(TattieError::UnsupportedModel(_))
        ));
    }

    #[test]
    fn test_substitution_on_import() {
        let dir = std::env::temp_dir().join(format!("tattie-import-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tri.OBJ");
        std::fs::write(&path, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let mut root = import_with_substitution(&path, CustomLambert::default()).unwrap();
        assert_eq!(root.mesh_count(), 1);

        struct Models(Vec<ShadingModel>);
        impl crate::gfx::scene::node::NodeVisitor for Models {
            fn visit_mesh(&mut self, mesh: &mut crate::gfx::scene::node::MeshNode) {
                self.0.push(mesh.material.shading.model());
                assert!(matches!(
                    &mesh.material.shading,
                    Shading::LambertCustom(custom) if custom.diffuse.is_none()
                ));
            }
        }
        let mut models = Models(Vec::new());
        root.accept(&mut models);
        assert_eq!(models.0, vec![ShadingModel::LambertCustom]);
    }
}
