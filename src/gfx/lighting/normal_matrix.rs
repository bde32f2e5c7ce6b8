//! Normal transformation matrix
//!
//! Normals must stay perpendicular to the surface after the model transform.
//! That takes the inverse-transpose of the model's linear part; a stale copy
//! goes wrong as soon as the object rotates or is scaled unevenly, so the
//! matrix is rebuilt every frame from the current model matrix.

use cgmath::{Matrix, Matrix3, Matrix4, SquareMatrix};

/// How the custom Lambert shader transforms vertex normals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalTransform {
    /// Use the host-computed inverse-transpose (always correct)
    #[default]
    NormalMatrix,
    /// Use the model matrix directly. Only correct while the model has no
    /// non-uniform scale; kept to reproduce the textured tutorial step.
    ModelMatrix,
}

impl NormalTransform {
    pub fn shader_flag(self) -> u32 {
        match self {
            NormalTransform::NormalMatrix => 0,
            NormalTransform::ModelMatrix => 1,
        }
    }
}

/// Upper-left 3x3 block of a 4x4 matrix
pub fn linear_part(model: &Matrix4<f32>) -> Matrix3<f32> {
    Matrix3::from_cols(model.x.truncate(), model.y.truncate(), model.z.truncate())
}

/// Computes the normal matrix (inverse-transpose of the upper-left 3x3)
///
/// A singular linear part (an axis scaled to zero) has no inverse; the plain
/// linear part is returned instead so the object still renders.
pub fn normal_matrix(model: &Matrix4<f32>) -> Matrix3<f32> {
    let linear = linear_part(model);
    match linear.invert() {
        Some(inverse) => inverse.transpose(),
        None => {
            log::warn!("Model matrix has a singular linear part; using it as the normal matrix");
            linear
        }
    }
}

/// std140 layout of a WGSL `mat3x3<f32>`: three columns padded to vec4
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct NormalMatrixUniform {
    pub cols: [[f32; 4]; 3],
}

impl From<Matrix3<f32>> for NormalMatrixUniform {
    fn from(m: Matrix3<f32>) -> Self {
        Self {
            cols: [
                [m.x.x, m.x.y, m.x.z, 0.0],
                [m.y.x, m.y.y, m.y.z, 0.0],
                [m.z.x, m.z.y, m.z.z, 0.0],
            ],
        }
    }
}

impl Default for NormalMatrixUniform {
    fn default() -> Self {
        Matrix3::identity().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use cgmath::{Deg, InnerSpace, Vector3};

    fn assert_mat3_eq(a: &Matrix3<f32>, b: &Matrix3<f32>) {
        let a: &[f32; 9] = a.as_ref();
        let b: &[f32; 9] = b.as_ref();
        for i in 0..9 {
            assert_abs_diff_eq!(a[i], b[i], epsilon = 1e-5);
        }
    }

    #[test]
    fn test_pure_rotation_is_its_own_normal_matrix() {
        let rotation = Matrix4::from_angle_x(Deg(33.0))
            * Matrix4::from_angle_y(Deg(-71.0))
            * Matrix4::from_angle_z(Deg(12.5));
        assert_mat3_eq(&normal_matrix(&rotation), &linear_part(&rotation));
    }

    #[test]
    fn test_translation_does_not_affect_normals() {
        let model = Matrix4::from_translation(Vector3::new(5.0, 0.0, -3.0));
        assert_mat3_eq(&normal_matrix(&model), &Matrix3::identity());
    }

    #[test]
    fn test_non_uniform_scale_keeps_normals_perpendicular() {
        let model = Matrix4::from_angle_z(Deg(30.0)) * Matrix4::from_nonuniform_scale(3.0, 1.0, 1.0);

        // a surface spanned by two tangents, with its normal
        let t1 = Vector3::new(1.0, 1.0, 0.0);
        let t2 = Vector3::new(0.0, 0.0, 1.0);
        let n = t1.cross(t2);

        let linear = linear_part(&model);
        let t1w = linear * t1;
        let t2w = linear * t2;

        let corrected = normal_matrix(&model) * n;
        assert_abs_diff_eq!(corrected.dot(t1w), 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(corrected.dot(t2w), 0.0, epsilon = 1e-5);

        // the plain model matrix skews the normal off the surface
        let skewed = linear * n;
        assert!(skewed.normalize().dot(t1w.normalize()).abs() > 1e-2);
    }

    #[test]
    fn test_singular_falls_back_to_linear_part() {
        let model = Matrix4::from_nonuniform_scale(1.0, 0.0, 1.0);
        assert_mat3_eq(&normal_matrix(&model), &linear_part(&model));
    }

    #[test]
    fn test_uniform_layout() {
        assert_eq!(std::mem::size_of::<NormalMatrixUniform>(), 48);
        let uniform = NormalMatrixUniform::from(Matrix3::from_cols(
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(4.0, 5.0, 6.0),
            Vector3::new(7.0, 8.0, 9.0),
        ));
        assert_eq!(uniform.cols[1], [4.0, 5.0, 6.0, 0.0]);
    }

    #[test]
    fn test_shader_flags() {
        assert_eq!(NormalTransform::default(), NormalTransform::NormalMatrix);
        assert_eq!(NormalTransform::ModelMatrix.shader_flag(), 1);
    }
}
