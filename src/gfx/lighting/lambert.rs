//! Reference implementation of the ambient + Lambert diffuse model
//!
//! Mirrors `lambert_custom.wgsl` on the CPU so the shading rules can be
//! checked without a GPU. Custom Lambert materials hand their parameters over
//! as [`LambertParams`].

use cgmath::{InnerSpace, Vector3};

use super::color::{Color, ColorEncoding};

/// Inputs of the hand-written Lambert shader
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertParams {
    /// Constant ambient term, usually in `[0, 1]`
    pub ambient_intensity: f32,
    /// Direction towards the light; any magnitude, normalized before use
    pub light_direction: Vector3<f32>,
    /// Light color in linear space
    pub light_color: Color,
    /// Object color in linear space
    pub object_color: Color,
}

impl Default for LambertParams {
    fn default() -> Self {
        Self {
            ambient_intensity: 0.2,
            light_direction: Vector3::new(1.0, 1.0, 1.0),
            light_color: Color::WHITE,
            object_color: Color::WHITE,
        }
    }
}

/// Diffuse factor `max(dot(n, normalize(l)), 0)`
///
/// `normal` is expected to be unit length already. Surfaces facing away from
/// the light get exactly zero. A zero light vector yields zero as well.
pub fn lambert_diffuse(normal: Vector3<f32>, light_direction: Vector3<f32>) -> f32 {
    if light_direction.magnitude2() == 0.0 {
        return 0.0;
    }
    let l = light_direction.normalize();
    normal.dot(l).max(0.0)
}

/// Shades one surface point, returning linear RGB
///
/// `(ambient + diffuse) * object_color * light_color * texel`. The texel is
/// expected to be linear already; pass `None` when no texture is bound. The
/// result is not clamped.
pub fn shade(params: &LambertParams, normal: Vector3<f32>, texel: Option<[f32; 3]>) -> [f32; 3] {
    let diffuse = lambert_diffuse(normal, params.light_direction);
    let intensity = params.ambient_intensity + diffuse;
    let base = params.object_color.to_array();
    let light = params.light_color.to_array();
    let tex = texel.unwrap_or([1.0, 1.0, 1.0]);

    [
        intensity * base[0] * light[0] * tex[0],
        intensity * base[1] * light[1] * tex[1],
        intensity * base[2] * light[2] * tex[2],
    ]
}

/// Shades one surface point and encodes it for the output surface
///
/// Channels are clamped to `[0, 1]` first, as a unorm render target would.
pub fn shade_display(
    params: &LambertParams,
    normal: Vector3<f32>,
    texel: Option<[f32; 3]>,
    output: ColorEncoding,
) -> [f32; 3] {
    shade(params, normal, texel).map(|c| output.encode(c.clamp(0.0, 1.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::lighting::color::srgb_to_linear;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_back_facing_gets_no_diffuse() {
        let n = Vector3::new(0.0, 0.0, 1.0);
        assert_eq!(lambert_diffuse(n, Vector3::new(0.0, 0.0, -1.0)), 0.0);
        assert_eq!(lambert_diffuse(n, Vector3::new(1.0, 0.0, 0.0)), 0.0);
        assert_eq!(lambert_diffuse(n, Vector3::new(0.3, 0.2, -5.0)), 0.0);
    }

    #[test]
    fn test_aligned_normal_gets_full_diffuse() {
        let n = Vector3::new(0.0, 0.0, 1.0);
        assert_abs_diff_eq!(lambert_diffuse(n, n), 1.0);

        let d = Vector3::new(1.0, 1.0, 1.0).normalize();
        assert_abs_diff_eq!(lambert_diffuse(d, d), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_light_magnitude_is_irrelevant() {
        let n = Vector3::new(0.0, 1.0, 0.0);
        let a = lambert_diffuse(n, Vector3::new(1.0, 1.0, 0.0));
        let b = lambert_diffuse(n, Vector3::new(40.0, 40.0, 0.0));
        assert_abs_diff_eq!(a, b, epsilon = 1e-6);
        assert_abs_diff_eq!(a, std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_light_vector() {
        assert_eq!(lambert_diffuse(Vector3::unit_z(), Vector3::new(0.0, 0.0, 0.0)), 0.0);
    }

    #[test]
    fn test_scenario_white_light_head_on() {
        let params = LambertParams {
            ambient_intensity: 0.2,
            light_direction: Vector3::new(0.0, 0.0, 1.0),
            ..Default::default()
        };
        let color = shade(&params, Vector3::new(0.0, 0.0, 1.0), None);
        for c in color {
            assert_abs_diff_eq!(c, 1.2, epsilon = 1e-6);
        }

        // over-bright values clamp at the output stage
        let display = shade_display(&params, Vector3::unit_z(), None, ColorEncoding::Srgb);
        for c in display {
            assert_abs_diff_eq!(c, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_monotonic_in_ambient() {
        let n = Vector3::new(0.0, 0.6, 0.8);
        let mut previous = [f32::MIN; 3];
        for step in 0..=20 {
            let params = LambertParams {
                ambient_intensity: step as f32 * 0.05,
                object_color: Color::linear(0.9, 0.5, 0.1),
                ..Default::default()
            };
            let color = shade(&params, n, Some([0.4, 0.7, 1.0]));
            for i in 0..3 {
                assert!(color[i] >= previous[i]);
            }
            previous = color;
        }
    }

    #[test]
    fn test_back_face_is_ambient_only() {
        let params = LambertParams {
            ambient_intensity: 0.25,
            object_color: Color::linear(0.5, 0.5, 0.5),
            ..Default::default()
        };
        let color = shade(&params, Vector3::new(-1.0, -1.0, -1.0).normalize(), None);
        for c in color {
            assert_abs_diff_eq!(c, 0.125, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_texel_multiplies() {
        let params = LambertParams {
            ambient_intensity: 0.0,
            light_direction: Vector3::unit_y(),
            ..Default::default()
        };
        let texel = [srgb_to_linear(0.5), 1.0, 0.0];
        let color = shade(&params, Vector3::unit_y(), Some(texel));
        assert_abs_diff_eq!(color[0], texel[0], epsilon = 1e-6);
        assert_abs_diff_eq!(color[1], 1.0, epsilon = 1e-6);
        assert_eq!(color[2], 0.0);
    }
}
