//! Scene lights: one ambient term and one directional light

use cgmath::{InnerSpace, Vector3, Zero};

use super::color::Color;

/// Uniform light added to every surface regardless of orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

impl AmbientLight {
    pub fn new(color: Color, intensity: f32) -> Self {
        Self { color, intensity }
    }

    /// Color premultiplied by intensity, as uploaded to the GPU
    pub fn radiance(&self) -> Color {
        self.color.scaled(self.intensity)
    }
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self::new(Color::WHITE, 0.2)
    }
}

/// Light arriving from a single direction
///
/// Like a sun, it is described by a position whose direction from the origin
/// is the light direction; the distance does not matter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub position: Vector3<f32>,
}

impl DirectionalLight {
    pub fn new(color: Color, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            position: Vector3::new(0.0, 1.0, 0.0),
        }
    }

    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vector3::new(x, y, z);
        self
    }

    /// Unit vector pointing from the surface towards the light
    pub fn direction(&self) -> Vector3<f32> {
        if self.position.is_zero() {
            Vector3::unit_y()
        } else {
            self.position.normalize()
        }
    }

    pub fn radiance(&self) -> Color {
        self.color.scaled(self.intensity)
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new(Color::WHITE, 1.0).with_position(1.0, 1.0, 1.0)
    }
}

/// The lights of a scene
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Lights {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
}

impl Lights {
    /// No light at all; engine-lit materials render black
    pub fn none() -> Self {
        Self {
            ambient: AmbientLight::new(Color::WHITE, 0.0),
            directional: DirectionalLight::new(Color::WHITE, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_direction_is_normalized() {
        let light = DirectionalLight::default().with_position(3.0, 0.0, 4.0);
        let d = light.direction();
        assert_abs_diff_eq!(d.magnitude(), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(d.x, 0.6, epsilon = 1e-6);
        assert_abs_diff_eq!(d.z, 0.8, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_position_points_up() {
        let light = DirectionalLight::default().with_position(0.0, 0.0, 0.0);
        assert_eq!(light.direction(), Vector3::unit_y());
    }

    #[test]
    fn test_radiance_scales_color() {
        let ambient = AmbientLight::default();
        assert_abs_diff_eq!(ambient.radiance().g, 0.2, epsilon = 1e-6);
        assert_eq!(Lights::none().directional.radiance(), Color::BLACK);
    }
}
