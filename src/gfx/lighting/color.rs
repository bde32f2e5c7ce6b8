//! Color spaces and the sRGB transfer functions
//!
//! All lighting math in Tattie runs on linear values. Colors that arrive
//! display-encoded (picked by eye, read from PNGs) are decoded on the way in,
//! and the final fragment color is encoded again on the way out.

/// Encoding of color values stored in a texture or written to the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorEncoding {
    /// Values are linear light; no transfer function applied
    #[default]
    Linear,
    /// Values are gamma compressed with the sRGB transfer function
    Srgb,
}

impl ColorEncoding {
    /// Flag value consumed by the WGSL shaders (`0` linear, `1` sRGB)
    pub fn shader_flag(self) -> u32 {
        match self {
            ColorEncoding::Linear => 0,
            ColorEncoding::Srgb => 1,
        }
    }

    /// Decodes a stored channel value into linear space
    pub fn decode(self, value: f32) -> f32 {
        match self {
            ColorEncoding::Linear => value,
            ColorEncoding::Srgb => srgb_to_linear(value),
        }
    }

    /// Encodes a linear channel value for storage or display
    pub fn encode(self, value: f32) -> f32 {
        match self {
            ColorEncoding::Linear => value,
            ColorEncoding::Srgb => linear_to_srgb(value),
        }
    }
}

/// sRGB electro-optical transfer function (display encoded -> linear)
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Inverse sRGB transfer function (linear -> display encoded)
pub fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

pub fn srgb_to_linear_rgb(rgb: [f32; 3]) -> [f32; 3] {
    rgb.map(srgb_to_linear)
}

pub fn linear_to_srgb_rgb(rgb: [f32; 3]) -> [f32; 3] {
    rgb.map(linear_to_srgb)
}

/// An RGB color in linear space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::linear(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::linear(0.0, 0.0, 0.0);

    /// Creates a color from values that are already linear
    pub const fn linear(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from display-encoded (sRGB) values, decoding them
    pub fn from_srgb(r: f32, g: f32, b: f32) -> Self {
        let [r, g, b] = srgb_to_linear_rgb([r, g, b]);
        Self { r, g, b }
    }

    /// Returns the display-encoded (sRGB) components of this color
    pub fn to_srgb(self) -> [f32; 3] {
        linear_to_srgb_rgb(self.to_array())
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Scales every channel, e.g. by a light intensity
    pub fn scaled(self, factor: f32) -> Self {
        Self::linear(self.r * factor, self.g * factor, self.b * factor)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl From<[f32; 3]> for Color {
    fn from(rgb: [f32; 3]) -> Self {
        Color::linear(rgb[0], rgb[1], rgb[2])
    }
}

impl From<Color> for [f32; 3] {
    fn from(color: Color) -> Self {
        color.to_array()
    }
}

impl From<Color> for wgpu::Color {
    fn from(color: Color) -> Self {
        wgpu::Color {
            r: color.r as f64,
            g: color.g as f64,
            b: color.b as f64,
            a: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_transfer_round_trip() {
        for i in 0..=100 {
            let x = i as f32 / 100.0;
            assert_abs_diff_eq!(linear_to_srgb(srgb_to_linear(x)), x, epsilon = 1e-5);
            assert_abs_diff_eq!(srgb_to_linear(linear_to_srgb(x)), x, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_transfer_endpoints() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert_abs_diff_eq!(srgb_to_linear(1.0), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(linear_to_srgb(1.0), 1.0, epsilon = 1e-6);
        // mid grey is noticeably darker in linear space
        assert_abs_diff_eq!(srgb_to_linear(0.5), 0.21404, epsilon = 1e-4);
    }

    #[test]
    fn test_linear_segment() {
        assert_abs_diff_eq!(srgb_to_linear(0.04), 0.04 / 12.92, epsilon = 1e-7);
        assert_abs_diff_eq!(linear_to_srgb(0.003), 0.003 * 12.92, epsilon = 1e-7);
    }

    #[test]
    fn test_color_from_srgb() {
        let orange = Color::from_srgb(1.0, 0.85, 0.43);
        assert_abs_diff_eq!(orange.r, 1.0, epsilon = 1e-6);
        assert!(orange.g < 0.85);
        assert!(orange.b < 0.43);

        let back = orange.to_srgb();
        assert_abs_diff_eq!(back[1], 0.85, epsilon = 1e-5);
        assert_abs_diff_eq!(back[2], 0.43, epsilon = 1e-5);
    }

    #[test]
    fn test_encoding_flags() {
        assert_eq!(ColorEncoding::Linear.shader_flag(), 0);
        assert_eq!(ColorEncoding::Srgb.shader_flag(), 1);
        assert_eq!(ColorEncoding::Linear.encode(0.5), 0.5);
        assert_abs_diff_eq!(ColorEncoding::Srgb.decode(0.5), srgb_to_linear(0.5));
    }
}
