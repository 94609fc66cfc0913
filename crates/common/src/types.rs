use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Linear RGBA color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from an RGB triple.
    pub fn opaque(rgb: Vec3) -> Self {
        Self::new(rgb.x, rgb.y, rgb.z, 1.0)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<Rgba> for Vec4 {
    fn from(c: Rgba) -> Self {
        Vec4::new(c.r, c.g, c.b, c.a)
    }
}

/// Named colors offered for cube faces.
///
/// The declaration order is also the initial face order of the centered cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorPreset {
    Red,
    Green,
    Blue,
    Magenta,
    Cyan,
    Yellow,
}

impl ColorPreset {
    pub const ALL: [ColorPreset; 6] = [
        ColorPreset::Red,
        ColorPreset::Green,
        ColorPreset::Blue,
        ColorPreset::Magenta,
        ColorPreset::Cyan,
        ColorPreset::Yellow,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Green => "Green",
            Self::Blue => "Blue",
            Self::Magenta => "Magenta",
            Self::Cyan => "Cyan",
            Self::Yellow => "Yellow",
        }
    }

    pub fn rgba(self) -> Rgba {
        match self {
            Self::Red => Rgba::new(1.0, 0.0, 0.0, 1.0),
            Self::Green => Rgba::new(0.0, 1.0, 0.0, 1.0),
            Self::Blue => Rgba::new(0.0, 0.0, 1.0, 1.0),
            Self::Magenta => Rgba::new(1.0, 0.0, 1.0, 1.0),
            Self::Cyan => Rgba::new(0.0, 1.0, 1.0, 1.0),
            Self::Yellow => Rgba::new(1.0, 1.0, 0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_opaque_and_distinct() {
        for (i, a) in ColorPreset::ALL.iter().enumerate() {
            assert_eq!(a.rgba().a, 1.0);
            for b in &ColorPreset::ALL[i + 1..] {
                assert_ne!(a.rgba(), b.rgba());
            }
        }
    }

    #[test]
    fn rgba_converts_to_vec4() {
        let v: Vec4 = ColorPreset::Magenta.rgba().into();
        assert_eq!(v, Vec4::new(1.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn opaque_sets_alpha() {
        let c = Rgba::opaque(Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(c.to_array(), [0.1, 0.2, 0.3, 1.0]);
    }
}
