use cubeshade_common::Rgba;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const SHININESS_RANGE: RangeInclusive<f32> = 1.0..=200.0;
pub const CHANNEL_RANGE: RangeInclusive<f32> = 0.0..=1.0;

/// Lighting inputs editable from the debug panel.
///
/// Light color and position are fixed for the scene but kept here so the
/// whole lighting block travels together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightingParams {
    pub light_color: Vec3,
    pub light_position: Vec3,
    pub shininess: f32,
    pub ambient_strength: Vec3,
    pub diffuse_strength: Vec3,
    pub specular_strength: Vec3,
    pub background: Vec3,
}

impl Default for LightingParams {
    fn default() -> Self {
        Self {
            light_color: Vec3::ONE,
            light_position: Vec3::new(0.0, 2.0, 0.0),
            shininess: 50.0,
            ambient_strength: Vec3::splat(0.2),
            diffuse_strength: Vec3::splat(0.3),
            specular_strength: Vec3::splat(0.5),
            background: Vec3::ONE,
        }
    }
}

impl LightingParams {
    /// White light with every strength at 1.
    pub fn full_strength() -> Self {
        Self {
            ambient_strength: Vec3::ONE,
            diffuse_strength: Vec3::ONE,
            specular_strength: Vec3::ONE,
            ..Self::default()
        }
    }

    /// Pull every tunable back into its slider range.
    pub fn clamp_to_ranges(&mut self) {
        let (lo, hi) = (*CHANNEL_RANGE.start(), *CHANNEL_RANGE.end());
        self.shininess = self
            .shininess
            .clamp(*SHININESS_RANGE.start(), *SHININESS_RANGE.end());
        self.ambient_strength = self.ambient_strength.clamp(Vec3::splat(lo), Vec3::splat(hi));
        self.diffuse_strength = self.diffuse_strength.clamp(Vec3::splat(lo), Vec3::splat(hi));
        self.specular_strength = self
            .specular_strength
            .clamp(Vec3::splat(lo), Vec3::splat(hi));
        self.background = self.background.clamp(Vec3::splat(lo), Vec3::splat(hi));
    }

    pub fn clear_color(&self) -> Rgba {
        Rgba::opaque(self.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_sit_inside_ranges() {
        let params = LightingParams::default();
        let mut clamped = params;
        clamped.clamp_to_ranges();
        assert_eq!(params, clamped);
    }

    #[test]
    fn clamp_pulls_values_back() {
        let mut params = LightingParams {
            shininess: 0.0,
            ambient_strength: Vec3::new(-1.0, 0.5, 2.0),
            background: Vec3::splat(3.0),
            ..LightingParams::default()
        };
        params.clamp_to_ranges();
        assert_eq!(params.shininess, 1.0);
        assert_eq!(params.ambient_strength, Vec3::new(0.0, 0.5, 1.0));
        assert_eq!(params.background, Vec3::ONE);
    }

    #[test]
    fn clear_color_is_opaque_background() {
        let params = LightingParams::default();
        assert_eq!(params.clear_color(), Rgba::WHITE);
    }
}
