//! Per-frame matrix and uniform computation.
//!
//! Everything here is recomputed from scratch each frame; nothing is carried
//! between frames.

use crate::animation::AnimationClock;
use crate::camera::OrbitCamera;
use crate::lighting::LightingParams;
use cubeshade_common::Rgba;
use glam::{Mat3, Mat4, Vec3, Vec4};
use serde::Serialize;
use std::f32::consts::FRAC_PI_4;

/// Aspect ratio the projection was authored against.
pub const REFERENCE_ASPECT: f32 = 1024.0 / 768.0;

/// Model matrices with a determinant below this are treated as singular.
const SINGULAR_EPSILON: f32 = 1e-8;

/// Where the projection's aspect ratio comes from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum AspectMode {
    /// A constant ratio, independent of the window size.
    Fixed(f32),
    /// Width over height of the live surface.
    Viewport,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionConfig {
    pub fov_y: f32,
    pub aspect: AspectMode,
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov_y: FRAC_PI_4,
            aspect: AspectMode::Fixed(REFERENCE_ASPECT),
            near: 0.1,
            far: 100.0,
        }
    }
}

impl ProjectionConfig {
    pub fn aspect_ratio(&self, viewport: (u32, u32)) -> f32 {
        match self.aspect {
            AspectMode::Fixed(ratio) => ratio,
            AspectMode::Viewport => viewport.0.max(1) as f32 / viewport.1.max(1) as f32,
        }
    }

    pub fn matrix(&self, viewport: (u32, u32)) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio(viewport), self.near, self.far)
    }
}

/// Which of the two fixed cubes a draw call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CubeRole {
    /// Six-colored cube at the origin, scaled by the pulse.
    Pulsing,
    /// Small single-colored cube spinning while it circles the Y axis.
    Orbiting,
}

/// Matrices for a single indexed draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawCall {
    pub role: CubeRole,
    pub model: Mat4,
    pub normal: Mat3,
}

impl DrawCall {
    pub fn new(role: CubeRole, model: Mat4) -> Self {
        Self {
            role,
            model,
            normal: normal_matrix(model),
        }
    }
}

/// Shading inputs shared by every draw in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LightingUniforms {
    pub light_color: Vec3,
    pub light_position: Vec3,
    pub view_position: Vec3,
    pub shininess: f32,
    pub ambient_strength: Vec3,
    pub diffuse_strength: Vec3,
    pub specular_strength: Vec3,
}

/// Everything the backend needs to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FramePlan {
    pub view: Mat4,
    pub projection: Mat4,
    pub lighting: LightingUniforms,
    pub clear_color: Rgba,
    pub draws: [DrawCall; 2],
}

impl FramePlan {
    pub fn draw(&self, role: CubeRole) -> &DrawCall {
        // draws is built in role order by FramePipeline::plan
        match role {
            CubeRole::Pulsing => &self.draws[0],
            CubeRole::Orbiting => &self.draws[1],
        }
    }
}

/// Turns scene state into a [`FramePlan`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FramePipeline {
    pub projection: ProjectionConfig,
}

impl FramePipeline {
    pub fn new(projection: ProjectionConfig) -> Self {
        Self { projection }
    }

    pub fn plan(
        &self,
        camera: &OrbitCamera,
        clock: &AnimationClock,
        lighting: &LightingParams,
        viewport: (u32, u32),
    ) -> FramePlan {
        let lighting_uniforms = LightingUniforms {
            light_color: lighting.light_color,
            light_position: lighting.light_position,
            view_position: camera.position(),
            shininess: lighting.shininess,
            ambient_strength: lighting.ambient_strength,
            diffuse_strength: lighting.diffuse_strength,
            specular_strength: lighting.specular_strength,
        };

        FramePlan {
            view: camera.view_matrix(),
            projection: self.projection.matrix(viewport),
            lighting: lighting_uniforms,
            clear_color: lighting.clear_color(),
            draws: [
                DrawCall::new(CubeRole::Pulsing, pulsing_model(clock.center_cube_scale())),
                DrawCall::new(
                    CubeRole::Orbiting,
                    orbiting_model(
                        clock.own_revolution_phase(),
                        clock.global_revolution_phase(),
                    ),
                ),
            ],
        }
    }
}

pub fn pulsing_model(scale: f32) -> Mat4 {
    Mat4::from_scale(Vec3::splat(scale))
}

/// Shrink, tip onto a corner, spin about Y, lift to (1, 1, 0), then orbit Y.
///
/// The product reads right to left: the rightmost factor touches the vertex
/// first. The orbit radius in the XZ plane is therefore 1 at height 1.
pub fn orbiting_model(own_angle: f32, global_angle: f32) -> Mat4 {
    Mat4::from_rotation_y(global_angle)
        * Mat4::from_translation(Vec3::new(1.0, 1.0, 0.0))
        * Mat4::from_rotation_y(own_angle)
        * Mat4::from_rotation_z(FRAC_PI_4)
        * Mat4::from_rotation_x(FRAC_PI_4)
        * Mat4::from_scale(Vec3::splat(0.25))
}

/// Inverse-transpose of the model's linear part.
///
/// Singular models fall back to identity.
pub fn normal_matrix(model: Mat4) -> Mat3 {
    let mut linear = model;
    linear.w_axis = Vec4::W;
    let det = linear.determinant();
    if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
        tracing::warn!(det, "model matrix is not invertible, using identity normal matrix");
        return Mat3::IDENTITY;
    }
    Mat3::from_mat4(linear.inverse().transpose())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn identity_model_has_identity_normal() {
        assert_eq!(normal_matrix(Mat4::IDENTITY), Mat3::IDENTITY);
    }

    #[test]
    fn rotation_normal_matrix_is_the_rotation() {
        let rotations = [
            Mat4::from_rotation_x(0.3),
            Mat4::from_rotation_y(-2.0),
            Mat4::from_quat(Quat::from_axis_angle(Vec3::new(1.0, 2.0, 3.0).normalize(), 1.1)),
        ];
        for rot in rotations {
            assert!(normal_matrix(rot).abs_diff_eq(Mat3::from_mat4(rot), 1e-5));
        }
    }

    #[test]
    fn translation_does_not_reach_normals() {
        let model = Mat4::from_translation(Vec3::new(5.0, -3.0, 2.0)) * Mat4::from_rotation_z(0.7);
        let expected = Mat3::from_mat4(Mat4::from_rotation_z(0.7));
        assert!(normal_matrix(model).abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn non_uniform_scale_keeps_normals_perpendicular() {
        let model = Mat4::from_scale(Vec3::new(2.0, 0.5, 1.0));
        let normal = normal_matrix(model);
        // a surface tangent and its normal stay perpendicular after transform
        let tangent = Vec3::new(1.0, -1.0, 0.0);
        let n = Vec3::new(1.0, 1.0, 0.0);
        let t2 = model.transform_vector3(tangent);
        let n2 = normal * n;
        assert!(t2.dot(n2).abs() < 1e-5);
    }

    #[test]
    fn singular_model_falls_back_to_identity() {
        let flat = Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(normal_matrix(flat), Mat3::IDENTITY);
    }

    #[test]
    fn fixed_projection_ignores_viewport() {
        let config = ProjectionConfig::default();
        assert_eq!(config.matrix((500, 500)), config.matrix((1920, 300)));
        assert_eq!(config.aspect_ratio((500, 500)), REFERENCE_ASPECT);
    }

    #[test]
    fn viewport_projection_tracks_surface() {
        let config = ProjectionConfig {
            aspect: AspectMode::Viewport,
            ..ProjectionConfig::default()
        };
        assert_eq!(config.aspect_ratio((800, 400)), 2.0);
        assert_eq!(config.aspect_ratio((800, 0)), 800.0);
    }

    #[test]
    fn orbiting_cube_circles_at_root_two() {
        for i in 0..16 {
            let global = i as f32 * 0.4;
            let center = orbiting_model(i as f32, global).transform_point3(Vec3::ZERO);
            assert!((center.y - 1.0).abs() < 1e-5);
            let radius = Vec3::new(center.x, 0.0, center.z).length();
            assert!((radius - 1.0).abs() < 1e-5);
            assert!((center.length() - 2f32.sqrt()).abs() < 1e-5);
        }
    }

    #[test]
    fn orbiting_cube_is_quarter_size() {
        let model = orbiting_model(0.0, 0.0);
        let edge = model.transform_vector3(Vec3::X);
        assert!((edge.length() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn paused_full_strength_scene_draws_identity_center() {
        let pipeline = FramePipeline::default();
        let camera = OrbitCamera::default();
        let clock = AnimationClock::default();
        let lighting = LightingParams::full_strength();

        let plan = pipeline.plan(&camera, &clock, &lighting, (500, 500));
        let center = plan.draw(CubeRole::Pulsing);
        assert_eq!(center.role, CubeRole::Pulsing);
        assert_eq!(center.model, Mat4::IDENTITY);
        assert_eq!(center.normal, Mat3::IDENTITY);
        assert_eq!(plan.lighting.ambient_strength, Vec3::ONE);
        assert_eq!(plan.lighting.view_position, camera.position());
        assert_eq!(plan.draw(CubeRole::Orbiting).role, CubeRole::Orbiting);
    }

    #[test]
    fn clear_color_follows_background() {
        let lighting = LightingParams {
            background: Vec3::new(0.5, 0.25, 0.0),
            ..LightingParams::default()
        };
        let plan = FramePipeline::default().plan(
            &OrbitCamera::default(),
            &AnimationClock::default(),
            &lighting,
            (500, 500),
        );
        assert_eq!(plan.clear_color, Rgba::new(0.5, 0.25, 0.0, 1.0));
    }

    #[test]
    fn orbit_stays_smooth_after_long_runs() {
        let plan_at = |elapsed: f64| {
            let mut clock = AnimationClock::default();
            clock.set_enabled(true);
            clock.advance(elapsed);
            FramePipeline::default().plan(
                &OrbitCamera::default(),
                &clock,
                &LightingParams::default(),
                (500, 500),
            )
        };
        // both revolutions repeat every 2*pi seconds
        let period = std::f64::consts::TAU;
        let early = plan_at(0.3);
        let late = plan_at(0.3 + 20_000.0 * period);
        let (a, b) = (
            early.draw(CubeRole::Orbiting).model,
            late.draw(CubeRole::Orbiting).model,
        );
        assert!(a.abs_diff_eq(b, 1e-4), "{a:?} vs {b:?}");
    }

    #[test]
    fn pulsing_normal_matrix_undoes_scale() {
        let model = pulsing_model(1.2);
        let normal = normal_matrix(model);
        assert!(normal.abs_diff_eq(Mat3::from_diagonal(Vec3::splat(1.0 / 1.2)), 1e-6));
    }
}
