use crate::animation::{AnimationClock, AnimationConfig};
use crate::camera::{OrbitCamera, OrbitCameraConfig};
use crate::frame::{FramePipeline, FramePlan};
use crate::lighting::LightingParams;
use crate::mesh::CubeMesh;
use cubeshade_common::ColorPreset;
use cubeshade_input::Action;

/// Mutable scene state shared by input handling, update and render.
///
/// Owned by the application and passed by reference; there is no global
/// state anywhere in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    pub camera: OrbitCamera,
    pub clock: AnimationClock,
    pub lighting: LightingParams,
    /// Preset currently painted on face 0 of the pulsing cube.
    pub face_preset: ColorPreset,
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new(OrbitCameraConfig::default(), AnimationConfig::default())
    }
}

impl SceneState {
    pub fn new(camera: OrbitCameraConfig, animation: AnimationConfig) -> Self {
        Self {
            camera: OrbitCamera::new(camera),
            clock: AnimationClock::new(animation),
            lighting: LightingParams::default(),
            face_preset: ColorPreset::ALL[0],
        }
    }

    /// Apply one input command.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::IncreaseAzimuth => self.camera.increase_azimuth(),
            Action::DecreaseAzimuth => self.camera.decrease_azimuth(),
            Action::IncreaseElevation => self.camera.increase_elevation(),
            Action::DecreaseElevation => self.camera.decrease_elevation(),
            Action::IncreaseDistance => self.camera.increase_distance(),
            Action::DecreaseDistance => self.camera.decrease_distance(),
            Action::ToggleAnimation => self.clock.toggle_enabled(),
        }
        tracing::debug!(
            ?action,
            distance = self.camera.distance(),
            azimuth = self.camera.azimuth(),
            elevation = self.camera.elevation(),
            "action applied"
        );
    }

    /// Advance animation by one frame.
    pub fn update(&mut self, dt: f64) {
        self.clock.advance(dt);
    }

    pub fn plan_frame(&self, pipeline: &FramePipeline, viewport: (u32, u32)) -> FramePlan {
        pipeline.plan(&self.camera, &self.clock, &self.lighting, viewport)
    }
}

/// The six-colored cube drawn at the origin.
pub fn pulsing_cube_mesh() -> CubeMesh {
    CubeMesh::with_face_colors(ColorPreset::ALL.map(ColorPreset::rgba))
}

/// The single-colored cube that orbits the origin.
pub fn orbiting_cube_mesh() -> CubeMesh {
    CubeMesh::uniform(ColorPreset::ALL[0].rgba())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::CubeRole;
    use glam::{Mat3, Mat4};

    #[test]
    fn actions_reach_camera() {
        let mut scene = SceneState::default();
        let start = scene.camera.position();
        scene.apply(Action::IncreaseAzimuth);
        assert_ne!(scene.camera.position(), start);
        scene.apply(Action::DecreaseAzimuth);
        assert!(scene.camera.position().abs_diff_eq(start, 1e-5));

        let d0 = scene.camera.distance();
        scene.apply(Action::IncreaseDistance);
        scene.apply(Action::DecreaseDistance);
        assert_eq!(scene.camera.distance(), d0);
    }

    #[test]
    fn paused_scene_ignores_updates() {
        let mut scene = SceneState::default();
        let pipeline = FramePipeline::default();
        let before = scene.plan_frame(&pipeline, (500, 500));
        scene.update(0.5);
        scene.update(1.5);
        assert_eq!(scene.plan_frame(&pipeline, (500, 500)), before);
        let center = before.draw(CubeRole::Pulsing);
        assert_eq!(center.model, Mat4::IDENTITY);
        assert_eq!(center.normal, Mat3::IDENTITY);
    }

    #[test]
    fn toggle_then_one_second_spins_orbiting_cube() {
        let mut scene = SceneState::default();
        scene.apply(Action::ToggleAnimation);
        scene.update(1.0);
        assert_eq!(scene.clock.own_revolution_angle(), 10.0);

        let pipeline = FramePipeline::default();
        let plan = scene.plan_frame(&pipeline, (500, 500));
        let expected = crate::frame::orbiting_model(10.0, -1.0);
        assert!(plan.draw(CubeRole::Orbiting).model.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn initial_meshes_match_presets() {
        let pulsing = pulsing_cube_mesh();
        let orbiting = orbiting_cube_mesh();
        assert_eq!(pulsing.face_color(2), Some(ColorPreset::Blue.rgba()));
        assert_eq!(orbiting.face_color(5), Some(ColorPreset::Red.rgba()));
    }
}
