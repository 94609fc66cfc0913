use glam::{Mat4, Vec3};
use std::f32::consts::TAU;

/// Step sizes and distance bounds for the orbit camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCameraConfig {
    pub default_distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub distance_step: f32,
    pub angle_step: f32,
}

impl Default for OrbitCameraConfig {
    fn default() -> Self {
        Self {
            default_distance: 4.0,
            min_distance: 1.0,
            max_distance: 20.0,
            distance_step: 0.25,
            angle_step: 0.1,
        }
    }
}

/// Camera orbiting the origin in spherical coordinates.
///
/// Y is up. Azimuth rotates about the global Y axis starting from +Z,
/// elevation tilts the camera towards +Y. Both angles are kept in `[0, 2π)`.
/// The up vector is always +Y, so the image flips once elevation passes a pole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub config: OrbitCameraConfig,
    distance: f32,
    azimuth: f32,
    elevation: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(OrbitCameraConfig::default())
    }
}

impl OrbitCamera {
    pub fn new(config: OrbitCameraConfig) -> Self {
        Self {
            distance: config
                .default_distance
                .clamp(config.min_distance, config.max_distance),
            azimuth: 0.0,
            elevation: 0.0,
            config,
        }
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn elevation(&self) -> f32 {
        self.elevation
    }

    pub fn increase_azimuth(&mut self) {
        self.azimuth = wrap_angle(self.azimuth + self.config.angle_step);
    }

    pub fn decrease_azimuth(&mut self) {
        self.azimuth = wrap_angle(self.azimuth - self.config.angle_step);
    }

    pub fn increase_elevation(&mut self) {
        self.elevation = wrap_angle(self.elevation + self.config.angle_step);
    }

    pub fn decrease_elevation(&mut self) {
        self.elevation = wrap_angle(self.elevation - self.config.angle_step);
    }

    pub fn increase_distance(&mut self) {
        self.set_distance(self.distance + self.config.distance_step);
    }

    pub fn decrease_distance(&mut self) {
        self.set_distance(self.distance - self.config.distance_step);
    }

    fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(self.config.min_distance, self.config.max_distance);
    }

    pub fn target(&self) -> Vec3 {
        Vec3::ZERO
    }

    pub fn up(&self) -> Vec3 {
        Vec3::Y
    }

    /// Unit vector from the target towards the camera.
    pub fn direction(&self) -> Vec3 {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_el, cos_el) = self.elevation.sin_cos();
        Vec3::new(cos_el * sin_az, sin_el, cos_el * cos_az)
    }

    pub fn position(&self) -> Vec3 {
        self.target() + self.direction() * self.distance
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target(), self.up())
    }
}

fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_looks_down_negative_z() {
        let cam = OrbitCamera::default();
        assert!(cam.position().abs_diff_eq(Vec3::new(0.0, 0.0, 4.0), 1e-6));
        let view = cam.view_matrix();
        // target projects onto the view axis in front of the camera
        let t = view.transform_point3(cam.target());
        assert!(t.abs_diff_eq(Vec3::new(0.0, 0.0, -4.0), 1e-5));
    }

    #[test]
    fn distance_steps_are_symmetric() {
        let mut cam = OrbitCamera::default();
        let d0 = cam.distance();
        cam.increase_distance();
        assert!(cam.distance() > d0);
        cam.decrease_distance();
        assert_eq!(cam.distance(), d0);
    }

    #[test]
    fn distance_is_clamped() {
        let mut cam = OrbitCamera::default();
        for _ in 0..1000 {
            cam.decrease_distance();
        }
        assert_eq!(cam.distance(), cam.config.min_distance);
        // at the lower bound a round trip does not restore the old value
        cam.increase_distance();
        assert_eq!(cam.distance(), cam.config.min_distance + cam.config.distance_step);
        for _ in 0..1000 {
            cam.increase_distance();
        }
        assert_eq!(cam.distance(), cam.config.max_distance);
    }

    #[test]
    fn angles_wrap_into_full_turn() {
        let mut cam = OrbitCamera::default();
        cam.decrease_azimuth();
        assert!((cam.azimuth() - (TAU - 0.1)).abs() < 1e-5);
        for _ in 0..200 {
            cam.increase_elevation();
            assert!((0.0..TAU).contains(&cam.elevation()));
        }
    }

    #[test]
    fn position_stays_on_sphere() {
        let mut cam = OrbitCamera::default();
        let moves: [fn(&mut OrbitCamera); 6] = [
            OrbitCamera::increase_azimuth,
            OrbitCamera::decrease_elevation,
            OrbitCamera::increase_distance,
            OrbitCamera::increase_elevation,
            OrbitCamera::decrease_azimuth,
            OrbitCamera::decrease_distance,
        ];
        for i in 0..500 {
            moves[(i * 7 + i / 3) % moves.len()](&mut cam);
            let radius = (cam.position() - cam.target()).length();
            assert!((radius - cam.distance()).abs() < 1e-4, "step {i}");
        }
    }

    #[test]
    fn elevation_lifts_camera() {
        let mut cam = OrbitCamera::default();
        cam.increase_elevation();
        assert!(cam.position().y > 0.0);
        assert!(!cam.view_matrix().is_nan());
    }
}
