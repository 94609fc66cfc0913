//! Scene core: cube geometry, orbit camera, animation clock and the per-frame
//! matrix pipeline.
//!
//! # Invariants
//! - Nothing in this crate touches the graphics device.
//! - A [`FramePlan`] is a pure function of camera, clock, lighting and viewport.
//! - Color buffers are always 96 floats; indices never exceed 23.

pub mod animation;
pub mod camera;
pub mod frame;
pub mod lighting;
pub mod mesh;
mod state;

pub use animation::{AnimationClock, AnimationConfig};
pub use camera::{OrbitCamera, OrbitCameraConfig};
pub use frame::{
    AspectMode, CubeRole, DrawCall, FramePipeline, FramePlan, LightingUniforms, ProjectionConfig,
};
pub use lighting::LightingParams;
pub use mesh::{CubeMesh, Vertex};
pub use state::{SceneState, orbiting_cube_mesh, pulsing_cube_mesh};
