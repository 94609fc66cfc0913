//! wgpu render backend for cubeshade.
//!
//! Draws the pulsing and orbiting cubes with a Blinn-style lighting shader.
//! Geometry is static; each cube's color buffer is dynamic and rewritten in
//! full whenever a face is recolored.
//!
//! # Invariants
//! - The renderer never mutates scene state; it only consumes a `FramePlan`.
//! - Uniforms for a draw are uploaded and validated before that draw is
//!   submitted.
//! - Shader or pipeline validation failures are fatal at startup.

mod cube;
mod error;
mod gpu;
mod shaders;
mod uniforms;

pub use cube::GpuCube;
pub use error::RenderError;
pub use gpu::{GpuContext, WgpuRenderer};
