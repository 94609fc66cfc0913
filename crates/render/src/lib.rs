//! Rendering adapter: backend-agnostic interface over computed frames.
//!
//! # Invariants
//! - Renderers consume a [`FramePlan`](cubeshade_scene::FramePlan) and never
//!   mutate scene state.
//!
//! The GPU backend lives in `cubeshade-render-wgpu`; the text renderer here
//! serves headless inspection and tests.

mod renderer;

pub use renderer::{DebugTextRenderer, Renderer};
