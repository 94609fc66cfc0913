//! Shared types for the cubeshade renderer.

mod types;

pub use types::{ColorPreset, Rgba};
