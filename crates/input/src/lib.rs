//! Input mapping: discrete key presses mapped to scene actions.
//!
//! # Invariants
//! - Scene code consumes actions, never raw window events.
//! - Every bound key maps to exactly one action.

pub mod action;

pub use action::{Action, Key};
