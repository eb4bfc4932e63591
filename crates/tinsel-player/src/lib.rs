//! Tinsel Player - windowed front end for the ornament tree
//!
//! This crate provides the `TinselApp` application handler and the mapping
//! from window input to scene events.

mod app;
pub mod input_map;

pub use app::{SceneSetup, TinselApp};
