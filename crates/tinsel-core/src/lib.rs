//! Tinsel Core - Foundational types for the Tinsel scene
//!
//! This crate provides the types every other Tinsel crate depends on:
//! - `Transform`, `Color` - Spatial and color types
//! - `SceneConfig` - Tunable constants, optionally overridden from TOML
//! - Error types and Result alias

mod config;
mod error;
mod types;

pub use config::{
    DeformConfig, ExpansionConfig, LightingConfig, OrnamentCounts, SceneConfig, WishConfig,
};
pub use error::{Result, TinselError};
pub use types::{Color, Transform};
