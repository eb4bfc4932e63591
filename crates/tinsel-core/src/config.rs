//! Scene configuration
//!
//! Every value has a compiled-in default matching the shipped scene. A TOML
//! file may override any subset of fields; missing sections and fields keep
//! their defaults.

use crate::{Result, TinselError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Instance counts per ornament class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrnamentCounts {
    pub needles: usize,
    pub pearls: usize,
    pub ribbons: usize,
    pub silver: usize,
}

impl Default for OrnamentCounts {
    fn default() -> Self {
        Self {
            needles: 20_000,
            pearls: 700,
            ribbons: 2_500,
            silver: 1_000,
        }
    }
}

/// Constants baked into the explosion deformation shader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeformConfig {
    /// World units travelled per unit of progress
    pub scale_factor: f32,
    /// Tumble radians per unit of progress
    pub rotation_gain: f32,
    /// Progress at or below which no tumble is applied
    pub rotation_threshold: f32,
}

impl Default for DeformConfig {
    fn default() -> Self {
        Self {
            scale_factor: 7.0,
            rotation_gain: 2.5,
            rotation_threshold: 0.01,
        }
    }
}

/// Expansion scalar bounds and smoothing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    pub max: f32,
    /// Fraction of the remaining distance covered per tick
    pub smoothing: f32,
    /// Target change per pixel of wheel scroll
    pub wheel_sensitivity: f32,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            max: 5.0,
            smoothing: 0.05,
            wheel_sensitivity: 0.0015,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub smoothing: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self { smoothing: 0.04 }
    }
}

/// Layout of the wish text canvas and the particles seeded from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WishConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Sample every Nth pixel in both axes
    pub stride: u32,
    /// Coverage above this value seeds a particle
    pub threshold: u8,
    /// Horizontal world span of the full canvas width
    pub world_width: f32,
    /// World height of the canvas center
    pub vertical_offset: f32,
    /// Constant depth of the text plane
    pub forward_offset: f32,
    /// Half-width of the random depth window around `forward_offset`
    pub depth_jitter: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    /// Font size in pixels used when rasterizing
    pub font_size: f32,
}

impl Default for WishConfig {
    fn default() -> Self {
        Self {
            canvas_width: 512,
            canvas_height: 128,
            stride: 2,
            threshold: 128,
            world_width: 8.0,
            vertical_offset: 5.5,
            forward_offset: 2.0,
            depth_jitter: 0.1,
            speed_min: 1.0,
            speed_max: 2.0,
            font_size: 72.0,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub ornaments: OrnamentCounts,
    pub deform: DeformConfig,
    pub expansion: ExpansionConfig,
    pub lighting: LightingConfig,
    pub wish: WishConfig,
}

impl SceneConfig {
    /// Parse and validate a TOML override
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: SceneConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML override from disk
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Reject values the generators and drivers cannot work with
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(TinselError::InvalidConfig(msg));

        if !(self.expansion.max > 0.0) {
            return invalid(format!("expansion.max must be positive, got {}", self.expansion.max));
        }
        for (field, value) in [
            ("expansion.smoothing", self.expansion.smoothing),
            ("lighting.smoothing", self.lighting.smoothing),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return invalid(format!("{field} must be in (0, 1], got {value}"));
            }
        }
        // These end up as literals in the deformation shader
        let deform = &self.deform;
        for (field, value) in [
            ("deform.scale_factor", deform.scale_factor),
            ("deform.rotation_gain", deform.rotation_gain),
            ("deform.rotation_threshold", deform.rotation_threshold),
        ] {
            if !value.is_finite() {
                return invalid(format!("{field} must be finite, got {value}"));
            }
        }
        if deform.rotation_threshold < 0.0 {
            return invalid("deform.rotation_threshold must not be negative".into());
        }
        if !self.expansion.wheel_sensitivity.is_finite() {
            return invalid("expansion.wheel_sensitivity must be finite".into());
        }
        let wish = &self.wish;
        for (field, value) in [
            ("wish.world_width", wish.world_width),
            ("wish.vertical_offset", wish.vertical_offset),
            ("wish.forward_offset", wish.forward_offset),
            ("wish.depth_jitter", wish.depth_jitter),
            ("wish.speed_min", wish.speed_min),
            ("wish.speed_max", wish.speed_max),
            ("wish.font_size", wish.font_size),
        ] {
            if !value.is_finite() {
                return invalid(format!("{field} must be finite, got {value}"));
            }
        }
        if wish.canvas_width == 0 || wish.canvas_height == 0 {
            return invalid(format!(
                "wish canvas must be non-empty, got {}x{}",
                wish.canvas_width, wish.canvas_height
            ));
        }
        if wish.stride == 0 {
            return invalid("wish.stride must be at least 1".into());
        }
        if wish.speed_min <= 0.0 {
            return invalid(format!("wish.speed_min must be positive, got {}", wish.speed_min));
        }
        if wish.speed_min > wish.speed_max {
            return invalid(format!(
                "wish.speed_min ({}) exceeds wish.speed_max ({})",
                wish.speed_min, wish.speed_max
            ));
        }
        if wish.depth_jitter < 0.0 || wish.world_width <= 0.0 || wish.font_size <= 0.0 {
            return invalid("wish.depth_jitter, world_width and font_size out of range".into());
        }
        Ok(())
    }
}
