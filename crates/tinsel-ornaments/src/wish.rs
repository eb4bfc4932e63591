//! Wish particles: rasterized text turned into an explodable instance class,
//! and the single-occupancy slot that owns the live set.

use crate::instance::InstanceClass;
use crate::raster::{Bitmap, GlyphRasterizer};
use crate::sampler::{Interval, Sampler};
use glam::{Quat, Vec3};
use tinsel_core::{Result, TinselError, Transform, WishConfig};

/// Name given to every wish instance class
pub const WISH_CLASS: &str = "wish";

/// Pixel-grid to world mapping and particle parameters
#[derive(Debug, Clone, PartialEq)]
pub struct WishLayout {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub stride: u32,
    pub threshold: u8,
    pub world_width: f32,
    pub vertical_offset: f32,
    pub forward_offset: f32,
    pub depth_jitter: f32,
    pub speed: Interval,
}

impl Default for WishLayout {
    fn default() -> Self {
        Self::from(&WishConfig::default())
    }
}

impl From<&WishConfig> for WishLayout {
    fn from(config: &WishConfig) -> Self {
        Self {
            canvas_width: config.canvas_width,
            canvas_height: config.canvas_height,
            stride: config.stride,
            threshold: config.threshold,
            world_width: config.world_width,
            vertical_offset: config.vertical_offset,
            forward_offset: config.forward_offset,
            depth_jitter: config.depth_jitter,
            speed: Interval::new(config.speed_min, config.speed_max),
        }
    }
}

impl WishLayout {
    /// Depth window every particle's z falls into
    pub fn depth_window(&self) -> Interval {
        Interval::new(
            self.forward_offset - self.depth_jitter,
            self.forward_offset + self.depth_jitter,
        )
    }

    /// World x/y of a canvas pixel. Canvas y grows downward, world y upward.
    pub fn plane_position(&self, px: u32, py: u32, width: u32, height: u32) -> (f32, f32) {
        let world_height = self.world_width * height as f32 / width as f32;
        let x = (px as f32 / width as f32 - 0.5) * self.world_width;
        let y = (0.5 - py as f32 / height as f32) * world_height + self.vertical_offset;
        (x, y)
    }
}

/// Seed one particle per sampled foreground pixel.
///
/// The text plane is laid out facing +Z, then turned about the Y axis by
/// `heading` so it faces a viewer at that azimuth. Burst directions turn with
/// it.
///
/// Fails with [`TinselError::NoCoverage`] when no sampled pixel passes the
/// threshold.
pub fn seed_wish<S: Sampler + ?Sized>(
    bitmap: &Bitmap,
    layout: &WishLayout,
    heading: f32,
    sampler: &mut S,
) -> Result<InstanceClass> {
    let (width, height) = (bitmap.width(), bitmap.height());
    let facing = Quat::from_rotation_y(heading);
    let stride = layout.stride.max(1) as usize;
    let mut class = InstanceClass::new(WISH_CLASS);

    for py in (0..height).step_by(stride) {
        for px in (0..width).step_by(stride) {
            if bitmap.get(px, py) <= layout.threshold {
                continue;
            }
            let (x, y) = layout.plane_position(px, py, width, height);
            let z = layout.forward_offset + sampler.jitter(layout.depth_jitter);

            // The burst heads toward the viewer
            let direction = facing * sampler.hemisphere_biased();
            let speed = layout.speed.sample(sampler);
            let axis = sampler.positive_axis();

            class.push(Transform::from_position(facing * Vec3::new(x, y, z)), direction, speed, axis);
        }
    }

    if class.is_empty() {
        return Err(TinselError::NoCoverage(String::new()));
    }
    Ok(class)
}

/// Rasterizer plus layout: text in, wish instance class out
pub struct WishSeeder {
    rasterizer: Box<dyn GlyphRasterizer>,
    layout: WishLayout,
}

impl WishSeeder {
    pub fn new(rasterizer: Box<dyn GlyphRasterizer>, layout: WishLayout) -> Self {
        Self { rasterizer, layout }
    }

    pub fn layout(&self) -> &WishLayout {
        &self.layout
    }

    /// Rasterize `text` and seed it facing a viewer at azimuth `heading`
    pub fn seed<S: Sampler + ?Sized>(
        &mut self,
        text: &str,
        heading: f32,
        sampler: &mut S,
    ) -> Result<InstanceClass> {
        let bitmap = self.rasterizer.rasterize(
            text,
            self.layout.canvas_width,
            self.layout.canvas_height,
        );
        let class = seed_wish(&bitmap, &self.layout, heading, sampler).map_err(|err| match err {
            TinselError::NoCoverage(_) => TinselError::NoCoverage(text.to_string()),
            other => other,
        })?;
        tracing::debug!(
            target: "wish",
            rasterizer = self.rasterizer.name(),
            particles = class.len(),
            "seeded wish particles"
        );
        Ok(class)
    }
}

/// Holds at most one live wish set.
///
/// Every install bumps the generation so render-side mirrors can tell a new
/// set arrived even when its size matches the old one.
#[derive(Debug, Default)]
pub struct WishSlot {
    current: Option<InstanceClass>,
    generation: u64,
    released: u64,
}

impl WishSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a new set, handing back the previous one for release
    pub fn replace(&mut self, class: InstanceClass) -> Option<InstanceClass> {
        self.generation += 1;
        let previous = self.current.replace(class);
        if previous.is_some() {
            self.released += 1;
        }
        previous
    }

    pub fn current(&self) -> Option<&InstanceClass> {
        self.current.as_ref()
    }

    pub fn is_live(&self) -> bool {
        self.current.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// How many sets have been replaced over the slot's lifetime
    pub fn released_count(&self) -> u64 {
        self.released
    }
}
