//! Tinsel Ornaments - procedural instance data for the tree
//!
//! Provides everything the renderer uploads as per-instance data:
//! - Shape profiles and the placement generator for each ornament class
//! - Parallel explosion attributes (direction, speed, tumble axis)
//! - Text rasterization and wish particle seeding
//! - The single-occupancy wish slot

pub mod generator;
pub mod instance;
pub mod profile;
pub mod raster;
pub mod sampler;
pub mod wish;

pub use generator::{generate, TreeOrnaments};
pub use instance::{ExplosionAttributes, ExplosionInstance, InstanceClass, InstanceView};
pub use profile::{
    DirectionPolicy, Orientation, Placement, ScalePolicy, ShapeProfile, Taper,
    VerticalDistribution,
};
pub use raster::{Bitmap, BlockFontRasterizer, FontRasterizer, GlyphRasterizer};
pub use sampler::{Interval, Sampler, XorShiftSampler};
pub use wish::{seed_wish, WishLayout, WishSeeder, WishSlot};
