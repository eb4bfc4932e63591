//! Tinsel - interactive ornament tree
//!
//! Scroll to burst the tree apart and reassemble it, click the star to light
//! the scene and open the wish prompt, type a wish and press Enter.
//!
//! Usage:
//!   tinsel [--config <scene.toml>] [--seed <n>] [--font <file>] [--wish <text>] [--fullscreen]

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tinsel_core::SceneConfig;
use tinsel_ornaments::{
    BlockFontRasterizer, FontRasterizer, GlyphRasterizer, TreeOrnaments, WishLayout, WishSeeder,
    XorShiftSampler,
};
use tinsel_player::{SceneSetup, TinselApp};
use tinsel_render::DeformParams;
use tinsel_runtime::{Director, SceneEvent};
use tracing_subscriber::EnvFilter;
use winit::event_loop::{ControlFlow, EventLoop};

#[derive(Parser)]
#[command(name = "tinsel")]
#[command(about = "Interactive instanced ornament tree with wish particles")]
struct Args {
    /// TOML file overriding the default scene constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for ornament placement and wish scatter (random when omitted)
    #[arg(long)]
    seed: Option<u32>,

    /// Font file used to rasterize wishes instead of the system serif face
    #[arg(long)]
    font: Option<PathBuf>,

    /// Wish to show at startup
    #[arg(long)]
    wish: Option<String>,

    /// Launch in fullscreen mode
    #[arg(long)]
    fullscreen: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SceneConfig::default(),
    };

    let seed = args.seed.unwrap_or_else(XorShiftSampler::clock_seed);
    tracing::info!(seed, "scene seed");
    let mut tree_sampler = XorShiftSampler::stream(seed, 0);
    let wish_sampler = XorShiftSampler::stream(seed, 1);

    let ornaments = TreeOrnaments::generate(&config.ornaments, &mut tree_sampler);
    tracing::info!(
        target: "ornaments",
        needles = ornaments.needles.len(),
        pearls = ornaments.pearls.len(),
        ribbons = ornaments.ribbons.len(),
        silver = ornaments.silver.len(),
        "generated tree"
    );

    let rasterizer = build_rasterizer(args.font.as_deref(), config.wish.font_size)?;
    let seeder = WishSeeder::new(rasterizer, WishLayout::from(&config.wish));
    let mut director = Director::new(&config, seeder, Box::new(wish_sampler));
    if let Some(wish) = args.wish {
        director.push(SceneEvent::WishSubmitted(wish));
    }

    println!("Controls:");
    println!("  Wheel    - Burst / reassemble the tree");
    println!("  Click    - Light the star, open the wish prompt");
    println!("  Drag     - Orbit the camera");
    println!("  Enter    - Send the wish");
    println!("  Escape   - Close the prompt / Exit");
    println!("  F11      - Toggle fullscreen");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let setup = SceneSetup {
        director,
        ornaments,
        deform: DeformParams::from(&config.deform),
    };
    let mut app = TinselApp::new(setup, args.fullscreen);
    event_loop.run_app(&mut app)?;

    Ok(())
}

fn build_rasterizer(font: Option<&std::path::Path>, font_size: f32) -> Result<Box<dyn GlyphRasterizer>> {
    if let Some(path) = font {
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read font {}", path.display()))?;
        return Ok(Box::new(FontRasterizer::with_font_data(font_size, data)));
    }

    let system = FontRasterizer::new(font_size);
    if system.has_fonts() {
        Ok(Box::new(system))
    } else {
        tracing::warn!(target: "wish", "no system fonts found, using the built-in block font");
        Ok(Box::new(BlockFontRasterizer::new()))
    }
}
