//! Text rasterization into an off-screen coverage bitmap
//!
//! Two rasterizers share the [`GlyphRasterizer`] interface:
//! - [`FontRasterizer`] shapes text with cosmic-text using a bold serif face
//! - [`BlockFontRasterizer`] draws built-in 5x7 block glyphs, needs no fonts

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, SwashCache, Weight};

/// Single-channel coverage bitmap: 255 = text, 0 = background
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.pixels[(y * self.width + x) as usize]
    }

    /// Write coverage, keeping the brighter of old and new. Out-of-bounds writes are clipped.
    pub fn paint(&mut self, x: i32, y: i32, value: u8) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let index = (y as u32 * self.width + x as u32) as usize;
        self.pixels[index] = self.pixels[index].max(value);
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, value: u8) {
        for dy in 0..h as i32 {
            for dx in 0..w as i32 {
                self.paint(x + dx, y + dy, value);
            }
        }
    }

    /// Pixels whose coverage exceeds `threshold`
    pub fn coverage_count(&self, threshold: u8) -> usize {
        self.pixels.iter().filter(|&&p| p > threshold).count()
    }
}

/// Renders a string as white-on-black coverage into a fixed-size bitmap
pub trait GlyphRasterizer {
    fn rasterize(&mut self, text: &str, width: u32, height: u32) -> Bitmap;

    /// Human-readable name for logs
    fn name(&self) -> &str;
}

/// cosmic-text rasterizer using a bold serif face, centered on the canvas
pub struct FontRasterizer {
    font_system: FontSystem,
    swash_cache: SwashCache,
    font_size: f32,
    /// Family of an explicitly loaded font, preferred over the generic serif
    family: Option<String>,
}

impl FontRasterizer {
    /// Use the system font database
    pub fn new(font_size: f32) -> Self {
        Self {
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
            font_size,
            family: None,
        }
    }

    /// Load a font file's bytes and prefer its family
    pub fn with_font_data(font_size: f32, data: Vec<u8>) -> Self {
        let mut rasterizer = Self::new(font_size);
        let db = rasterizer.font_system.db_mut();
        let before = db.len();
        db.load_font_data(data);
        rasterizer.family = db
            .faces()
            .skip(before)
            .find_map(|face| face.families.first().map(|(name, _)| name.clone()));
        rasterizer
    }

    /// False when no faces are available, in which case nothing would be drawn
    pub fn has_fonts(&self) -> bool {
        !self.font_system.db().is_empty()
    }
}

impl GlyphRasterizer for FontRasterizer {
    fn rasterize(&mut self, text: &str, width: u32, height: u32) -> Bitmap {
        let mut bitmap = Bitmap::new(width, height);
        let metrics = Metrics::new(self.font_size, self.font_size * 1.2);

        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        buffer.set_size(&mut self.font_system, Some(width as f32), Some(height as f32));
        let family = match &self.family {
            Some(name) => Family::Name(name),
            None => Family::Serif,
        };
        let attrs = Attrs::new().family(family).weight(Weight::BOLD);
        buffer.set_text(&mut self.font_system, text, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);

        let (line_width, line_count) = buffer
            .layout_runs()
            .fold((0.0f32, 0usize), |(w, n), run| (w.max(run.line_w), n + 1));
        let text_height = line_count as f32 * metrics.line_height;
        let offset_x = ((width as f32 - line_width) / 2.0).round() as i32;
        let offset_y = ((height as f32 - text_height) / 2.0).round() as i32;

        buffer.draw(
            &mut self.font_system,
            &mut self.swash_cache,
            cosmic_text::Color::rgb(255, 255, 255),
            |x, y, w, h, color| {
                bitmap.fill_rect(x + offset_x, y + offset_y, w, h, color.a());
            },
        );
        bitmap
    }

    fn name(&self) -> &str {
        "cosmic-text"
    }
}

const GLYPH_WIDTH: i32 = 5;
const GLYPH_HEIGHT: i32 = 7;
/// Glyph width plus one column of spacing
const GLYPH_ADVANCE: i32 = GLYPH_WIDTH + 1;
const CANVAS_MARGIN: i32 = 8;

/// Built-in block-letter rasterizer, scaled to fill the canvas
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockFontRasterizer;

impl BlockFontRasterizer {
    pub fn new() -> Self {
        Self
    }
}

impl GlyphRasterizer for BlockFontRasterizer {
    fn rasterize(&mut self, text: &str, width: u32, height: u32) -> Bitmap {
        let mut bitmap = Bitmap::new(width, height);
        let glyphs: Vec<[u8; 7]> = text.chars().map(block_glyph).collect();
        if glyphs.is_empty() {
            return bitmap;
        }

        let cells_wide = glyphs.len() as i32 * GLYPH_ADVANCE - 1;
        let fit_x = (width as i32 - 2 * CANVAS_MARGIN) / cells_wide;
        let fit_y = (height as i32 - 2 * CANVAS_MARGIN) / GLYPH_HEIGHT;
        let scale = fit_x.min(fit_y).max(1);

        let origin_x = (width as i32 - cells_wide * scale) / 2;
        let origin_y = (height as i32 - GLYPH_HEIGHT * scale) / 2;

        for (index, rows) in glyphs.iter().enumerate() {
            let glyph_x = origin_x + index as i32 * GLYPH_ADVANCE * scale;
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                        bitmap.fill_rect(
                            glyph_x + col * scale,
                            origin_y + row as i32 * scale,
                            scale as u32,
                            scale as u32,
                            255,
                        );
                    }
                }
            }
        }
        bitmap
    }

    fn name(&self) -> &str {
        "block"
    }
}

/// 5x7 rows, most significant of the low five bits is the leftmost column.
/// Lowercase maps to uppercase; anything unknown draws as `?`.
fn block_glyph(c: char) -> [u8; 7] {
    match c.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        c if c.is_whitespace() => [0; 7],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        ',' => [0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b00100, 0b01000],
        '\'' => [0b00100, 0b00100, 0b01000, 0b00000, 0b00000, 0b00000, 0b00000],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '+' => [0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000],
        ':' => [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b01100, 0b00000],
        '&' => [0b01100, 0b10010, 0b10100, 0b01000, 0b10101, 0b10010, 0b01101],
        _ => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100],
    }
}
