//! Bitmap font built at startup from the embedded 5x7 glyph table.

use std::sync::Arc;

use glam::{Vec2, vec2};
use image::{DynamicImage, Rgba, RgbaImage};
use sprig_core::MonoMetrics;

use super::font5x7;
use crate::abs::{Texture, TextureHandle};

const ATLAS_COLS: u32 = 16;
// One pixel of spacing on each axis keeps neighboring glyphs out of the
// sampled cell.
const CELL_W: u32 = font5x7::GLYPH_WIDTH + 1;
const CELL_H: u32 = font5x7::GLYPH_HEIGHT + 1;

/// A single positioned glyph with its atlas UVs.
pub struct GlyphQuad {
    pub min: Vec2,
    pub max: Vec2,
    pub uv_min: Vec2,
    pub uv_max: Vec2,
}

/// Monospaced bitmap font whose atlas is generated on the GPU at startup.
pub struct Font {
    atlas: Texture,
}

impl Font {
    /// Rasterizes the glyph table into an atlas texture.
    pub fn new(gl: &Arc<glow::Context>) -> Result<Self, String> {
        let rows = (font5x7::GLYPH_COUNT as u32).div_ceil(ATLAS_COLS);
        let mut image = RgbaImage::new(ATLAS_COLS * CELL_W, rows * CELL_H);
        for (index, glyph) in font5x7::GLYPHS.iter().enumerate() {
            let cell_x = (index as u32 % ATLAS_COLS) * CELL_W;
            let cell_y = (index as u32 / ATLAS_COLS) * CELL_H;
            for (gx, column) in glyph.iter().enumerate() {
                for gy in 0..font5x7::GLYPH_HEIGHT {
                    if column >> gy & 1 == 1 {
                        image.put_pixel(cell_x + gx as u32, cell_y + gy, Rgba([255; 4]));
                    }
                }
            }
        }
        let atlas = Texture::new(gl, &DynamicImage::ImageRgba8(image))?;
        Ok(Self { atlas })
    }

    /// The atlas texture handle, used to key draw batches.
    pub fn atlas_handle(&self) -> TextureHandle {
        self.atlas.handle()
    }

    /// Advance width and line height of one glyph cell at `size`.
    pub fn char_size(size: f32) -> Vec2 {
        vec2(size * CELL_W as f32 / CELL_H as f32, size)
    }

    /// The measurement collaborator matching this font's advance math.
    pub fn metrics() -> MonoMetrics {
        MonoMetrics {
            aspect: CELL_W as f32 / CELL_H as f32,
        }
    }

    /// UV corners for a character's atlas cell, if it has a glyph.
    pub fn glyph_uvs(&self, c: char) -> Option<[Vec2; 2]> {
        let code = c as u32;
        let first = font5x7::FIRST_CHAR as u32;
        if code < first || code >= first + font5x7::GLYPH_COUNT as u32 {
            return None;
        }
        let index = code - first;
        let atlas_size = vec2(self.atlas.width() as f32, self.atlas.height() as f32);
        let uv_min = vec2(
            ((index % ATLAS_COLS) * CELL_W) as f32,
            ((index / ATLAS_COLS) * CELL_H) as f32,
        ) / atlas_size;
        let uv_max = uv_min + vec2(CELL_W as f32, CELL_H as f32) / atlas_size;
        Some([uv_min, uv_max])
    }

    /// Lays out glyph quads for `text` starting at `origin`. Characters
    /// without a glyph still advance the cursor so measurement and layout
    /// agree.
    pub fn layout(&self, text: &str, origin: Vec2, size: f32) -> Vec<GlyphQuad> {
        let char_size = Self::char_size(size);
        let mut quads = Vec::new();
        let mut cursor = origin;
        for line in text.split('\n') {
            for c in line.chars() {
                if let Some([uv_min, uv_max]) = self.glyph_uvs(c) {
                    quads.push(GlyphQuad {
                        min: cursor,
                        max: cursor + char_size,
                        uv_min,
                        uv_max,
                    });
                }
                cursor.x += char_size.x;
            }
            cursor.x = origin.x;
            cursor.y += char_size.y;
        }
        quads
    }
}
