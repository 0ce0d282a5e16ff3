//! Built-in bitmap face.
//!
//! Uses the Spleen 12x24 bitmap font, scaled with nearest neighbor to a cell
//! of `size/2 × size` pixels. Every glyph has the same advance, which makes
//! layouts exact and predictable. The service always has this face
//! available, even when no font folder is configured.

use image::GrayImage;
use spleen_font::{FONT_12X24, PSF2Font};

use super::face::{FontFace, ink};
use crate::error::LabelError;

const SRC_WIDTH: usize = 12;
const SRC_HEIGHT: usize = 24;

/// Monospaced bitmap face at a fixed pixel size.
#[derive(Debug, Clone, Copy)]
pub struct BitmapFace {
    cell_width: u32,
    cell_height: u32,
}

impl BitmapFace {
    pub fn new(size: u32) -> Self {
        Self {
            cell_width: (size / 2).max(1),
            cell_height: size.max(1),
        }
    }

    /// Width of one character cell in pixels.
    pub fn cell_width(&self) -> u32 {
        self.cell_width
    }
}

impl FontFace for BitmapFace {
    fn line_height(&self) -> u32 {
        self.cell_height
    }

    fn line_width(&self, line: &str) -> u32 {
        let count = u32::try_from(line.chars().count()).unwrap_or(u32::MAX);
        count.saturating_mul(self.cell_width)
    }

    fn draw_line(
        &self,
        canvas: &mut GrayImage,
        x: i64,
        y: i64,
        line: &str,
    ) -> Result<(), LabelError> {
        let mut font = PSF2Font::new(FONT_12X24)
            .map_err(|_| LabelError::RenderFailure("Failed to load bitmap font".into()))?;

        let rows = visible(y, self.cell_height, canvas.height());
        if rows.is_empty() {
            return Ok(());
        }

        for (i, ch) in line.chars().enumerate() {
            let cell_x = x + i as i64 * self.cell_width as i64;
            if cell_x >= canvas.width() as i64 {
                break;
            }
            let cols = visible(cell_x, self.cell_width, canvas.width());
            if cols.is_empty() {
                continue;
            }

            let source = glyph_bitmap(&mut font, ch);
            for dy in rows.clone() {
                let sy = dy as usize * SRC_HEIGHT / self.cell_height as usize;
                for dx in cols.clone() {
                    let sx = dx as usize * SRC_WIDTH / self.cell_width as usize;
                    if source[sy * SRC_WIDTH + sx] {
                        ink(canvas, cell_x + dx, y + dy, 1.0);
                    }
                }
            }
        }

        Ok(())
    }
}

/// Offsets within a cell of `len` pixels starting at `start` that land
/// inside `0..limit`.
fn visible(start: i64, len: u32, limit: u32) -> std::ops::Range<i64> {
    let from = (-start).clamp(0, len as i64);
    let to = (limit as i64 - start).clamp(from, len as i64);
    from..to
}

/// 12x24 glyph as booleans (true = ink). Unknown characters become a box.
fn glyph_bitmap(font: &mut PSF2Font, ch: char) -> Vec<bool> {
    let mut bitmap = vec![false; SRC_WIDTH * SRC_HEIGHT];
    if ch == ' ' {
        return bitmap;
    }

    let utf8 = ch.to_string();
    match font.glyph_for_utf8(utf8.as_bytes()) {
        Some(glyph) => {
            for (row_y, row) in glyph.enumerate() {
                for (col_x, on) in row.enumerate() {
                    if row_y < SRC_HEIGHT && col_x < SRC_WIDTH {
                        bitmap[row_y * SRC_WIDTH + col_x] = on;
                    }
                }
            }
        }
        None => {
            for x in 0..SRC_WIDTH {
                bitmap[x] = true;
                bitmap[(SRC_HEIGHT - 1) * SRC_WIDTH + x] = true;
            }
            for y in 0..SRC_HEIGHT {
                bitmap[y * SRC_WIDTH] = true;
                bitmap[y * SRC_WIDTH + SRC_WIDTH - 1] = true;
            }
        }
    }

    bitmap
}
