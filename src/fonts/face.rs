//! Font faces: measuring and drawing single lines of text.
//!
//! TrueType/OpenType faces are rasterized with ab_glyph. Coverage is
//! accumulated into the grayscale canvas, so anti-aliased edges stay gray
//! until the encoder binarizes the bitmap.

use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont, point};
use image::GrayImage;

use crate::error::LabelError;

/// A font at a fixed pixel size.
pub trait FontFace: Send + Sync {
    /// Height of one line box in pixels.
    fn line_height(&self) -> u32;

    /// Advance width of `line` in pixels.
    fn line_width(&self, line: &str) -> u32;

    /// Draw `line` in black with the top-left corner of its line box at `(x, y)`.
    ///
    /// Pixels falling outside the canvas are clipped.
    fn draw_line(&self, canvas: &mut GrayImage, x: i64, y: i64, line: &str)
    -> Result<(), LabelError>;
}

/// Darken one canvas pixel by `coverage` (0.0 = untouched, 1.0 = black).
pub(crate) fn ink(canvas: &mut GrayImage, x: i64, y: i64, coverage: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    let level = 255 - (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    pixel.0[0] = pixel.0[0].min(level);
}

/// # TrueType Face
///
/// A parsed font file scaled so one em equals the requested size in pixels.
pub struct TtfFace {
    font: FontArc,
    scale: PxScale,
}

impl TtfFace {
    /// Parse font data. Invalid data is a [`LabelError::RenderFailure`].
    pub fn from_bytes(bytes: Vec<u8>, size: u32) -> Result<Self, LabelError> {
        let font = FontArc::try_from_vec(bytes)
            .map_err(|e| LabelError::RenderFailure(format!("Invalid font data: {}", e)))?;
        let scale = font
            .pt_to_px_scale(size as f32)
            .unwrap_or_else(|| PxScale::from(size as f32));
        Ok(Self { font, scale })
    }

    /// Glyph ids and their x offsets along the line, with kerning.
    fn layout(&self, line: &str) -> (Vec<(GlyphId, f32)>, f32) {
        let scaled = self.font.as_scaled(self.scale);
        let mut glyphs = Vec::with_capacity(line.len());
        let mut caret = 0.0f32;
        let mut previous: Option<GlyphId> = None;

        for ch in line.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            glyphs.push((id, caret));
            caret += scaled.h_advance(id);
            previous = Some(id);
        }

        (glyphs, caret)
    }
}

impl FontFace for TtfFace {
    fn line_height(&self) -> u32 {
        let scaled = self.font.as_scaled(self.scale);
        ((scaled.ascent() - scaled.descent()).ceil() as u32).max(1)
    }

    fn line_width(&self, line: &str) -> u32 {
        let (_, width) = self.layout(line);
        width.max(0.0).ceil() as u32
    }

    fn draw_line(
        &self,
        canvas: &mut GrayImage,
        x: i64,
        y: i64,
        line: &str,
    ) -> Result<(), LabelError> {
        let ascent = self.font.as_scaled(self.scale).ascent();
        let (glyphs, _) = self.layout(line);

        for (id, glyph_x) in glyphs {
            let glyph = id.with_scale_and_position(self.scale, point(glyph_x, ascent));
            let Some(outlined) = self.font.outline_glyph(glyph) else {
                // Whitespace and glyphs without outlines
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                ink(
                    canvas,
                    x + bounds.min.x as i64 + gx as i64,
                    y + bounds.min.y as i64 + gy as i64,
                    coverage,
                );
            });
        }

        Ok(())
    }
}
