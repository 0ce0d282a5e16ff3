//! Multi-line text blocks: normalization, measurement and drawing.

use image::GrayImage;

use crate::error::LabelError;
use crate::fonts::FontFace;
use crate::request::Align;

/// Vertical gap between consecutive lines, in pixels.
pub const LINE_SPACING: u32 = 4;

/// Split text into lines, replacing each empty line with a single space.
///
/// An empty line still occupies one line of vertical space; without the
/// placeholder some faces report no extent for it.
pub fn normalize_lines(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .split('\n')
        .map(|line| if line.is_empty() { " ".to_string() } else { line.to_string() })
        .collect()
}

/// A measured block of lines at a fixed face and size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub line_widths: Vec<u32>,
    pub line_height: u32,
    pub width: u32,
    pub height: u32,
}

impl TextBlock {
    /// Measure `text` with `face`.
    pub fn measure(text: &str, face: &dyn FontFace) -> Self {
        let lines = normalize_lines(text);
        let line_widths: Vec<u32> = lines.iter().map(|l| face.line_width(l)).collect();
        let line_height = face.line_height();

        let count = u32::try_from(lines.len()).unwrap_or(u32::MAX);
        let width = line_widths.iter().copied().max().unwrap_or(0);
        let height = count
            .saturating_mul(line_height)
            .saturating_add(count.saturating_sub(1).saturating_mul(LINE_SPACING));

        Self {
            lines,
            line_widths,
            line_height,
            width,
            height,
        }
    }

    /// Draw the block with its top-left corner at `(x, y)`.
    pub fn draw(
        &self,
        canvas: &mut GrayImage,
        face: &dyn FontFace,
        x: i64,
        y: i64,
        align: Align,
    ) -> Result<(), LabelError> {
        let step = self.line_height as i64 + LINE_SPACING as i64;

        for (i, (line, &line_width)) in self.lines.iter().zip(&self.line_widths).enumerate() {
            let slack = (self.width - line_width) as i64;
            let shift = match align {
                Align::Left => 0,
                Align::Center => slack / 2,
                Align::Right => slack,
            };
            face.draw_line(canvas, x + shift, y + i as i64 * step, line)?;
        }

        Ok(())
    }
}
