//! # Label Composition
//!
//! Lays out (possibly multi-line) text on a grayscale canvas sized for the
//! label medium.
//!
//! ## Placement
//!
//! | Kind | Orientation | Canvas | Vertical offset | Horizontal offset |
//! |------|-------------|--------|-----------------|-------------------|
//! | Endless | standard | height = text + top + bottom | top margin | centered |
//! | Endless | rotated | width = text + left + right | centered, biased | left margin |
//! | Die-cut | any | fixed | centered, biased | centered |
//!
//! "Biased" centering adds `(top - bottom) / 2` to the centered offset, so
//! asymmetric margins shift the text off the geometric center. Centered
//! horizontal offsets are clamped at 0.
//!
//! ## Example
//!
//! ```
//! use etiqueta::fonts::{FontCatalog, FontChoice};
//! use etiqueta::label::LabelCatalog;
//! use etiqueta::render;
//! use etiqueta::request::{Defaults, Flow, LabelForm, Resolver};
//!
//! let fonts = FontCatalog::with_builtin();
//! let labels = LabelCatalog::builtin();
//! let defaults = Defaults::new(FontChoice::new("Spleen", "Regular"));
//!
//! let request = Resolver::new(&fonts, &labels, &defaults)
//!     .resolve(&LabelForm::with_text("Hello"), Flow::Print)?;
//! let label = render::render_label(request)?;
//!
//! assert_eq!(label.image.width(), 696);
//! # Ok::<(), etiqueta::error::LabelError>(())
//! ```

pub mod text;

use base64::Engine as _;
use image::{GrayImage, ImageEncoder, Luma};

use crate::error::LabelError;
use crate::fonts::FontFace;
use crate::geometry::{Dimensions, Orientation, finalize};
use crate::request::LabelRequest;
use text::TextBlock;

pub use text::{LINE_SPACING, normalize_lines};

/// Largest canvas the composer will allocate, in pixels.
pub const MAX_CANVAS_PIXELS: u64 = 64 * 1024 * 1024;

/// # Rendered Label
///
/// The grayscale bitmap plus the request that produced it. The request's
/// canvas dimensions are final and match the image.
#[derive(Debug, Clone)]
pub struct RenderedLabel {
    pub image: GrayImage,
    pub request: LabelRequest,
}

impl RenderedLabel {
    /// Encode the bitmap as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, LabelError> {
        let mut png_bytes = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(
                self.image.as_raw(),
                self.image.width(),
                self.image.height(),
                image::ExtendedColorType::L8,
            )
            .map_err(|e: image::ImageError| LabelError::Image(e.to_string()))?;

        Ok(png_bytes)
    }

    /// PNG bytes in standard base64, for text-only channels.
    pub fn to_base64_png(&self) -> Result<String, LabelError> {
        Ok(base64::engine::general_purpose::STANDARD.encode(self.to_png()?))
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.image.width(), self.image.height())
    }
}

/// Load the request's font and compose the label.
pub fn render_label(request: LabelRequest) -> Result<RenderedLabel, LabelError> {
    let face = request.font_resource.load(request.font_size)?;
    compose(request, face.as_ref())
}

/// Compose the label with an already loaded face.
pub fn compose(mut request: LabelRequest, face: &dyn FontFace) -> Result<RenderedLabel, LabelError> {
    let block = TextBlock::measure(&request.text, face);
    let margins = request.margins;

    // Saturating, so oversized text is caught by the canvas limit below
    let content = Dimensions::new(
        block.width.saturating_add(margins.left).saturating_add(margins.right),
        block.height.saturating_add(margins.top).saturating_add(margins.bottom),
    );
    let dims = finalize(request.canvas, content);

    if dims.width == 0 || dims.height == 0 {
        return Err(LabelError::RenderFailure(format!(
            "empty canvas {}x{}",
            dims.width, dims.height
        )));
    }
    if dims.width as u64 * dims.height as u64 > MAX_CANVAS_PIXELS {
        return Err(LabelError::RenderFailure(format!(
            "canvas {}x{} is too large",
            dims.width, dims.height
        )));
    }

    let (x, y) = text_offset(&request, dims, &block);
    log::debug!(
        "Text {}x{} placed at ({}, {}) on {}x{} canvas",
        block.width,
        block.height,
        x,
        y,
        dims.width,
        dims.height
    );

    let mut image = GrayImage::from_pixel(dims.width, dims.height, Luma([255]));
    block.draw(&mut image, face, x, y, request.align)?;

    request.canvas.dims = dims;
    Ok(RenderedLabel { image, request })
}

/// Top-left corner of the text block on the final canvas.
fn text_offset(request: &LabelRequest, canvas: Dimensions, block: &TextBlock) -> (i64, i64) {
    let margins = request.margins;
    let die_cut = request.kind.is_die_cut();

    // Floor division, so negative slack rounds the same way for every size.
    let biased_center = (canvas.height as i64 - block.height as i64).div_euclid(2)
        + (margins.top as i64 - margins.bottom as i64).div_euclid(2);
    let centered_x = (canvas.width as i64 - block.width as i64).div_euclid(2).max(0);

    match request.orientation {
        Orientation::Standard => {
            let y = if die_cut { biased_center } else { margins.top as i64 };
            (centered_x, y)
        }
        Orientation::Rotated => {
            let x = if die_cut { centered_x } else { margins.left as i64 };
            (x, biased_center)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::{BitmapFace, FontChoice, FontResource};
    use crate::geometry::canonical_canvas;
    use crate::label::{LabelKind, LabelSpec};
    use crate::request::{Align, Margins};
    use pretty_assertions::assert_eq;

    fn request(spec: &LabelSpec, orientation: Orientation, text: &str) -> LabelRequest {
        LabelRequest {
            text: text.to_string(),
            font: FontChoice::new("Spleen", "Regular"),
            font_resource: FontResource::Bitmap,
            font_size: 100,
            label_size: spec.id.clone(),
            kind: spec.kind,
            orientation,
            align: Align::Center,
            margin: 10,
            threshold: 70,
            margins: Margins {
                top: 24,
                bottom: 45,
                left: 35,
                right: 35,
            },
            canvas: canonical_canvas(spec, orientation),
        }
    }

    fn endless() -> LabelSpec {
        LabelSpec::new("62", "62mm endless", LabelKind::Endless, 696, 300)
    }

    fn die_cut() -> LabelSpec {
        LabelSpec::new("62x29", "62mm x 29mm die-cut", LabelKind::DieCut, 696, 271)
    }

    /// Bounding box of all inked pixels: (min_x, min_y, max_x, max_y).
    fn ink_bounds(image: &GrayImage) -> Option<(u32, u32, u32, u32)> {
        image
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[0] < 255)
            .fold(None, |acc, (x, y, _)| match acc {
                None => Some((x, y, x, y)),
                Some((a, b, c, d)) => Some((a.min(x), b.min(y), c.max(x), d.max(y))),
            })
    }

    #[test]
    fn test_endless_standard_grows_height() {
        let face = BitmapFace::new(100);
        let label = compose(request(&endless(), Orientation::Standard, "A"), &face).unwrap();
        assert_eq!(label.dimensions(), Dimensions::new(696, 100 + 24 + 45));
        assert_eq!(label.request.canvas.dims, label.dimensions());
    }

    #[test]
    fn test_endless_rotated_grows_width() {
        let face = BitmapFace::new(100);
        let label = compose(request(&endless(), Orientation::Rotated, "AB"), &face).unwrap();
        assert_eq!(label.dimensions(), Dimensions::new(100 + 35 + 35, 696));
    }

    #[test]
    fn test_endless_offsets() {
        let face = BitmapFace::new(100);
        let req = request(&endless(), Orientation::Standard, "A");
        let block = TextBlock::measure("A", &face);
        assert_eq!(text_offset(&req, Dimensions::new(696, 169), &block), (323, 24));

        let rotated = request(&endless(), Orientation::Rotated, "A");
        // (696 - 100) / 2 + floor((24 - 45) / 2) = 298 - 11
        assert_eq!(text_offset(&rotated, Dimensions::new(120, 696), &block), (35, 287));
    }

    #[test]
    fn test_die_cut_offsets() {
        let face = BitmapFace::new(100);
        let block = TextBlock::measure("A", &face);
        let req = request(&die_cut(), Orientation::Standard, "A");
        // (271 - 100) / 2 + floor(-21 / 2) = 85 - 11
        assert_eq!(text_offset(&req, Dimensions::new(696, 271), &block), (323, 74));
    }

    #[test]
    fn test_rotated_die_cut_offsets() {
        let face = BitmapFace::new(100);
        let block = TextBlock::measure("A", &face);
        let req = request(&die_cut(), Orientation::Rotated, "A");
        assert_eq!(req.canvas.dims, Dimensions::new(271, 696));
        // x: (271 - 50) / 2, y: (696 - 100) / 2 + floor(-21 / 2)
        assert_eq!(text_offset(&req, req.canvas.dims, &block), (110, 287));
    }

    #[test]
    fn test_round_die_cut_offsets() {
        let round = LabelSpec::new("d24", "24mm round die-cut", LabelKind::RoundDieCut, 236, 236);
        let face = BitmapFace::new(100);
        let block = TextBlock::measure("A", &face);
        for orientation in [Orientation::Standard, Orientation::Rotated] {
            let req = request(&round, orientation, "A");
            assert_eq!(req.canvas.dims, Dimensions::new(236, 236));
            // x: (236 - 50) / 2, y: (236 - 100) / 2 + floor(-21 / 2)
            assert_eq!(text_offset(&req, req.canvas.dims, &block), (93, 57), "{:?}", orientation);
        }
    }

    #[test]
    fn test_die_cut_ignores_text_extent() {
        let face = BitmapFace::new(100);
        for orientation in [Orientation::Standard, Orientation::Rotated] {
            let short = compose(request(&die_cut(), orientation, "A"), &face).unwrap();
            let long = compose(
                request(&die_cut(), orientation, "A much longer line\nand another\nand more"),
                &face,
            )
            .unwrap();
            assert_eq!(short.dimensions(), long.dimensions());
        }
    }

    #[test]
    fn test_wide_text_is_clamped_to_left_edge() {
        let face = BitmapFace::new(100);
        let label = compose(
            request(&die_cut(), Orientation::Standard, "WWWWWWWWWWWWWWWW"),
            &face,
        )
        .unwrap();
        let (min_x, _, _, _) = ink_bounds(&label.image).unwrap();
        assert!(min_x < 50);
    }

    #[test]
    fn test_ink_lands_after_top_margin() {
        let face = BitmapFace::new(100);
        let label = compose(request(&endless(), Orientation::Standard, "H"), &face).unwrap();
        let (_, min_y, _, max_y) = ink_bounds(&label.image).unwrap();
        assert!(min_y >= 24);
        assert!(max_y < 24 + 100);
    }

    #[test]
    fn test_empty_preview_renders_blank_canvas() {
        let face = BitmapFace::new(100);
        let label = compose(request(&endless(), Orientation::Standard, ""), &face).unwrap();
        assert_eq!(label.dimensions(), Dimensions::new(696, 169));
        assert!(ink_bounds(&label.image).is_none());
    }

    #[test]
    fn test_oversized_canvas_is_rejected() {
        let face = BitmapFace::new(100);
        let text = "A\n".repeat(200_000);
        let err = compose(request(&endless(), Orientation::Standard, &text), &face).unwrap_err();
        assert_eq!(err.kind(), "RenderFailure");
    }

    #[test]
    fn test_huge_face_is_rejected_without_overflow() {
        let face = BitmapFace::new(4_000_000_000);
        for orientation in [Orientation::Standard, Orientation::Rotated] {
            let err = compose(request(&endless(), orientation, "ABC\nDEF"), &face).unwrap_err();
            assert_eq!(err.kind(), "RenderFailure");
        }
    }

    #[test]
    fn test_png_output() {
        let face = BitmapFace::new(40);
        let label = compose(request(&endless(), Orientation::Standard, "png"), &face).unwrap();
        let png = label.to_png().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.width(), label.image.width());

        let text = label.to_base64_png().unwrap();
        assert!(text.starts_with("iVBORw0KGgo"));
    }
}
