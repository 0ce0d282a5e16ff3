//! # 1-bit Raster Encoder
//!
//! Thresholds the grayscale label to black/white and packs it one bit per
//! dot, one row after another.
//!
//! ## Output Layout
//!
//! ```text
//! ┌──────┬─────────┬──────────┬───────┬──────────────────────────┐
//! │"ETQR"│ width   │ height   │ flags │ rows (width/8 bytes each) │
//! │ 4 B  │ u32 LE  │ u32 LE   │ 1 B   │ MSB = leftmost dot        │
//! └──────┴─────────┴──────────┴───────┴──────────────────────────┘
//! flags: bit 0 = cut after print
//! ```
//!
//! A pixel becomes ink when its gray value is below the threshold
//! (0 = black, 255 = white).

use image::{GrayImage, imageops};
use std::sync::Arc;

use super::{EncodeJob, RasterEncoder, Rotate};
use crate::error::LabelError;
use crate::label::LabelCatalog;

/// Magic bytes at the start of every encoded label.
pub const MAGIC: &[u8; 4] = b"ETQR";

/// Flag bit set when the label should be cut after printing.
pub const FLAG_CUT: u8 = 0x01;

/// Header length in bytes.
pub const HEADER_LEN: usize = 13;

/// Generic 1-bit raster encoder.
#[derive(Debug, Clone)]
pub struct MonoRasterEncoder {
    labels: Arc<LabelCatalog>,
}

impl MonoRasterEncoder {
    pub fn new(labels: Arc<LabelCatalog>) -> Self {
        Self { labels }
    }
}

impl RasterEncoder for MonoRasterEncoder {
    fn encode(&self, image: &GrayImage, job: &EncodeJob<'_>) -> Result<Vec<u8>, LabelError> {
        let spec = self
            .labels
            .lookup(job.label_size)
            .map_err(|e| LabelError::Encode(e.to_string()))?;
        let printable_width = spec.printable_width;

        let rotate = match job.rotate {
            Rotate::None => false,
            Rotate::Quarter => true,
            Rotate::Auto => image.width() != printable_width && image.height() == printable_width,
        };
        let oriented = if rotate {
            imageops::rotate90(image)
        } else {
            image.clone()
        };

        if oriented.width() != printable_width {
            return Err(LabelError::Encode(format!(
                "image is {} dots wide but label {} prints {} dots",
                oriented.width(),
                spec.id,
                printable_width
            )));
        }

        let mut data = Vec::with_capacity(HEADER_LEN + packed_len(&oriented));
        data.extend_from_slice(MAGIC);
        data.extend_from_slice(&oriented.width().to_le_bytes());
        data.extend_from_slice(&oriented.height().to_le_bytes());
        data.push(if job.cut { FLAG_CUT } else { 0 });
        data.extend(pack_rows(&oriented, job.threshold));

        Ok(data)
    }
}

fn packed_len(image: &GrayImage) -> usize {
    (image.width() as usize).div_ceil(8) * image.height() as usize
}

/// Pack the image one bit per dot, MSB first, rows padded to whole bytes.
pub fn pack_rows(image: &GrayImage, threshold: u8) -> Vec<u8> {
    let width_bytes = (image.width() as usize).div_ceil(8);
    let mut data = vec![0u8; packed_len(image)];

    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel.0[0] < threshold {
            let byte_idx = y as usize * width_bytes + x as usize / 8;
            data[byte_idx] |= 0x80 >> (x % 8);
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::{LabelKind, LabelSpec};
    use image::Luma;
    use pretty_assertions::assert_eq;

    fn encoder() -> MonoRasterEncoder {
        MonoRasterEncoder::new(Arc::new(LabelCatalog::from_specs([
            LabelSpec::new("tape", "10 dot tape", LabelKind::Endless, 10, 0),
            LabelSpec::new("card", "10x4 card", LabelKind::DieCut, 10, 4),
        ])))
    }

    fn job(label_size: &str, rotate: Rotate) -> EncodeJob<'_> {
        EncodeJob {
            label_size,
            threshold: 128,
            cut: true,
            rotate,
        }
    }

    #[test]
    fn test_pack_rows_msb_first() {
        let mut image = GrayImage::from_pixel(10, 2, Luma([255]));
        image.put_pixel(0, 0, Luma([0]));
        image.put_pixel(9, 0, Luma([10]));
        image.put_pixel(1, 1, Luma([127]));
        image.put_pixel(2, 1, Luma([128]));

        assert_eq!(pack_rows(&image, 128), vec![0x80, 0x40, 0x40, 0x00]);
    }

    #[test]
    fn test_header() {
        let image = GrayImage::from_pixel(10, 3, Luma([0]));
        let data = encoder().encode(&image, &job("tape", Rotate::None)).unwrap();

        assert_eq!(&data[..4], MAGIC);
        assert_eq!(u32::from_le_bytes(data[4..8].try_into().unwrap()), 10);
        assert_eq!(u32::from_le_bytes(data[8..12].try_into().unwrap()), 3);
        assert_eq!(data[12], FLAG_CUT);
        assert_eq!(data.len(), HEADER_LEN + 2 * 3);
        assert_eq!(&data[HEADER_LEN..HEADER_LEN + 2], &[0xFF, 0xC0]);
    }

    #[test]
    fn test_quarter_turn() {
        let image = GrayImage::from_pixel(7, 10, Luma([255]));
        let data = encoder().encode(&image, &job("tape", Rotate::Quarter)).unwrap();
        assert_eq!(u32::from_le_bytes(data[4..8].try_into().unwrap()), 10);
        assert_eq!(u32::from_le_bytes(data[8..12].try_into().unwrap()), 7);
    }

    #[test]
    fn test_auto_rotates_only_when_needed() {
        let upright = GrayImage::from_pixel(10, 4, Luma([255]));
        let data = encoder().encode(&upright, &job("card", Rotate::Auto)).unwrap();
        assert_eq!(u32::from_le_bytes(data[4..8].try_into().unwrap()), 10);

        let sideways = GrayImage::from_pixel(4, 10, Luma([255]));
        let data = encoder().encode(&sideways, &job("card", Rotate::Auto)).unwrap();
        assert_eq!(u32::from_le_bytes(data[4..8].try_into().unwrap()), 10);
        assert_eq!(u32::from_le_bytes(data[8..12].try_into().unwrap()), 4);
    }

    #[test]
    fn test_width_mismatch() {
        let image = GrayImage::from_pixel(12, 3, Luma([255]));
        let err = encoder().encode(&image, &job("tape", Rotate::None)).unwrap_err();
        assert_eq!(err.kind(), "EncoderError");

        let err = encoder().encode(&image, &job("nope", Rotate::None)).unwrap_err();
        assert_eq!(err.kind(), "EncoderError");
    }
}
