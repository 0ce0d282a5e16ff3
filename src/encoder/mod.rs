//! # Raster Encoding
//!
//! The seam between the composed bitmap and the device wire format.
//!
//! A [`RasterEncoder`] receives the grayscale label, the label size id, the
//! binarization threshold, the cut flag and a rotate instruction, and
//! returns the bytes to send to the printer. The core treats the result as
//! opaque.
//!
//! ## Rotate Instruction
//!
//! | Kind | Orientation | Rotate |
//! |------|-------------|--------|
//! | Endless | standard | `0` |
//! | Endless | rotated | `90` |
//! | Die-cut / round | any | `auto` |

mod mono;

pub use mono::{FLAG_CUT, HEADER_LEN, MAGIC, MonoRasterEncoder};

use image::GrayImage;
use serde::Serialize;
use std::fmt;

use crate::error::LabelError;
use crate::geometry::Orientation;
use crate::label::LabelKind;

/// How the encoder should rotate the bitmap before rasterizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rotate {
    /// Keep as composed
    None,
    /// Turn by 90°
    Quarter,
    /// Let the encoder match the bitmap to the label's printable area
    Auto,
}

impl Rotate {
    /// Rotate instruction for a label kind and orientation.
    pub fn for_label(kind: LabelKind, orientation: Orientation) -> Self {
        match (kind, orientation) {
            (LabelKind::Endless, Orientation::Standard) => Self::None,
            (LabelKind::Endless, Orientation::Rotated) => Self::Quarter,
            (LabelKind::DieCut | LabelKind::RoundDieCut, _) => Self::Auto,
        }
    }
}

impl fmt::Display for Rotate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "0"),
            Self::Quarter => write!(f, "90"),
            Self::Auto => write!(f, "auto"),
        }
    }
}

/// Everything an encoder needs besides the bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeJob<'a> {
    pub label_size: &'a str,
    pub threshold: u8,
    pub cut: bool,
    pub rotate: Rotate,
}

/// Converts a label bitmap to device bytes.
pub trait RasterEncoder: Send + Sync {
    fn encode(&self, image: &GrayImage, job: &EncodeJob<'_>) -> Result<Vec<u8>, LabelError>;
}
