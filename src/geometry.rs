//! # Label Geometry
//!
//! Derives the canvas dimensions for a label medium and orientation.
//!
//! ## Two-Stage Resolution
//!
//! ```text
//! metadata (w, h) ──► long axis first ──► swap if rotated ──► provisional canvas
//!                                                                 │
//!                     endless: growth axis replaced by the ◄──────┘
//!                     text extent + margins (see render)
//! ```
//!
//! Die-cut media are physically fixed, so their canvas is final after the
//! first stage. Endless media have no fixed length: the axis along the tape
//! (height in standard orientation, width when rotated) is provisional.

use serde::Serialize;

use crate::error::LabelError;
use crate::label::{LabelKind, LabelSpec};

/// Text orientation on the medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Text runs across the tape
    #[default]
    Standard,
    /// Text is turned by 90° and runs along the tape
    Rotated,
}

impl Orientation {
    pub fn parse(raw: &str) -> Result<Self, LabelError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "rotated" => Ok(Self::Rotated),
            other => Err(LabelError::invalid(
                "orientation",
                format!("'{}' is not one of standard, rotated", other),
            )),
        }
    }

    /// Apply this orientation to a `(width, height)` pair.
    #[inline]
    pub fn apply(self, dims: Dimensions) -> Dimensions {
        match self {
            Self::Standard => dims,
            Self::Rotated => dims.swapped(),
        }
    }
}

/// Canvas axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Pixel dimensions of a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub const fn swapped(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Put the longer side on the width.
    #[inline]
    pub fn long_axis_first(self) -> Self {
        if self.height > self.width {
            self.swapped()
        } else {
            self
        }
    }
}

/// # Canvas Layout
///
/// Result of the geometry stage: the canonical canvas plus the axis that
/// still has to grow with the content, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasLayout {
    pub dims: Dimensions,
    pub growth_axis: Option<Axis>,
}

impl CanvasLayout {
    /// Whether both axes are fixed by the medium.
    pub fn is_fixed(&self) -> bool {
        self.growth_axis.is_none()
    }
}

/// Axis along which an endless label grows, `None` for die-cut media.
pub fn growth_axis(kind: LabelKind, orientation: Orientation) -> Option<Axis> {
    match (kind, orientation) {
        (LabelKind::Endless, Orientation::Standard) => Some(Axis::Vertical),
        (LabelKind::Endless, Orientation::Rotated) => Some(Axis::Horizontal),
        (LabelKind::DieCut | LabelKind::RoundDieCut, _) => None,
    }
}

/// Canonical canvas for a medium in the given orientation.
///
/// ```
/// use etiqueta::geometry::{canonical_canvas, Dimensions, Orientation};
/// use etiqueta::label::LabelCatalog;
///
/// let labels = LabelCatalog::builtin();
/// let spec = labels.lookup("29x90").unwrap();
///
/// let standard = canonical_canvas(spec, Orientation::Standard);
/// assert_eq!(standard.dims, Dimensions::new(991, 306));
///
/// let rotated = canonical_canvas(spec, Orientation::Rotated);
/// assert_eq!(rotated.dims, Dimensions::new(306, 991));
/// ```
pub fn canonical_canvas(spec: &LabelSpec, orientation: Orientation) -> CanvasLayout {
    let printable = Dimensions::new(spec.printable_width, spec.printable_height);
    let dims = orientation.apply(printable.long_axis_first());

    CanvasLayout {
        dims,
        growth_axis: growth_axis(spec.kind, orientation),
    }
}

/// Replace the provisional axis of an endless canvas with the content extent.
///
/// `content` is the text extent plus margins along each axis. Die-cut
/// canvases are returned unchanged.
pub fn finalize(layout: CanvasLayout, content: Dimensions) -> Dimensions {
    match layout.growth_axis {
        Some(Axis::Vertical) => Dimensions::new(layout.dims.width, content.height.max(1)),
        Some(Axis::Horizontal) => Dimensions::new(content.width.max(1), layout.dims.height),
        None => layout.dims,
    }
}
