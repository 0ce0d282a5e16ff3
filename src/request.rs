//! # Request Resolution
//!
//! Turns the loosely-typed fields of an inbound request into a validated,
//! immutable [`LabelRequest`].
//!
//! ## Fields
//!
//! | Field | Default | Notes |
//! |-------|---------|-------|
//! | `text` | none | required for printing |
//! | `font_family` | configured default | `"Family (Style)"` |
//! | `font_size` | 100 | pixels per em, 1 to [`MAX_FONT_SIZE`] |
//! | `label_size` | configured default | label table id |
//! | `margin` | 10 | generic margin, reported only |
//! | `threshold` | 70 | 0–255, used by the encoder |
//! | `align` | center | left, center, right |
//! | `orientation` | configured default | standard, rotated |
//! | `margin_top` | 24 | percent of the font size |
//! | `margin_bottom` | 45 | percent of the font size |
//! | `margin_left` | 35 | percent of the font size |
//! | `margin_right` | 35 | percent of the font size |
//!
//! Resolution either yields a complete request or one tagged error; there
//! is no partially-populated state.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::LabelError;
use crate::fonts::{FontCatalog, FontChoice, FontResource};
use crate::geometry::{CanvasLayout, Orientation, canonical_canvas};
use crate::label::{LabelCatalog, LabelKind};

/// Largest accepted font size in pixels. The widest label prints 1164 dots.
pub const MAX_FONT_SIZE: u32 = 2000;

/// Raw request fields as they arrive from a form or query string.
///
/// Empty strings are treated like absent fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LabelForm {
    pub text: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<String>,
    pub label_size: Option<String>,
    pub margin: Option<String>,
    pub threshold: Option<String>,
    pub align: Option<String>,
    pub orientation: Option<String>,
    pub margin_top: Option<String>,
    pub margin_bottom: Option<String>,
    pub margin_left: Option<String>,
    pub margin_right: Option<String>,
}

impl LabelForm {
    /// A form with only the text set.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Combine two sources of fields; values set in `overrides` win.
    pub fn overlay(self, overrides: LabelForm) -> Self {
        Self {
            text: overrides.text.or(self.text),
            font_family: overrides.font_family.or(self.font_family),
            font_size: overrides.font_size.or(self.font_size),
            label_size: overrides.label_size.or(self.label_size),
            margin: overrides.margin.or(self.margin),
            threshold: overrides.threshold.or(self.threshold),
            align: overrides.align.or(self.align),
            orientation: overrides.orientation.or(self.orientation),
            margin_top: overrides.margin_top.or(self.margin_top),
            margin_bottom: overrides.margin_bottom.or(self.margin_bottom),
            margin_left: overrides.margin_left.or(self.margin_left),
            margin_right: overrides.margin_right.or(self.margin_right),
        }
    }
}

/// Which flow a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Render and return the image; text may be absent
    Preview,
    /// Render and send to the printer; text is required
    Print,
}

/// Horizontal alignment of lines within a multi-line block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

impl Align {
    pub fn parse(raw: &str) -> Result<Self, LabelError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" | "centre" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(LabelError::invalid(
                "align",
                format!("'{}' is not one of left, center, right", other),
            )),
        }
    }
}

/// Margins in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Margins {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

/// Margins in percent of the font size.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct MarginPercents {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Default for MarginPercents {
    fn default() -> Self {
        Self {
            top: 24.0,
            bottom: 45.0,
            left: 35.0,
            right: 35.0,
        }
    }
}

impl MarginPercents {
    /// Scale the percentages by the font size, rounding to whole pixels.
    pub fn to_pixels(self, font_size: u32) -> Margins {
        let px = |pct: f64| (pct * font_size as f64 / 100.0).round() as u32;
        Margins {
            top: px(self.top),
            bottom: px(self.bottom),
            left: px(self.left),
            right: px(self.right),
        }
    }
}

/// Values used when a request leaves a field out.
#[derive(Debug, Clone, PartialEq)]
pub struct Defaults {
    pub font: FontChoice,
    pub font_size: u32,
    pub label_size: String,
    pub orientation: Orientation,
    pub align: Align,
    pub margin: u32,
    pub threshold: u8,
    pub margins: MarginPercents,
}

impl Defaults {
    pub fn new(font: FontChoice) -> Self {
        Self {
            font,
            font_size: 100,
            label_size: "62".to_string(),
            orientation: Orientation::Standard,
            align: Align::Center,
            margin: 10,
            threshold: 70,
            margins: MarginPercents::default(),
        }
    }
}

/// # Label Request
///
/// A fully validated request. Built once per request and dropped after
/// rendering. Margins are already in pixels and the canvas has been
/// through the geometry stage; for endless media one axis of `canvas` is
/// still provisional until the text has been laid out.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRequest {
    pub text: String,
    pub font: FontChoice,
    pub font_resource: FontResource,
    pub font_size: u32,
    pub label_size: String,
    pub kind: LabelKind,
    pub orientation: Orientation,
    pub align: Align,
    pub margin: u32,
    pub threshold: u8,
    pub margins: Margins,
    pub canvas: CanvasLayout,
}

/// Builds [`LabelRequest`]s against the font and label catalogs.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    fonts: &'a FontCatalog,
    labels: &'a LabelCatalog,
    defaults: &'a Defaults,
}

impl<'a> Resolver<'a> {
    pub fn new(fonts: &'a FontCatalog, labels: &'a LabelCatalog, defaults: &'a Defaults) -> Self {
        Self {
            fonts,
            labels,
            defaults,
        }
    }

    /// Validate `form` into a [`LabelRequest`].
    ///
    /// Missing text is checked last, so a print request with both a bad
    /// label size and no text reports the label size.
    pub fn resolve(&self, form: &LabelForm, flow: Flow) -> Result<LabelRequest, LabelError> {
        let font = match field(&form.font_family) {
            Some(raw) => FontChoice::parse(raw)?,
            None => self.defaults.font.clone(),
        };

        let label_size = field(&form.label_size).unwrap_or(self.defaults.label_size.as_str());
        let spec = self.labels.lookup(label_size)?;

        let font_size: u32 = parse_or(&form.font_size, "font_size", self.defaults.font_size)?;
        if font_size == 0 {
            return Err(LabelError::invalid("font_size", "must be positive"));
        }
        if font_size > MAX_FONT_SIZE {
            return Err(LabelError::invalid(
                "font_size",
                format!("must be at most {}", MAX_FONT_SIZE),
            ));
        }
        let margin: u32 = parse_or(&form.margin, "margin", self.defaults.margin)?;
        let threshold: u8 = parse_or(&form.threshold, "threshold", self.defaults.threshold)?;

        let percents = MarginPercents {
            top: percent_or(&form.margin_top, "margin_top", self.defaults.margins.top)?,
            bottom: percent_or(&form.margin_bottom, "margin_bottom", self.defaults.margins.bottom)?,
            left: percent_or(&form.margin_left, "margin_left", self.defaults.margins.left)?,
            right: percent_or(&form.margin_right, "margin_right", self.defaults.margins.right)?,
        };

        let align = field(&form.align)
            .map(Align::parse)
            .transpose()?
            .unwrap_or(self.defaults.align);
        let orientation = field(&form.orientation)
            .map(Orientation::parse)
            .transpose()?
            .unwrap_or(self.defaults.orientation);

        let font_resource = self.fonts.lookup(&font.family, &font.style)?.clone();
        log::debug!("Using font {} with style {}", font.family, font.style);

        let text = match (form.text.as_deref(), flow) {
            (Some(text), _) if !text.is_empty() => text.to_string(),
            (_, Flow::Print) => return Err(LabelError::MissingText),
            (_, Flow::Preview) => String::new(),
        };

        let canvas = canonical_canvas(spec, orientation);
        log::debug!(
            "Label {} ({:?}, {:?}): canvas {}x{}",
            spec.id,
            spec.kind,
            orientation,
            canvas.dims.width,
            canvas.dims.height
        );

        Ok(LabelRequest {
            text,
            font,
            font_resource,
            font_size,
            label_size: spec.id.clone(),
            kind: spec.kind,
            orientation,
            align,
            margin,
            threshold,
            margins: percents.to_pixels(font_size),
            canvas,
        })
    }
}

/// A field's value, with blank values treated as absent.
fn field(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_or<T: FromStr>(
    value: &Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, LabelError> {
    match field(value) {
        Some(raw) => raw
            .parse()
            .map_err(|_| LabelError::invalid(name, format!("'{}' is not a valid value", raw))),
        None => Ok(default),
    }
}

fn percent_or(value: &Option<String>, name: &'static str, default: f64) -> Result<f64, LabelError> {
    let pct: f64 = parse_or(value, name, default)?;
    if !pct.is_finite() || pct < 0.0 {
        return Err(LabelError::invalid(name, "must be a non-negative percentage"));
    }
    Ok(pct)
}
