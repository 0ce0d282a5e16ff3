//! # Label Media
//!
//! This module describes the label media the printer family accepts.
//!
//! ## Label Kinds
//!
//! | Kind | Width | Length | Layout |
//! |------|-------|--------|--------|
//! | Endless | fixed | grows with content | anchored to the margin on the growth axis |
//! | Die-cut | fixed | fixed | centered in the frame |
//! | Round die-cut | fixed | fixed | centered in the frame |
//!
//! ## Usage
//!
//! ```
//! use etiqueta::label::{LabelCatalog, LabelKind};
//!
//! let labels = LabelCatalog::builtin();
//! let spec = labels.lookup("62").unwrap();
//! assert_eq!(spec.kind, LabelKind::Endless);
//! assert_eq!(spec.printable_width, 696);
//! ```

mod sizes;

use serde::Serialize;

use crate::error::LabelError;

/// Physical kind of a label medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelKind {
    /// Continuous tape, cut after printing
    Endless,
    /// Pre-cut rectangular label
    DieCut,
    /// Pre-cut round label
    RoundDieCut,
}

impl LabelKind {
    /// Die-cut media have a fixed frame on both axes.
    #[inline]
    pub fn is_die_cut(self) -> bool {
        matches!(self, Self::DieCut | Self::RoundDieCut)
    }
}

/// # Label Size Metadata
///
/// One entry of the label table. Printable dimensions are in printer dots.
/// For endless media the printable length is `0`: the real length is only
/// known once the text has been laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelSpec {
    /// Identifier used in requests (e.g. "62", "29x90", "d24")
    pub id: String,
    /// Human-readable name (e.g. "62mm endless")
    pub name: String,
    /// Medium kind
    pub kind: LabelKind,
    /// Printable width in dots
    pub printable_width: u32,
    /// Printable height in dots (0 for endless media)
    pub printable_height: u32,
}

impl LabelSpec {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: LabelKind,
        printable_width: u32,
        printable_height: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            printable_width,
            printable_height,
        }
    }
}

/// Read-only table of known label sizes.
///
/// Built once at startup and shared by reference with the resolver and the
/// encoder. Identifiers are unique, so each id maps to exactly one kind.
#[derive(Debug, Clone)]
pub struct LabelCatalog {
    specs: Vec<LabelSpec>,
}

impl LabelCatalog {
    /// The label sizes supported by the printer family.
    pub fn builtin() -> Self {
        Self {
            specs: sizes::builtin_specs(),
        }
    }

    /// Build a catalog from custom entries. Later duplicates of an id are dropped.
    pub fn from_specs(specs: impl IntoIterator<Item = LabelSpec>) -> Self {
        let mut unique: Vec<LabelSpec> = Vec::new();
        for spec in specs {
            if !unique.iter().any(|s| s.id == spec.id) {
                unique.push(spec);
            }
        }
        Self { specs: unique }
    }

    /// Look up a label size by id.
    pub fn lookup(&self, id: &str) -> Result<&LabelSpec, LabelError> {
        self.specs
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| LabelError::UnknownLabelSize(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.specs.iter().any(|s| s.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LabelSpec> {
        self.specs.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.specs.iter().map(|s| s.id.as_str()).collect()
    }
}

impl Default for LabelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
