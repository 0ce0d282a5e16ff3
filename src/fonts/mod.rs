//! # Font Catalog
//!
//! Maps a `(family, style)` pair to a renderable font resource.
//!
//! The catalog is filled once at startup (configured font folders plus the
//! built-in bitmap face) and is read-only afterwards, so it can be shared
//! between request handlers without synchronization.
//!
//! ## Font Strings
//!
//! Requests name a font with a single combined string:
//!
//! ```text
//! "DejaVu Sans (Bold)"
//!  └─ family ─┘ └style┘
//! ```
//!
//! [`FontChoice::parse`] is the only place that string is taken apart.

mod bitmap;
mod face;

pub use bitmap::BitmapFace;
pub use face::{FontFace, TtfFace};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LabelError;

/// Family name of the built-in bitmap face.
pub const BUILTIN_FAMILY: &str = "Spleen";

/// Style name of the built-in bitmap face.
pub const BUILTIN_STYLE: &str = "Regular";

/// A font identified by family and style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontChoice {
    pub family: String,
    pub style: String,
}

impl FontChoice {
    pub fn new(family: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            style: style.into(),
        }
    }

    /// Parse a `"Family (Style)"` string.
    ///
    /// ```
    /// use etiqueta::fonts::FontChoice;
    ///
    /// let font = FontChoice::parse("Arial (Bold)").unwrap();
    /// assert_eq!(font, FontChoice::new("Arial", "Bold"));
    /// assert!(FontChoice::parse("Arial").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, LabelError> {
        let malformed = || LabelError::UnknownFont(format!("malformed font name '{}'", raw));

        let trimmed = raw.trim();
        let open = trimmed.rfind('(').ok_or_else(malformed)?;
        let inner = trimmed[open + 1..]
            .strip_suffix(')')
            .ok_or_else(malformed)?;

        let family = trimmed[..open].trim();
        let style = inner.trim();
        if family.is_empty() || style.is_empty() || style.contains(['(', ')']) {
            return Err(malformed());
        }

        Ok(Self::new(family, style))
    }
}

impl fmt::Display for FontChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.family, self.style)
    }
}

/// Where the glyphs of a catalog entry come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontResource {
    /// A TrueType/OpenType file on disk
    File(PathBuf),
    /// The built-in Spleen bitmap face
    Bitmap,
}

impl FontResource {
    /// Load the resource as a face scaled to `size` pixels per em.
    ///
    /// Font files are read on every call; a missing or corrupt file is a
    /// [`LabelError::RenderFailure`].
    pub fn load(&self, size: u32) -> Result<Box<dyn FontFace>, LabelError> {
        match self {
            Self::File(path) => {
                let bytes = fs::read(path).map_err(|e| {
                    LabelError::RenderFailure(format!("Failed to read {}: {}", path.display(), e))
                })?;
                Ok(Box::new(TtfFace::from_bytes(bytes, size)?))
            }
            Self::Bitmap => Ok(Box::new(BitmapFace::new(size))),
        }
    }
}

/// # Font Catalog
///
/// `family → style → resource`, sorted by name so listings and the default
/// font fallback are deterministic.
#[derive(Debug, Clone, Default)]
pub struct FontCatalog {
    families: BTreeMap<String, BTreeMap<String, FontResource>>,
}

impl FontCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog holding only the built-in bitmap face.
    pub fn with_builtin() -> Self {
        let mut catalog = Self::new();
        catalog.insert(BUILTIN_FAMILY, BUILTIN_STYLE, FontResource::Bitmap);
        catalog
    }

    pub fn insert(
        &mut self,
        family: impl Into<String>,
        style: impl Into<String>,
        resource: FontResource,
    ) {
        self.families
            .entry(family.into())
            .or_default()
            .insert(style.into(), resource);
    }

    /// Look up a font by family and style.
    pub fn lookup(&self, family: &str, style: &str) -> Result<&FontResource, LabelError> {
        self.families
            .get(family)
            .and_then(|styles| styles.get(style))
            .ok_or_else(|| LabelError::UnknownFont(format!("{} ({})", family, style)))
    }

    pub fn contains(&self, choice: &FontChoice) -> bool {
        self.lookup(&choice.family, &choice.style).is_ok()
    }

    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.families.keys().map(String::as_str)
    }

    pub fn styles(&self, family: &str) -> Vec<&str> {
        self.families
            .get(family)
            .map(|styles| styles.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Number of `(family, style)` entries.
    pub fn len(&self) -> usize {
        self.families.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `family → [styles]`, for listings.
    pub fn summary(&self) -> BTreeMap<String, Vec<String>> {
        self.families
            .iter()
            .map(|(family, styles)| (family.clone(), styles.keys().cloned().collect()))
            .collect()
    }

    /// Register every `.ttf`/`.otf` file in `dir`.
    ///
    /// Family and style come from the file stem: `DejaVuSans-Bold.ttf`
    /// becomes `DejaVuSans (Bold)`, a stem without a hyphen gets the style
    /// `Regular`. Returns the number of fonts added.
    pub fn scan_folder(&mut self, dir: &Path) -> Result<usize, LabelError> {
        let mut added = 0;

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let is_font = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"));
            if !is_font {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let (family, style) = match stem.rsplit_once('-') {
                Some((family, style)) if !family.is_empty() && !style.is_empty() => {
                    (family.to_string(), style.to_string())
                }
                _ => (stem.to_string(), BUILTIN_STYLE.to_string()),
            };
            log::debug!("Registered font {} ({}) from {}", family, style, path.display());
            self.insert(family, style, FontResource::File(path));
            added += 1;
        }

        Ok(added)
    }

    /// Pick the default font: the first preference present in the catalog,
    /// otherwise the first entry in sorted order.
    pub fn choose_default(&self, preferences: &[FontChoice]) -> Option<FontChoice> {
        if let Some(found) = preferences.iter().find(|c| self.contains(c)) {
            return Some(found.clone());
        }

        let (family, styles) = self.families.iter().next()?;
        let style = styles
            .keys()
            .find(|s| s.as_str() == BUILTIN_STYLE)
            .or_else(|| styles.keys().next())?;
        Some(FontChoice::new(family.clone(), style.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn arial_catalog() -> FontCatalog {
        let mut catalog = FontCatalog::new();
        catalog.insert("Arial", "Bold", FontResource::File("/fonts/arial-bold.ttf".into()));
        catalog
    }

    #[test]
    fn test_parse_font_string() {
        assert_eq!(
            FontChoice::parse("DejaVu Sans (Bold Oblique)").unwrap(),
            FontChoice::new("DejaVu Sans", "Bold Oblique")
        );
        assert_eq!(
            FontChoice::parse("  Arial  ( Bold ) ").unwrap(),
            FontChoice::new("Arial", "Bold")
        );
    }

    #[test]
    fn test_parse_malformed_font_string() {
        for raw in ["Arial", "Arial (Bold", "(Bold)", "Arial ()", "Arial (Bold) x", ""] {
            let err = FontChoice::parse(raw).unwrap_err();
            assert_eq!(err.kind(), "UnknownFont", "{:?}", raw);
        }
    }

    #[test]
    fn test_lookup() {
        let catalog = arial_catalog();
        assert_eq!(
            catalog.lookup("Arial", "Bold").unwrap(),
            &FontResource::File("/fonts/arial-bold.ttf".into())
        );
        assert_eq!(catalog.lookup("Arial", "Italic").unwrap_err().kind(), "UnknownFont");
        assert_eq!(catalog.lookup("Helvetica", "Bold").unwrap_err().kind(), "UnknownFont");
    }

    #[test]
    fn test_choose_default_prefers_configured() {
        let mut catalog = arial_catalog();
        catalog.insert(BUILTIN_FAMILY, BUILTIN_STYLE, FontResource::Bitmap);

        let prefs = [FontChoice::new("Missing", "Book"), FontChoice::new("Arial", "Bold")];
        assert_eq!(catalog.choose_default(&prefs), Some(FontChoice::new("Arial", "Bold")));
    }

    #[test]
    fn test_choose_default_falls_back_to_first() {
        let catalog = FontCatalog::with_builtin();
        assert_eq!(
            catalog.choose_default(&[FontChoice::new("Missing", "Book")]),
            Some(FontChoice::new(BUILTIN_FAMILY, BUILTIN_STYLE))
        );
        assert_eq!(FontCatalog::new().choose_default(&[]), None);
    }

    #[test]
    fn test_scan_folder() {
        let dir = std::env::temp_dir().join(format!("etiqueta-fonts-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("Arial-Bold.ttf"), b"").unwrap();
        fs::write(dir.join("Mono.OTF"), b"").unwrap();
        fs::write(dir.join("readme.txt"), b"").unwrap();

        let mut catalog = FontCatalog::new();
        let added = catalog.scan_folder(&dir).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(added, 2);
        assert!(catalog.lookup("Arial", "Bold").is_ok());
        assert!(catalog.lookup("Mono", "Regular").is_ok());
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_corrupt_font_file_is_render_failure() {
        let path = std::env::temp_dir().join(format!("etiqueta-bad-{}.ttf", std::process::id()));
        fs::write(&path, b"not a font").unwrap();
        let result = FontResource::File(path.clone()).load(40);
        fs::remove_file(&path).unwrap();

        assert_eq!(result.err().map(|e| e.kind()), Some("RenderFailure"));
    }
}
