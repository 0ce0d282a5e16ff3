//! # Configuration
//!
//! Service settings are read from a JSON file (`config.json` by default)
//! and can be overridden on the command line. Every key is optional.
//!
//! ```json
//! {
//!   "server":  { "host": "0.0.0.0", "port": 8013, "log_level": "info",
//!                "font_folders": ["/usr/share/fonts/truetype/dejavu"] },
//!   "printer": { "target": "tcp://192.168.0.23:9100", "dry_run": false,
//!                "write_timeout_secs": 10, "cut": true },
//!   "label":   { "default_size": "62", "default_orientation": "standard",
//!                "default_fonts": [{ "family": "DejaVuSans", "style": "Bold" }] }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::LabelError;
use crate::fonts::{FontCatalog, FontChoice};
use crate::geometry::Orientation;
use crate::label::LabelCatalog;
use crate::orchestrator::PrinterSettings;
use crate::request::{Align, Defaults, MarginPercents};

/// Config file read when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerSection,
    pub printer: PrinterSection,
    pub label: LabelSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub font_folders: Vec<PathBuf>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8013,
            log_level: "info".to_string(),
            font_folders: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterSection {
    pub target: String,
    pub dry_run: bool,
    pub write_timeout_secs: u64,
    pub cut: bool,
    pub debug_image: Option<PathBuf>,
}

impl Default for PrinterSection {
    fn default() -> Self {
        Self {
            target: "file:///dev/usb/lp0".to_string(),
            dry_run: false,
            write_timeout_secs: 10,
            cut: true,
            debug_image: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSection {
    pub default_size: String,
    pub default_orientation: String,
    pub default_font_size: u32,
    pub default_threshold: u8,
    pub default_align: String,
    pub default_fonts: Vec<FontChoice>,
}

impl Default for LabelSection {
    fn default() -> Self {
        Self {
            default_size: "62".to_string(),
            default_orientation: "standard".to_string(),
            default_font_size: 100,
            default_threshold: 70,
            default_align: "center".to_string(),
            default_fonts: vec![
                FontChoice::new("DejaVuSans", "Regular"),
                FontChoice::new("DejaVuSerif", "Regular"),
                FontChoice::new("Ubuntu", "Regular"),
            ],
        }
    }
}

impl Config {
    /// Load the config file.
    ///
    /// An explicit `path` must exist. Without one, `config.json` in the
    /// working directory is used when present, built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, LabelError> {
        let (path, required) = match path {
            Some(p) => (p, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };

        match fs::read_to_string(path) {
            Ok(raw) => Self::from_json(&raw)
                .map_err(|e| LabelError::Config(format!("{}: {}", path.display(), e))),
            Err(e) if e.kind() == io::ErrorKind::NotFound && !required => Ok(Self::default()),
            Err(e) => Err(LabelError::Config(format!("{}: {}", path.display(), e))),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, LabelError> {
        serde_json::from_str(raw).map_err(|e| LabelError::Config(e.to_string()))
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Build the font catalog: the built-in face plus every configured folder.
    ///
    /// Unreadable folders are skipped with a warning.
    pub fn font_catalog(&self) -> FontCatalog {
        let mut fonts = FontCatalog::with_builtin();
        for folder in &self.server.font_folders {
            match fonts.scan_folder(folder) {
                Ok(count) => log::info!("Loaded {} fonts from {}", count, folder.display()),
                Err(e) => log::warn!("Skipping font folder {}: {}", folder.display(), e),
            }
        }
        fonts
    }

    /// Request defaults, validated against the catalogs.
    pub fn defaults(&self, fonts: &FontCatalog, labels: &LabelCatalog) -> Result<Defaults, LabelError> {
        let label = &self.label;

        if !labels.contains(&label.default_size) {
            return Err(LabelError::Config(format!(
                "Invalid default label size '{}'. Please choose one of: {}",
                label.default_size,
                labels.ids().join(" ")
            )));
        }
        if label.default_font_size == 0 {
            return Err(LabelError::Config("default_font_size must be positive".into()));
        }
        let orientation = Orientation::parse(&label.default_orientation)
            .map_err(|e| LabelError::Config(e.to_string()))?;
        let align = Align::parse(&label.default_align).map_err(|e| LabelError::Config(e.to_string()))?;

        let font = fonts
            .choose_default(&label.default_fonts)
            .ok_or_else(|| LabelError::Config("No fonts available".into()))?;
        if label.default_fonts.contains(&font) {
            log::debug!("Selected the default font {}", font);
        } else {
            log::warn!("Could not find any of the default fonts, using {}", font);
        }

        Ok(Defaults {
            font,
            font_size: label.default_font_size,
            label_size: label.default_size.clone(),
            orientation,
            align,
            margin: 10,
            threshold: label.default_threshold,
            margins: MarginPercents::default(),
        })
    }

    pub fn printer_settings(&self) -> PrinterSettings {
        PrinterSettings {
            target: self.printer.target.clone(),
            dry_run: self.printer.dry_run,
            cut: self.printer.cut,
            debug_image: self.printer.debug_image.clone(),
        }
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.printer.write_timeout_secs.max(1))
    }
}
