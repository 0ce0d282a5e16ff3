//! # Print Orchestration
//!
//! Drives the two request flows:
//!
//! ```text
//! preview: form ──► resolve ──► compose ──► PNG / base64
//! print:   form ──► resolve ──► compose ──► encode ──► transport ──► PrintResult
//! ```
//!
//! Every failure is caught here and turned into a [`PrintResult`]; nothing
//! is retried. A print holds the device lock from opening the transport
//! until the handle is disposed, so two prints to the same printer never
//! interleave. Previews take no lock.

use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use crate::encoder::{EncodeJob, RasterEncoder, Rotate};
use crate::error::LabelError;
use crate::fonts::FontCatalog;
use crate::label::LabelCatalog;
use crate::render::{self, RenderedLabel};
use crate::request::{Defaults, Flow, LabelForm, Resolver};
use crate::transport::{DeviceGuard, TransportFactory};

/// Outcome of a print request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrintResult {
    pub success: bool,
    /// Failure kind, e.g. `"MissingText"`
    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Encoded bytes, only reported in dry-run mode
    #[serde(rename = "data", skip_serializing_if = "Option::is_none")]
    pub raw_encoded_preview: Option<String>,
}

impl PrintResult {
    pub fn success(raw_encoded_preview: Option<String>) -> Self {
        Self {
            success: true,
            error_kind: None,
            message: None,
            raw_encoded_preview,
        }
    }

    pub fn failure(error: &LabelError) -> Self {
        Self {
            success: false,
            error_kind: Some(error.kind().to_string()),
            message: Some(error.to_string()),
            raw_encoded_preview: None,
        }
    }
}

/// Encoding of a preview response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnFormat {
    /// Raw PNG bytes
    #[default]
    Png,
    /// PNG bytes as base64 text
    Base64,
}

impl ReturnFormat {
    pub fn parse(raw: &str) -> Result<Self, LabelError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "png" => Ok(Self::Png),
            "base64" => Ok(Self::Base64),
            other => Err(LabelError::invalid(
                "return_format",
                format!("'{}' is not one of png, base64", other),
            )),
        }
    }
}

/// A rendered preview ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

/// Where and how labels are printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterSettings {
    /// Target descriptor, e.g. `tcp://192.168.0.23:9100`
    pub target: String,
    /// Encode but skip the transport, reporting the bytes instead
    pub dry_run: bool,
    /// Cut after each label
    pub cut: bool,
    /// Where dry runs save the rendered bitmap
    pub debug_image: Option<PathBuf>,
}

impl PrinterSettings {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            dry_run: false,
            cut: true,
            debug_image: None,
        }
    }
}

/// # Orchestrator
///
/// Owns the shared, read-only catalogs and the collaborators for one
/// printer target.
pub struct Orchestrator {
    fonts: Arc<FontCatalog>,
    labels: Arc<LabelCatalog>,
    defaults: Defaults,
    encoder: Arc<dyn RasterEncoder>,
    transports: Arc<dyn TransportFactory>,
    settings: PrinterSettings,
    device_lock: Mutex<()>,
}

impl Orchestrator {
    pub fn new(
        fonts: Arc<FontCatalog>,
        labels: Arc<LabelCatalog>,
        defaults: Defaults,
        encoder: Arc<dyn RasterEncoder>,
        transports: Arc<dyn TransportFactory>,
        settings: PrinterSettings,
    ) -> Self {
        Self {
            fonts,
            labels,
            defaults,
            encoder,
            transports,
            settings,
            device_lock: Mutex::new(()),
        }
    }

    pub fn fonts(&self) -> &FontCatalog {
        &self.fonts
    }

    pub fn labels(&self) -> &LabelCatalog {
        &self.labels
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    pub fn settings(&self) -> &PrinterSettings {
        &self.settings
    }

    /// Resolve and compose a label.
    pub fn render(&self, form: &LabelForm, flow: Flow) -> Result<RenderedLabel, LabelError> {
        let request = Resolver::new(&self.fonts, &self.labels, &self.defaults).resolve(form, flow)?;
        render::render_label(request)
    }

    /// Render a preview image. Text may be absent.
    pub fn preview(&self, form: &LabelForm, format: ReturnFormat) -> Result<PreviewImage, LabelError> {
        let label = self.render(form, Flow::Preview)?;
        match format {
            ReturnFormat::Png => Ok(PreviewImage {
                content_type: "image/png",
                body: label.to_png()?,
            }),
            ReturnFormat::Base64 => Ok(PreviewImage {
                content_type: "text/plain",
                body: label.to_base64_png()?.into_bytes(),
            }),
        }
    }

    /// Render, encode and send one label. Never panics and never retries.
    pub fn print(&self, form: &LabelForm) -> PrintResult {
        match self.try_print(form) {
            Ok(data) => PrintResult::success(data),
            Err(e) => {
                log::warn!("Print failed ({}): {}", e.kind(), e);
                PrintResult::failure(&e)
            }
        }
    }

    /// Like [`Orchestrator::print`], but keeps the error.
    ///
    /// Returns the escaped encoded bytes in dry-run mode, `None` otherwise.
    pub fn try_print(&self, form: &LabelForm) -> Result<Option<String>, LabelError> {
        let label = self.render(form, Flow::Print)?;
        let request = &label.request;
        let job = EncodeJob {
            label_size: &request.label_size,
            threshold: request.threshold,
            cut: self.settings.cut,
            rotate: Rotate::for_label(request.kind, request.orientation),
        };

        if self.settings.dry_run {
            let data = self.encoder.encode(&label.image, &job)?;
            if let Some(path) = &self.settings.debug_image {
                label
                    .image
                    .save(path)
                    .map_err(|e| LabelError::Image(format!("Failed to save {}: {}", path.display(), e)))?;
            }
            log::info!("Dry run: encoded {} bytes for label {}", data.len(), request.label_size);
            return Ok(Some(data.escape_ascii().to_string()));
        }

        let _exclusive = self
            .device_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut device = DeviceGuard::open(self.transports.as_ref(), &self.settings.target)?;
        let data = self.encoder.encode(&label.image, &job)?;
        device.write(&data)?;
        device.close()?;

        log::info!(
            "Printed {}x{} label {} ({} bytes) to {}",
            label.image.width(),
            label.image.height(),
            request.label_size,
            data.len(),
            self.settings.target
        );
        Ok(None)
    }
}
