//! # Etiqueta - Label Printing Library
//!
//! Etiqueta turns short text into monochrome label images and sends them to
//! a label printer. It provides:
//!
//! - **Label catalog**: endless tape, die-cut and round label sizes
//! - **Fonts**: TrueType faces from font folders plus a built-in bitmap face
//! - **Rendering**: multi-line text composed onto a canvas sized for the label
//! - **Encoding**: 1-bit raster jobs for the printer
//! - **Transport**: TCP and device-file backends
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use etiqueta::{
//!     encoder::MonoRasterEncoder,
//!     fonts::{BUILTIN_FAMILY, BUILTIN_STYLE, FontCatalog, FontChoice},
//!     label::LabelCatalog,
//!     orchestrator::{Orchestrator, PrinterSettings},
//!     request::{Defaults, LabelForm},
//!     transport::Backends,
//! };
//!
//! let labels = Arc::new(LabelCatalog::builtin());
//! let orchestrator = Orchestrator::new(
//!     Arc::new(FontCatalog::with_builtin()),
//!     labels.clone(),
//!     Defaults::new(FontChoice::new(BUILTIN_FAMILY, BUILTIN_STYLE)),
//!     Arc::new(MonoRasterEncoder::new(labels)),
//!     Arc::new(Backends::default()),
//!     PrinterSettings::new("tcp://192.168.0.23:9100"),
//! );
//!
//! let result = orchestrator.print(&LabelForm::with_text("Hello\nWorld"));
//! assert!(result.success);
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`label`] | Label sizes and printable areas |
//! | [`fonts`] | Font catalog and faces |
//! | [`request`] | Form parsing and defaults |
//! | [`geometry`] | Canvas dimensions and orientation |
//! | [`render`] | Text composition |
//! | [`encoder`] | Raster job encoding |
//! | [`transport`] | Printer backends |
//! | [`orchestrator`] | Preview and print flows |
//! | [`server`] | HTTP API |
//! | [`config`] | Settings file |
//! | [`error`] | Error types |

pub mod config;
pub mod encoder;
pub mod error;
pub mod fonts;
pub mod geometry;
pub mod label;
pub mod orchestrator;
pub mod render;
pub mod request;
pub mod server;
pub mod transport;

// Re-exports for convenience
pub use error::LabelError;
pub use orchestrator::{Orchestrator, PrintResult};
