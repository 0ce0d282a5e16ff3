//! # Error Types
//!
//! This module defines the error taxonomy used throughout the etiqueta library.
//!
//! Every request-scoped failure is one of the variants below. The orchestrator
//! converts them into a [`PrintResult`](crate::orchestrator::PrintResult) using
//! [`LabelError::kind`], so none of them ever takes the service down.

use thiserror::Error;

/// Main error type for etiqueta operations
#[derive(Debug, Error)]
pub enum LabelError {
    /// A print request arrived without any text
    #[error("Please provide the text for the label")]
    MissingText,

    /// The font string was malformed or is not in the catalog
    #[error("Could not find the font & style: {0}")]
    UnknownFont(String),

    /// The label size identifier is not in the label table
    #[error("Unknown label_size: {0}")]
    UnknownLabelSize(String),

    /// A request field could not be parsed or is out of range
    #[error("Invalid parameter {field}: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    /// Measuring or drawing the text failed (corrupt font, bad canvas)
    #[error("Render failure: {0}")]
    RenderFailure(String),

    /// The raster encoder rejected the bitmap
    #[error("Encoder error: {0}")]
    Encode(String),

    /// Transport-level errors (connection, I/O)
    #[error("{0}")]
    Transport(String),

    /// The device did not accept the data within the write timeout
    #[error("Transport timed out: {0}")]
    TransportTimeout(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Image encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LabelError {
    /// Stable name of the failure kind, as reported in `PrintResult.error`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingText => "MissingText",
            Self::UnknownFont(_) => "UnknownFont",
            Self::UnknownLabelSize(_) => "UnknownLabelSize",
            Self::InvalidParameter { .. } => "InvalidParameter",
            Self::RenderFailure(_) => "RenderFailure",
            Self::Encode(_) => "EncoderError",
            Self::Transport(_) => "TransportError",
            Self::TransportTimeout(_) => "TransportTimeout",
            Self::Config(_) => "ConfigError",
            Self::Image(_) => "RenderFailure",
            Self::Io(_) => "IoError",
        }
    }

    /// Whether the failure was caused by the caller's input rather than
    /// by rendering or the device.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingText
                | Self::UnknownFont(_)
                | Self::UnknownLabelSize(_)
                | Self::InvalidParameter { .. }
        )
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }
}
