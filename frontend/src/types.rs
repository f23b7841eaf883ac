//! Common types used across the frontend application.
//!
//! This module centralizes the widget's data model and the error types
//! shared by services and components.
//!
//! # Categories
//!
//! - **File Types** - Selected file and its accepted formats
//! - **Status Types** - Upload lifecycle and error display
//! - **Error Types** - HTTP client and file selection errors

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::config::{
    ACCEPTED_EXTENSIONS, FORMAT_ERROR_MESSAGE, SIZE_ERROR_MESSAGE, UPLOAD_IN_PROGRESS_MESSAGE,
};

// =============================================================================
// File Types
// =============================================================================

/// Accepted spreadsheet formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    /// Comma separated values
    Csv,
    /// Excel workbook
    Xlsx,
}

impl FileKind {
    /// Detect the format from a file name.
    ///
    /// The extension is the case-insensitive suffix after the last `.`;
    /// a name without a dot has no extension.
    pub fn from_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(FileKind::Csv),
            "xlsx" => Some(FileKind::Xlsx),
            _ => None,
        }
    }

    /// Lowercase extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            FileKind::Csv => ACCEPTED_EXTENSIONS[0],
            FileKind::Xlsx => ACCEPTED_EXTENSIONS[1],
        }
    }

    /// Get CSS class for the file icon.
    pub fn icon_class(&self) -> &'static str {
        match self {
            FileKind::Csv => "file-icon csv",
            FileKind::Xlsx => "file-icon xlsx",
        }
    }

    /// Get emoji prefix for display.
    pub fn emoji(&self) -> &'static str {
        match self {
            FileKind::Csv => "📄",
            FileKind::Xlsx => "📊",
        }
    }
}

/// A file accepted by the widget, with its display attributes.
///
/// `H` is the platform handle used to send the bytes
/// (`web_sys::File` in the browser).
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedFile<H> {
    /// File name as reported by the browser
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Detected format
    pub kind: FileKind,
    /// Handle to the file content
    pub handle: H,
}

impl<H> SelectedFile<H> {
    /// Size formatted in kilobytes, e.g. `"12.50 KB"`.
    pub fn size_label(&self) -> String {
        format!("{:.2} KB", self.size as f64 / 1024.0)
    }
}

// =============================================================================
// Status Types
// =============================================================================

/// Upload lifecycle. Exactly one is active at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UploadStatus {
    /// Waiting for a file or for the upload click
    #[default]
    Idle,
    /// Request in flight
    Uploading,
    /// Backend accepted the file
    Success,
    /// Selection rejected or upload failed
    Error,
}

impl UploadStatus {
    /// Get CSS class for styling.
    pub fn css_class(&self) -> &'static str {
        match self {
            UploadStatus::Idle => "status-idle",
            UploadStatus::Uploading => "status-uploading",
            UploadStatus::Success => "status-success",
            UploadStatus::Error => "status-error",
        }
    }
}

/// Display-ready error: a headline plus per-row details.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorReport {
    /// Headline shown in the alert title
    pub message: String,
    /// One line per rejected row, in backend order
    pub details: Vec<String>,
}

impl ErrorReport {
    /// Report with a headline and no details.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: Vec::new(),
        }
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for detail in &self.details {
            write!(f, "\n  - {}", detail)?;
        }
        Ok(())
    }
}

// =============================================================================
// Error Types
// =============================================================================

/// Errors from the HTTP client.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ApiError {
    /// A browser API call failed before the request was sent.
    #[error("Browser error: {0}")]
    Browser(String),

    /// The request never completed (offline, CORS, aborted).
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("Server error ({status})")]
    Http {
        /// HTTP status code
        status: u16,
        /// Parsed JSON body, when the server sent one
        body: Option<Value>,
    },
}

impl ApiError {
    /// Response body attached to the error, if any.
    pub fn body(&self) -> Option<&Value> {
        match self {
            ApiError::Http { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

/// Reasons a picked or dropped file is refused before upload.
///
/// `Display` is the exact message shown to the user.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// Extension is not csv or xlsx.
    #[error("{}", FORMAT_ERROR_MESSAGE)]
    UnsupportedFormat,

    /// File exceeds the advertised size cap.
    #[error("{}", SIZE_ERROR_MESSAGE)]
    TooLarge {
        /// Size of the refused file in bytes
        size: u64,
    },

    /// A file arrived while an upload was in flight.
    #[error("{}", UPLOAD_IN_PROGRESS_MESSAGE)]
    UploadInProgress,
}

/// Result type for HTTP client operations.
pub type ApiResult<T> = Result<T, ApiError>;
