//! Error types for the export pipeline.
//!
//! [`ExportError`] is what every pipeline step returns. Collaborator failures
//! ([`FetchError`], [`StoreError`]) are wrapped with the context the pipeline
//! knows about (page number, filename) and never retried here.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, ExportError>;

#[derive(Debug, Error)]
pub enum ExportError {
    /// A record cannot be rendered without corrupting its document.
    #[error("malformed record {quote_id}: {reason}")]
    MalformedRecord {
        quote_id: String,
        reason: MalformedReason,
    },

    #[error("could not serialise document header: {0}")]
    Header(#[from] serde_yaml::Error),

    #[error("page size {per_page} is outside 1..={max}")]
    InvalidPageSize { per_page: u32, max: u32 },

    #[error("fetching page {page} failed: {source}")]
    Fetch {
        page: u32,
        #[source]
        source: FetchError,
    },

    #[error("storing {filename} failed: {source}")]
    Storage {
        filename: String,
        #[source]
        source: StoreError,
    },
}

impl ExportError {
    pub fn malformed(quote_id: impl Into<String>, reason: MalformedReason) -> Self {
        ExportError::MalformedRecord {
            quote_id: quote_id.into(),
            reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedReason {
    #[error("quote has no source work")]
    MissingWork,
    #[error("color code {0} is outside the palette (0-4)")]
    ColorOutOfRange(i64),
    #[error("timestamp {0} cannot be represented as a local date")]
    TimestampOutOfRange(i64),
}

/// Failure at the data-source boundary.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("data source returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode quotes: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure at the storage boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
