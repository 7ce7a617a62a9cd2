//! Error types for the explorer.
//!
//! - [`DataLoadError`] - dataset could not be loaded, fatal for the dashboard
//! - [`EmptyTableError`] - an aggregation was asked about a table with no rows
//! - [`InvalidSelectionError`] - a comparison was requested with a bad pair of names

use std::path::PathBuf;

use thiserror::Error;

/// Errors while loading the companies dataset.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// The file does not exist.
    #[error("dataset file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The extension does not map to a known reader.
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    /// A required column is absent from the header.
    #[error("dataset is missing required column '{0}'")]
    MissingColumn(&'static str),

    /// The file exists but could not be read or parsed.
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// The process-wide table was already loaded from another file.
    #[error(
        "dataset already loaded from {}; cannot switch to {}",
        loaded.display(),
        requested.display()
    )]
    AlreadyLoaded { loaded: PathBuf, requested: PathBuf },
}

/// An aggregation needs at least one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no data: the table has no records")]
pub struct EmptyTableError;

/// Comparison precondition violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSelectionError {
    #[error("cannot compare '{0}' with itself")]
    SameCompany(String),

    #[error("company '{0}' is not in the current selection")]
    CompanyNotFound(String),
}
