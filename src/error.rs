use std::path::PathBuf;

use thiserror::Error;

/// Failure to read a dataset file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot read parquet file {path}: {source}")]
    Parquet {
        path: PathBuf,
        #[source]
        source: parquet::errors::ParquetError,
    },

    #[error("cannot decode parquet batch in {path}: {source}")]
    Arrow {
        path: PathBuf,
        #[source]
        source: arrow::error::ArrowError,
    },

    #[error("{path}: {reason}")]
    Layout { path: PathBuf, reason: String },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}

/// Failure to draw or write the figure.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("figure has no panels")]
    NoPanels,

    #[error("{panels} panels do not fit a {rows}x{columns} grid")]
    GridOverflow {
        panels: usize,
        rows: usize,
        columns: usize,
    },

    #[error("canvas size {0}x{1} is empty")]
    EmptyCanvas(u32, u32),

    #[error("font registration failed: {0}")]
    Font(String),

    #[error("drawing failed: {0}")]
    Backend(String),

    #[error("cannot create {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot encode TIFF {path}: {source}")]
    Tiff {
        path: PathBuf,
        #[source]
        source: tiff::TiffError,
    },
}

impl RenderError {
    /// Wrap a plotters drawing error, whose type depends on the backend.
    pub fn backend(err: impl std::fmt::Display) -> Self {
        RenderError::Backend(err.to_string())
    }
}

/// Failure to read the JSON configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
