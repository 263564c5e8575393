//! Error types for spawn point storage

use std::path::PathBuf;
use thiserror::Error;

/// Errors during parquet and import file operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to create file {path}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to replace file {path}")]
    ReplaceFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open file {path}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write parquet file {path}")]
    WriteParquet {
        path: PathBuf,
        #[source]
        source: parquet::errors::ParquetError,
    },

    #[error("failed to read parquet file {path}")]
    ReadParquet {
        path: PathBuf,
        #[source]
        source: parquet::errors::ParquetError,
    },

    #[error("arrow conversion error")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("failed to parse import file {path}")]
    ParseImport {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
