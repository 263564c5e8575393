//! Error types for geofence loading

use std::path::PathBuf;
use thiserror::Error;

/// Errors while reading or parsing a fence file
#[derive(Debug, Error)]
pub enum GeofenceError {
    #[error("failed to read fence file {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: expected `lat,lon`, got {content:?}")]
    InvalidCoordinate { line: usize, content: String },

    #[error("line {line}: coordinate before any [name] header")]
    MissingHeader { line: usize },

    #[error("fence '{name}' has {count} vertices (need at least 3)")]
    TooFewVertices { name: String, count: usize },

    #[error("no fence named '{name}' in {path}")]
    NotFound { name: String, path: PathBuf },

    #[error("fence file {path} contains no fences")]
    Empty { path: PathBuf },
}
