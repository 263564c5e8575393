//! Error types for spawn point queries

use spawnwatch_types::SpawnId;
use thiserror::Error;

/// Errors during spawn table queries. Storage faults are surfaced unchanged.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("datafusion error")]
    DataFusion(#[from] datafusion::error::DataFusionError),

    #[error("arrow error")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("unexpected column type for column {idx}: expected {expected}, got {actual}")]
    UnexpectedColumnType {
        idx: usize,
        expected: &'static str,
        actual: String,
    },

    #[error("spawn point id {id} appears more than once")]
    DuplicateId { id: SpawnId },

    #[error("SQL execution failed: {query}")]
    SqlExecution {
        query: String,
        #[source]
        source: datafusion::error::DataFusionError,
    },
}
