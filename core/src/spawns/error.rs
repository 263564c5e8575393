//! Error types for spawn projection

use thiserror::Error;

/// Per-record projection faults. These never abort a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    #[error("{minute:02}:{second:02} does not map to a single local time this hour")]
    InvalidLocalTime { minute: u32, second: u32 },
}
