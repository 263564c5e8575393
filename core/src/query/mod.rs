//! Query module serving the spawn point table with DataFusion.
//!
//! The table is held in memory as a registered `MemTable` named `spawns`.
//! Reads run SQL under a shared lock; a retag rebuilds the table under the
//! exclusive lock and swaps it in one step, so readers never see a partial update.

mod column_helpers;
mod error;
mod retag;
mod spawns;

use std::path::Path;
use std::sync::Arc;

use datafusion::arrow::record_batch::RecordBatch;
use datafusion::config::ConfigOptions;
use datafusion::datasource::MemTable;
use datafusion::prelude::*;
use hashbrown::HashSet;

use spawnwatch_types::SpawnPoint;

use crate::storage::{
    SpawnWriter, StorageError, conform_batch, read_spawn_file, spawn_schema, write_batches,
};

pub use error::QueryError;

const TABLE: &str = "spawns";

/// Create a fresh SessionContext with our optimized config
fn create_session_context() -> SessionContext {
    let mut config = ConfigOptions::new();
    config.execution.target_partitions = 2; // Default is num_cpus, way too high for a single table
    config.execution.batch_size = 4096;
    SessionContext::new_with_config(config.into())
}

/// Register `batches` as the `spawns` table, replacing any previous registration.
fn register_spawns(ctx: &SessionContext, batches: Vec<RecordBatch>) -> Result<(), QueryError> {
    let mem_table = MemTable::try_new(spawn_schema(), vec![batches])?;
    let _ = ctx.deregister_table(TABLE)?;
    ctx.register_table(TABLE, Arc::new(mem_table))?;
    Ok(())
}

/// Reject batches that carry the same spawn id twice. Expects conformed batches.
fn ensure_unique_ids(batches: &[RecordBatch]) -> Result<(), QueryError> {
    let mut seen = HashSet::new();
    for batch in batches {
        for id in column_helpers::col_i64(batch, 0)? {
            if !seen.insert(id) {
                return Err(QueryError::DuplicateId { id });
            }
        }
    }
    Ok(())
}

/// Execute SQL and collect every batch.
async fn run_sql(ctx: &SessionContext, query: &str) -> Result<Vec<RecordBatch>, QueryError> {
    let df = ctx
        .sql(query)
        .await
        .map_err(|source| QueryError::SqlExecution {
            query: query.to_string(),
            source,
        })?;
    Ok(df.collect().await?)
}

/// Internal state protected by the lock
struct StoreState {
    ctx: SessionContext,
}

/// In-memory spawn point repository backed by a DataFusion session.
pub struct SpawnStore {
    state: tokio::sync::RwLock<StoreState>,
}

impl SpawnStore {
    /// Store over already-conformed batches (see [`crate::storage::conform_batch`]).
    /// Fails with [`QueryError::DuplicateId`] when an id occurs more than once.
    pub fn from_batches(batches: Vec<RecordBatch>) -> Result<Self, QueryError> {
        ensure_unique_ids(&batches)?;
        let ctx = create_session_context();
        register_spawns(&ctx, batches)?;
        Ok(Self {
            state: tokio::sync::RwLock::new(StoreState { ctx }),
        })
    }

    pub fn from_spawns(spawns: impl IntoIterator<Item = SpawnPoint>) -> Result<Self, QueryError> {
        let mut writer = SpawnWriter::new();
        writer.extend(spawns);
        let batch = writer.build_record_batch()?;
        Self::from_batches(vec![batch])
    }

    pub fn empty() -> Result<Self, QueryError> {
        Self::from_batches(Vec::new())
    }

    /// Load the table from a spawn parquet file.
    pub fn open(path: &Path) -> Result<Self, StoreFileError> {
        let batches = read_spawn_file(path)?;
        Ok(Self::from_batches(batches)?)
    }

    /// Write the current table to a spawn parquet file.
    /// Rows are copied as stored, including ones the decoder would skip.
    pub async fn persist(&self, path: &Path) -> Result<(), StoreFileError> {
        let batches = {
            let state = self.state.read().await;
            run_sql(&state.ctx, &format!("SELECT * FROM {TABLE}")).await?
        };
        let batches = batches
            .iter()
            .map(conform_batch)
            .collect::<Result<Vec<_>, _>>()
            .map_err(QueryError::from)?;
        write_batches(path, &batches)?;
        Ok(())
    }

    /// Every valid record currently in the table.
    pub async fn snapshot(&self) -> Result<Vec<SpawnPoint>, QueryError> {
        let state = self.state.read().await;
        spawns::fetch_all(&state.ctx, None).await
    }
}

/// Errors loading a store from, or persisting it to, a spawn file
#[derive(Debug, thiserror::Error)]
pub enum StoreFileError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Query(#[from] QueryError),
}
