//! Parquet reader for the spawn point table.

use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::File;
use std::path::Path;

use arrow::record_batch::RecordBatch;

use super::{StorageError, conform_batch};

/// Read every batch of a spawn file, cast onto the canonical schema.
pub fn read_spawn_file(path: &Path) -> Result<Vec<RecordBatch>, StorageError> {
    let file = File::open(path).map_err(|source| StorageError::OpenFile {
        path: path.to_path_buf(),
        source,
    })?;
    let read_err = |source| StorageError::ReadParquet {
        path: path.to_path_buf(),
        source,
    };
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(read_err)?
        .build()
        .map_err(read_err)?;

    let mut batches = Vec::new();
    for batch in reader {
        batches.push(conform_batch(&batch?)?);
    }

    tracing::debug!(
        path = %path.display(),
        rows = batches.iter().map(RecordBatch::num_rows).sum::<usize>(),
        "Read spawn file"
    );
    Ok(batches)
}
