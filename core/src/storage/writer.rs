//! Parquet writer for the spawn point table.

use arrow::array::{ArrayRef, Float64Builder, Int32Builder, Int64Builder, StringBuilder};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use spawnwatch_types::SpawnPoint;

use super::{StorageError, columns};

/// Canonical spawn table schema.
pub fn spawn_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(columns::ID, DataType::Int64, false),
        Field::new(columns::LATITUDE, DataType::Float64, true),
        Field::new(columns::LONGITUDE, DataType::Float64, true),
        Field::new(columns::EVENT_ID, DataType::Int32, false),
        Field::new(columns::DESPAWN, DataType::Utf8, true),
        Field::new(columns::SPAWNDEF, DataType::Int32, false),
    ]))
}

/// Cast a batch with the spawn columns (in any order, any compatible types)
/// onto the canonical schema.
pub fn conform_batch(batch: &RecordBatch) -> Result<RecordBatch, ArrowError> {
    let schema = spawn_schema();
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());
    for field in schema.fields() {
        let (idx, _) = batch.schema_ref().column_with_name(field.name()).ok_or_else(|| {
            ArrowError::SchemaError(format!("missing column {}", field.name()))
        })?;
        columns.push(cast(batch.column(idx), field.data_type())?);
    }
    RecordBatch::try_new(schema, columns)
}

/// Buffers spawn points and writes them as one parquet file.
pub struct SpawnWriter {
    rows: Vec<SpawnPoint>,
}

impl SpawnWriter {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
        }
    }

    pub fn extend(&mut self, spawns: impl IntoIterator<Item = SpawnPoint>) {
        self.rows.extend(spawns);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write buffered rows to a parquet file.
    /// An empty buffer still produces a file carrying the schema.
    pub fn write_to_file(&self, path: &Path) -> Result<(), StorageError> {
        let batch = self.build_record_batch()?;
        write_batches(path, &[batch])
    }

    pub fn build_record_batch(&self) -> Result<RecordBatch, ArrowError> {
        let len = self.rows.len();

        let mut id = Int64Builder::with_capacity(len);
        let mut latitude = Float64Builder::with_capacity(len);
        let mut longitude = Float64Builder::with_capacity(len);
        let mut event_id = Int32Builder::with_capacity(len);
        let mut despawn = StringBuilder::with_capacity(len, len * 5);
        let mut spawndef = Int32Builder::with_capacity(len);

        for row in &self.rows {
            id.append_value(row.id);
            latitude.append_value(row.location.latitude);
            longitude.append_value(row.location.longitude);
            event_id.append_value(row.event_id);
            despawn.append_option(row.despawn.known().map(|ms| ms.to_string()));
            spawndef.append_value(row.spawndef);
        }

        let columns: Vec<ArrayRef> = vec![
            Arc::new(id.finish()),
            Arc::new(latitude.finish()),
            Arc::new(longitude.finish()),
            Arc::new(event_id.finish()),
            Arc::new(despawn.finish()),
            Arc::new(spawndef.finish()),
        ];

        RecordBatch::try_new(spawn_schema(), columns)
    }
}

impl Default for SpawnWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Sibling file a write is staged in before it replaces `path`.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write canonical spawn batches to a parquet file, ZSTD-compressed.
///
/// The file is written next to `path` and renamed over it once complete, so a
/// failed write leaves any existing file untouched.
pub fn write_batches(path: &Path, batches: &[RecordBatch]) -> Result<(), StorageError> {
    let staging = staging_path(path);
    let rows = match write_parquet(&staging, batches) {
        Ok(rows) => rows,
        Err(e) => {
            let _ = std::fs::remove_file(&staging);
            return Err(e);
        }
    };
    if let Err(source) = std::fs::rename(&staging, path) {
        let _ = std::fs::remove_file(&staging);
        return Err(StorageError::ReplaceFile {
            path: path.to_path_buf(),
            source,
        });
    }

    tracing::info!(path = %path.display(), rows, "Wrote spawn file");
    Ok(())
}

fn write_parquet(path: &Path, batches: &[RecordBatch]) -> Result<usize, StorageError> {
    let file = File::create(path).map_err(|source| StorageError::CreateFile {
        path: path.to_path_buf(),
        source,
    })?;
    let props = WriterProperties::builder()
        .set_compression(Compression::ZSTD(Default::default()))
        .build();

    let write_err = |source| StorageError::WriteParquet {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = ArrowWriter::try_new(file, spawn_schema(), Some(props)).map_err(write_err)?;
    let mut rows = 0;
    for batch in batches.iter().filter(|b| b.num_rows() > 0) {
        writer.write(batch).map_err(write_err)?;
        rows += batch.num_rows();
    }
    writer.close().map_err(write_err)?;
    Ok(rows)
}
