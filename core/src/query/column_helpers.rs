use datafusion::arrow::array::{
    Array, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray, StringArray,
    StringViewArray, UInt64Array,
};
use datafusion::arrow::record_batch::RecordBatch;

use super::QueryError;

// ─────────────────────────────────────────────────────────────────────────────
// Generic Column Extractors (handles Arrow type variations automatically)
// ─────────────────────────────────────────────────────────────────────────────

fn unexpected(batch: &RecordBatch, idx: usize, expected: &'static str) -> QueryError {
    QueryError::UnexpectedColumnType {
        idx,
        expected,
        actual: format!("{:?}", batch.column(idx).data_type()),
    }
}

/// Nullable string column; nulls come back as `None`.
pub fn col_opt_strings(batch: &RecordBatch, idx: usize) -> Result<Vec<Option<String>>, QueryError> {
    let col = batch.column(idx);
    if let Some(a) = col.as_any().downcast_ref::<StringViewArray>() {
        return Ok((0..a.len())
            .map(|i| (!a.is_null(i)).then(|| a.value(i).to_string()))
            .collect());
    }
    if let Some(a) = col.as_any().downcast_ref::<StringArray>() {
        return Ok((0..a.len())
            .map(|i| (!a.is_null(i)).then(|| a.value(i).to_string()))
            .collect());
    }
    if let Some(a) = col.as_any().downcast_ref::<LargeStringArray>() {
        return Ok((0..a.len())
            .map(|i| (!a.is_null(i)).then(|| a.value(i).to_string()))
            .collect());
    }
    Err(unexpected(batch, idx, "string"))
}

pub fn col_i64(batch: &RecordBatch, idx: usize) -> Result<Vec<i64>, QueryError> {
    let col = batch.column(idx);
    if let Some(a) = col.as_any().downcast_ref::<Int64Array>() {
        return Ok((0..a.len()).map(|i| a.value(i)).collect());
    }
    if let Some(a) = col.as_any().downcast_ref::<Int32Array>() {
        return Ok((0..a.len()).map(|i| a.value(i) as i64).collect());
    }
    if let Some(a) = col.as_any().downcast_ref::<UInt64Array>() {
        return Ok((0..a.len()).map(|i| a.value(i) as i64).collect());
    }
    Err(unexpected(batch, idx, "int"))
}

pub fn col_i32(batch: &RecordBatch, idx: usize) -> Result<Vec<i32>, QueryError> {
    let col = batch.column(idx);
    if let Some(a) = col.as_any().downcast_ref::<Int32Array>() {
        return Ok((0..a.len()).map(|i| a.value(i)).collect());
    }
    if let Some(a) = col.as_any().downcast_ref::<Int64Array>() {
        return Ok((0..a.len()).map(|i| a.value(i) as i32).collect());
    }
    Err(unexpected(batch, idx, "i32"))
}

pub fn col_f64(batch: &RecordBatch, idx: usize) -> Result<Vec<f64>, QueryError> {
    let col = batch.column(idx);
    if let Some(a) = col.as_any().downcast_ref::<Float64Array>() {
        return Ok((0..a.len()).map(|i| a.value(i)).collect());
    }
    if let Some(a) = col.as_any().downcast_ref::<Float32Array>() {
        return Ok((0..a.len()).map(|i| a.value(i) as f64).collect());
    }
    Err(unexpected(batch, idx, "float"))
}
