//! Parquet and split-JSON encodings of a [`Frame`]

use std::sync::Arc;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::json::reader::{infer_json_schema_from_iterator, ReaderBuilder};
use arrow::json::ArrayWriter;
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use serde_json::{json, Map, Value};
use tracing::debug;
use super::error::FrameError;
use super::table::Frame;

const BATCH_SIZE: usize = 8192;

/// Decode in-memory Parquet into a frame labelled `0..n`.
///
/// Struct and list columns become JSON objects and arrays.
pub fn from_parquet_bytes(bytes: &[u8]) -> Result<Frame, FrameError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(Bytes::copy_from_slice(bytes))?;
    let columns: Vec<String> = builder.schema().fields().iter().map(|f| f.name().clone()).collect();
    let reader = builder.with_batch_size(BATCH_SIZE).build()?;

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch?;
        if batch.num_rows() == 0 {
            continue;
        }

        let mut writer = ArrayWriter::new(Vec::new());
        writer.write(&batch)?;
        writer.finish()?;
        let buffer = writer.into_inner();
        if buffer.is_empty() {
            continue;
        }

        // nulls are omitted by the writer
        let records: Vec<Map<String, Value>> = serde_json::from_slice(&buffer)?;
        for mut record in records {
            rows.push(columns.iter().map(|c| record.remove(c).unwrap_or(Value::Null)).collect());
        }
    }

    debug!(rows = rows.len(), columns = columns.len(), "decoded parquet payload");
    Frame::new(columns, rows)
}

/// Encode a frame as Parquet.
///
/// The Arrow schema is inferred from the cells; columns holding only nulls
/// are written as nullable strings. A column whose cells mix JSON kinds
/// (e.g. the counts and top value of a categorical `describe`) is written
/// as text: strings as-is, anything else as its JSON form. Should Arrow
/// still reject the inferred schema, every column is written as text.
/// Row labels are not stored.
pub fn to_parquet_bytes(frame: &Frame) -> Result<Vec<u8>, FrameError> {
    let as_text: Vec<bool> = (0..frame.columns().len())
        .map(|position| has_mixed_kinds(frame, position))
        .collect();
    match write_parquet(frame, &as_text) {
        Err(FrameError::Arrow(error)) => {
            debug!(%error, "inferred schema rejected, writing all columns as text");
            write_parquet(frame, &vec![true; as_text.len()])
        }
        other => other,
    }
}

fn write_parquet(frame: &Frame, as_text: &[bool]) -> Result<Vec<u8>, FrameError> {
    let records: Vec<Value> = frame
        .iter_rows()
        .map(|(_, row)| {
            let object: Map<String, Value> = frame
                .columns()
                .iter()
                .zip(row)
                .zip(as_text)
                .filter(|((_, cell), _)| !cell.is_null())
                .map(|((column, cell), text)| {
                    let cell = if *text { Value::String(cell_text(cell)) } else { cell.clone() };
                    (column.clone(), cell)
                })
                .collect();
            Value::Object(object)
        })
        .collect();

    let inferred = infer_json_schema_from_iterator(records.iter().cloned().map(Ok))?;
    let fields: Vec<Field> = frame
        .columns()
        .iter()
        .zip(as_text)
        .map(|(column, text)| match inferred.field_with_name(column) {
            Ok(field) if !*text => field.clone().with_nullable(true),
            _ => Field::new(column.as_str(), DataType::Utf8, true),
        })
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut buffer = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buffer, schema.clone(), Some(props))?;

    let mut decoder = ReaderBuilder::new(schema.clone())
        .with_batch_size(BATCH_SIZE)
        .build_decoder()?;
    for chunk in records.chunks(BATCH_SIZE) {
        decoder.serialize(chunk)?;
        let batch = decoder
            .flush()?
            .unwrap_or_else(|| RecordBatch::new_empty(schema.clone()));
        writer.write(&batch)?;
    }
    writer.close()?;

    Ok(buffer)
}

/// More than one JSON kind among the column's non-null cells
fn has_mixed_kinds(frame: &Frame, position: usize) -> bool {
    let mut kinds = frame
        .rows()
        .iter()
        .filter_map(|row| row.get(position))
        .filter_map(|cell| match cell {
            Value::Null => None,
            Value::Bool(_) => Some(0u8),
            Value::Number(_) => Some(1),
            Value::String(_) => Some(2),
            Value::Array(_) => Some(3),
            Value::Object(_) => Some(4),
        });
    match kinds.next() {
        Some(first) => kinds.any(|kind| kind != first),
        None => false,
    }
}

fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// `{"columns": [...], "index": [...], "data": [[...], ...]}`
pub fn to_split_json(frame: &Frame) -> Value {
    json!({
        "columns": frame.columns(),
        "index": frame.index().iter().map(|label| label.to_json()).collect::<Vec<_>>(),
        "data": frame.rows(),
    })
}

/// Serialize the split layout to a string
pub fn to_split_json_string(frame: &Frame) -> Result<String, FrameError> {
    Ok(serde_json::to_string(&to_split_json(frame))?)
}
