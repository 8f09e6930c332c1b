//! Shared test utilities for integration tests

#![allow(dead_code)]

use nestfilter::{parser, FilterRequest, FilterValidator, Frame, SchemaDescriptor};
use serde_json::{json, Value};

/// Load a schema descriptor from the tests/test_data directory
pub fn load_schema(name: &str) -> SchemaDescriptor {
    let path = format!("tests/test_data/{}", name);
    parser::parse_schema_file(&path)
        .unwrap_or_else(|e| panic!("Failed to load test data {}: {}", name, e))
}

/// The sample dataset's schema
pub fn sample_schema() -> SchemaDescriptor {
    load_schema("sample_schema.yaml")
}

/// Four records; array items are numbered 1..16 across rows
pub fn sample_records() -> Vec<Value> {
    (0..4)
        .map(|row| {
            let numbers: Vec<i64> = (1..=4).map(|k| row * 4 + k).collect();
            json!({
                "TextColumn": format!("text{}", row),
                "IntColumn": 25 + row * 5,
                "FloatColumn": (row + 1) as f64,
                "BoolColumn": row % 2 == 0,
                "ArrayColumn": numbers
                    .iter()
                    .map(|n| json!({"number": n, "label": format!("item{}", n)}))
                    .collect::<Vec<_>>(),
                "ObjectColumnNestedArray": {
                    "name": format!("object{}", row),
                    "ArrayProperty": numbers.iter().map(|n| json!({"number": n})).collect::<Vec<_>>(),
                },
                "NestedArrayColumn": [
                    {"inner": [{"value": (row * 2) as f64}, {"value": (row * 2 + 1) as f64}]},
                    {"inner": [{"value": (row * 10) as f64}]},
                ],
            })
        })
        .collect()
}

pub fn sample_frame() -> Frame {
    Frame::from_records(sample_records()).expect("sample records form a frame")
}

/// Validator over the sample schema for the given request
pub fn sample_validator(request: FilterRequest) -> FilterValidator {
    FilterValidator::new(sample_schema(), request)
}

/// Row labels of a frame as plain positions
pub fn positions(frame: &Frame) -> Vec<usize> {
    frame
        .index()
        .iter()
        .map(|label| match label {
            nestfilter::RowLabel::Position(p) => *p,
            other => panic!("unexpected label {}", other),
        })
        .collect()
}

pub fn rows_filter(raw: &str) -> FilterRequest {
    FilterRequest {
        rows_filter: Some(raw.to_string()),
        ..Default::default()
    }
}

pub fn rows_multiple_filter(raw: &str) -> FilterRequest {
    FilterRequest {
        rows_multiple_filter: Some(raw.to_string()),
        ..Default::default()
    }
}
