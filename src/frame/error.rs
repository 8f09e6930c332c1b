use std::fmt;
use crate::filter::AggregateFunction;
use crate::resolver::quoted_list;

/// Errors raised while touching table data
#[derive(Debug)]
pub enum FrameError {
    MissingColumn { column: String, available: Vec<String> },
    RowWidth { expected: usize, found: usize },
    IndexLength { expected: usize, found: usize },
    /// A record that is not a JSON object
    InvalidRecord(String),
    NonNumeric { column: String, function: AggregateFunction },
    MixedTypes { column: String, function: AggregateFunction },
    UnknownOperator(String),
    Arrow(arrow::error::ArrowError),
    Parquet(parquet::errors::ParquetError),
    Json(serde_json::Error),
}

impl FrameError {
    /// Stable name of the error variant
    pub fn kind(&self) -> &'static str {
        match self {
            FrameError::MissingColumn { .. } => "MissingColumn",
            FrameError::RowWidth { .. } => "RowWidth",
            FrameError::IndexLength { .. } => "IndexLength",
            FrameError::InvalidRecord(_) => "InvalidRecord",
            FrameError::NonNumeric { .. } => "NonNumeric",
            FrameError::MixedTypes { .. } => "MixedTypes",
            FrameError::UnknownOperator(_) => "UnknownOperator",
            FrameError::Arrow(_) => "ArrowError",
            FrameError::Parquet(_) => "ParquetError",
            FrameError::Json(_) => "JsonError",
        }
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::MissingColumn { column, available } => {
                write!(f, "Column '{}' not found. Available columns: {}", column, quoted_list(available))
            }
            FrameError::RowWidth { expected, found } => {
                write!(f, "Row has {} values, expected {}", found, expected)
            }
            FrameError::IndexLength { expected, found } => {
                write!(f, "Index has {} labels, expected {}", found, expected)
            }
            FrameError::InvalidRecord(record) => write!(f, "Record must be a JSON object, got {}", record),
            FrameError::NonNumeric { column, function } => {
                write!(f, "Cannot compute '{}' over non-numeric values in '{}'", function, column)
            }
            FrameError::MixedTypes { column, function } => {
                write!(f, "Cannot compute '{}' over mixed value types in '{}'", function, column)
            }
            FrameError::UnknownOperator(op) => write!(f, "Unknown operator '{}'", op),
            FrameError::Arrow(e) => write!(f, "Arrow error: {}", e),
            FrameError::Parquet(e) => write!(f, "Parquet error: {}", e),
            FrameError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for FrameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FrameError::Arrow(e) => Some(e),
            FrameError::Parquet(e) => Some(e),
            FrameError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<arrow::error::ArrowError> for FrameError {
    fn from(err: arrow::error::ArrowError) -> Self {
        FrameError::Arrow(err)
    }
}

impl From<parquet::errors::ParquetError> for FrameError {
    fn from(err: parquet::errors::ParquetError) -> Self {
        FrameError::Parquet(err)
    }
}

impl From<serde_json::Error> for FrameError {
    fn from(err: serde_json::Error) -> Self {
        FrameError::Json(err)
    }
}
