//! Schema normalization errors

use std::fmt;

/// Errors that can occur while normalizing a schema document
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// The document root is not a JSON object
    NotAnObject,
    /// `$ref` points outside the document (e.g. another file or URL)
    UnsupportedReference(String),
    /// `$ref` points at a location that does not exist
    UnresolvedReference(String),
    /// `$ref` chain loops back on itself
    RecursiveReference(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::NotAnObject => write!(f, "Schema document must be a JSON object"),
            SchemaError::UnsupportedReference(r) => {
                write!(f, "Only local references ('#/...') are supported, got '{}'", r)
            }
            SchemaError::UnresolvedReference(r) => write!(f, "Reference '{}' does not resolve", r),
            SchemaError::RecursiveReference(r) => write!(f, "Reference '{}' is recursive", r),
        }
    }
}

impl std::error::Error for SchemaError {}
