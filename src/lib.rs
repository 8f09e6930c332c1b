//! nestfilter - Filter nested tabular data against a schema descriptor
//!
//! This library provides:
//! - Schema descriptor parsing and normalization (`$ref`, `allOf`)
//! - Filter path resolution with array awareness
//! - Validation of row, logical, projection and aggregation expressions
//! - An in-memory nested frame with Parquet and JSON codecs
//! - Filter processors and an orchestrator over frames or Parquet payloads
//!
//! # Architecture
//!
//! **Noun modules** (data structures):
//! - `schema/` - normalized schema descriptor (SchemaDescriptor, LeafType)
//! - `query/` - raw filter request (FilterRequest)
//! - `filter/` - validated filters (CanonicalPath, RowsFilter, Condition, Operator)
//! - `frame/` - nested table, queries over it, Parquet/JSON codec
//! - `config` - engine options (EngineConfig)
//!
//! **Verb modules** (transformations):
//! - `parser/` - YAML/JSON → SchemaDescriptor, EngineConfig
//! - `resolver/` - SchemaDescriptor + dotted path → CanonicalPath + LeafType
//! - `validator/` - SchemaDescriptor + FilterRequest → ValidatedFilters
//! - `processor/` - Frame + validated filter → Frame
//! - `engine/` - orchestration, output negotiation, multi-payload batches
//!
//! # Example
//!
//! ```ignore
//! use nestfilter::{parser, EngineConfig, FilterRequest, FilterValidator, NestedFilterProcessor, FilterProcessor};
//!
//! let schema = parser::parse_schema_file("schema.yaml")?;
//! let request = FilterRequest {
//!     rows_filter: Some(r#"{"ArrayColumn.number": {"$gte": 3}}"#.into()),
//!     ..Default::default()
//! };
//! let processor = NestedFilterProcessor::new(FilterValidator::new(schema, request), EngineConfig::default())?;
//! let frame = processor.apply_filters_from_bytes(&parquet_bytes)?;
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod frame;
pub mod parser;
pub mod processor;
pub mod query;
pub mod resolver;
pub mod schema;
pub mod validator;

// Re-export commonly used types
pub use config::{EngineConfig, UnknownOperatorPolicy};
pub use engine::{
    aggregate_payloads, apply_filters_from_bytes, apply_filters_from_frame, filter_payloads, render,
    FilterProcessor, FramePayload, NestedFilterProcessor, OutputFormat, ProcessError, Rendered,
};
pub use error::ParseError;
pub use filter::{
    AggregateFunction, CanonicalPath, ColumnsAggregation, ColumnsFilter, Condition, LogicalOperator, Operator,
    PathShape, RowsFilter, RowsMultipleFilter, ValidatedFilters,
};
pub use frame::{Frame, FrameError, FrameQuery, RowLabel};
pub use query::FilterRequest;
pub use resolver::{resolve_path, PropertyInfo, PropertyResolver, ResolveError};
pub use schema::{LeafType, SchemaDescriptor, SchemaError};
pub use validator::{FilterValidationError, FilterValidator};
