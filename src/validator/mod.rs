//! Filter expression validation (verb module)
//!
//! Raw JSON-encoded filter strings + schema → canonical filter forms.
//!
//! - [`RowsFilterValidator`] - single predicates and `$and`/`$or` trees
//! - [`ColumnsFilterValidator`] - projections of whole top-level columns
//! - [`ColumnsAggregationValidator`] - `[path, function]` pairs
//! - [`FilterValidator`] - the per-request bundle over all four

mod columns;
mod error;
mod messages;
mod rows;
mod validate;

pub use columns::{ColumnsAggregationValidator, ColumnsFilterValidator};
pub use error::FilterValidationError;
pub use rows::{coerce_value, RowsFilterValidator};
pub use validate::FilterValidator;
