//! Canonical filter forms
//!
//! Everything a validator produces and a processor consumes: paths with
//! array markers, their shape classification, the operator vocabularies,
//! typed comparison values, and the four validated filter expressions.

mod expr;
mod operator;
mod path;
mod value;

pub use expr::{ColumnsAggregation, ColumnsFilter, Condition, RowsFilter, RowsMultipleFilter, ValidatedFilters};
pub use operator::{AggregateFunction, LogicalOperator, Operator};
pub use path::{CanonicalPath, PathSegment, PathShape, ARRAY_MARKER};
pub use value::{compare_values, values_equal, ScalarValue};
