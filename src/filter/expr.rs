//! Validated filter expressions

use std::fmt;
use super::operator::{AggregateFunction, LogicalOperator, Operator};
use super::path::{CanonicalPath, PathShape};
use super::value::ScalarValue;

/// A single row predicate: `column <operator> comp_value`
#[derive(Debug, Clone, PartialEq)]
pub struct RowsFilter {
    pub column: CanonicalPath,
    /// Array layout of `column`, fixed at validation time
    pub shape: PathShape,
    pub operator: Operator,
    pub comp_value: ScalarValue,
}

impl fmt::Display for RowsFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.column, self.operator, self.comp_value)
    }
}

/// Node of a validated `$and` / `$or` tree
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Predicate(RowsFilter),
    Logical {
        operator: LogicalOperator,
        /// Never empty
        children: Vec<Condition>,
    },
}

impl Condition {
    pub fn is_predicate(&self) -> bool {
        matches!(self, Condition::Predicate(_))
    }
}

/// A validated logical tree over row predicates
#[derive(Debug, Clone, PartialEq)]
pub struct RowsMultipleFilter {
    pub conditions: Condition,
}

/// Top-level columns to project, in request order, without array markers
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnsFilter {
    pub columns: Vec<String>,
}

impl ColumnsFilter {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Aggregate `function` over the leaf addressed by `column`
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnsAggregation {
    pub column: CanonicalPath,
    pub function: AggregateFunction,
}

/// The four filters of one request after validation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidatedFilters {
    pub rows_filter: Option<RowsFilter>,
    pub rows_multiple_filter: Option<RowsMultipleFilter>,
    pub columns_filter: Option<ColumnsFilter>,
    pub columns_aggregation: Option<ColumnsAggregation>,
}

impl ValidatedFilters {
    /// True when applying these filters leaves a table unchanged
    pub fn is_empty(&self) -> bool {
        self.rows_filter.is_none()
            && self.rows_multiple_filter.is_none()
            && self.columns_filter.as_ref().map_or(true, ColumnsFilter::is_empty)
            && self.columns_aggregation.is_none()
    }

    /// Same filters with the columns aggregation dropped
    pub fn without_aggregation(&self) -> ValidatedFilters {
        ValidatedFilters {
            columns_aggregation: None,
            ..self.clone()
        }
    }
}
