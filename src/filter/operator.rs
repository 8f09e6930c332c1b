//! Operator vocabularies: comparison, logical, aggregation

use std::fmt;
use std::cmp::Ordering;
use serde_json::Value;
use super::value::{compare_values, values_equal};

/// Row predicate comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Lt,
    Gt,
    LtEq,
    GtEq,
    Eq,
    NotEq,
}

impl Operator {
    /// All operators, in client-key order
    pub const ALL: [Operator; 6] = [
        Operator::Lt,
        Operator::Gt,
        Operator::LtEq,
        Operator::GtEq,
        Operator::Eq,
        Operator::NotEq,
    ];

    /// Parse a client-facing key such as `$lte`
    pub fn from_client_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.client_key() == key)
    }

    /// Parse an internal symbol such as `<=`
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    pub fn client_key(&self) -> &'static str {
        match self {
            Operator::Lt => "$lt",
            Operator::Gt => "$gt",
            Operator::LtEq => "$lte",
            Operator::GtEq => "$gte",
            Operator::Eq => "$eq",
            Operator::NotEq => "$neq",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::LtEq => "<=",
            Operator::GtEq => ">=",
            Operator::Eq => "=",
            Operator::NotEq => "!=",
        }
    }

    /// Evaluate `left <op> right`.
    ///
    /// Ordering operators are false when the operands are not comparable.
    pub fn apply(&self, left: &Value, right: &Value) -> bool {
        match self {
            Operator::Eq => values_equal(left, right),
            Operator::NotEq => !values_equal(left, right),
            Operator::Lt => compare_values(left, right) == Some(Ordering::Less),
            Operator::Gt => compare_values(left, right) == Some(Ordering::Greater),
            Operator::LtEq => matches!(compare_values(left, right), Some(Ordering::Less | Ordering::Equal)),
            Operator::GtEq => matches!(compare_values(left, right), Some(Ordering::Greater | Ordering::Equal)),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// `$and` / `$or`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub const ALL: [LogicalOperator; 2] = [LogicalOperator::And, LogicalOperator::Or];

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "$and" => Some(LogicalOperator::And),
            "$or" => Some(LogicalOperator::Or),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            LogicalOperator::And => "$and",
            LogicalOperator::Or => "$or",
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Column aggregation function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateFunction {
    Mean,
    Count,
    Max,
    Min,
    Sum,
    Describe,
}

impl AggregateFunction {
    pub const ALL: [AggregateFunction; 6] = [
        AggregateFunction::Mean,
        AggregateFunction::Count,
        AggregateFunction::Max,
        AggregateFunction::Min,
        AggregateFunction::Sum,
        AggregateFunction::Describe,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            AggregateFunction::Mean => "mean",
            AggregateFunction::Count => "count",
            AggregateFunction::Max => "max",
            AggregateFunction::Min => "min",
            AggregateFunction::Sum => "sum",
            AggregateFunction::Describe => "describe",
        }
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
