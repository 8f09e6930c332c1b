//! Diagnostic texts and canonical examples

use serde_json::{json, Value};
use crate::filter::{AggregateFunction, LogicalOperator, Operator};
use crate::resolver::quoted_list;

pub(crate) fn predicate_example() -> Value {
    json!({"PropertyX[.PropertyXFieldA]": {"$gt": "{Value}"}})
}

pub(crate) fn aggregation_example() -> Value {
    json!(["ColumnName[.FieldName]", "function"])
}

pub(crate) fn projection_example() -> Value {
    json!(["ColumnName1[.FieldName1]", "ColumnName2[.FieldName2]"])
}

pub(crate) fn logical_example() -> Value {
    json!({
        "$and": [
            {"PropertyX[.PropertyXFieldA]": {"$gt": "{Value}"}},
            {"$or": [
                {"PropertyY[.PropertyYFieldB]": {"$eq": "{Value}"}},
                {"PropertyZ[.PropertyZFieldC]": {"$lte": "{Value}"}}
            ]}
        ]
    })
}

pub(crate) fn rows_filter() -> String {
    format!("Bad rows_filter expression. Correct form {}", predicate_example())
}

pub(crate) fn rows_multiple_filter() -> String {
    format!("Bad rows_multiple_filter expression. Correct form {}", logical_example())
}

pub(crate) fn columns_filter() -> String {
    format!("Bad columns expression. Correct form {}", projection_example())
}

pub(crate) fn columns_aggregation() -> String {
    format!("Bad columns_aggregation expression. Correct form {}", aggregation_example())
}

/// `{"$lt": "<", ...}`
pub(crate) fn predicate_operators() -> Value {
    Operator::ALL
        .iter()
        .map(|op| (op.client_key().to_string(), Value::from(op.symbol())))
        .collect::<serde_json::Map<_, _>>()
        .into()
}

pub(crate) fn comparison_operator_keys() -> String {
    let keys: Vec<&str> = Operator::ALL.iter().map(Operator::client_key).collect();
    quoted_list(&keys)
}

pub(crate) fn logical_operator_keys() -> String {
    let keys: Vec<&str> = LogicalOperator::ALL.iter().map(LogicalOperator::key).collect();
    quoted_list(&keys)
}

pub(crate) fn aggregate_function_names() -> String {
    let names: Vec<&str> = AggregateFunction::ALL.iter().map(AggregateFunction::name).collect();
    format!("[{}]", names.join(", "))
}
