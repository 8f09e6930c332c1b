use serde_json::{Map, Value};
use tracing::{debug, error};
use crate::filter::{Condition, LogicalOperator, Operator, RowsFilter, RowsMultipleFilter, ScalarValue};
use crate::resolver::PropertyResolver;
use crate::schema::LeafType;
use super::error::FilterValidationError;
use super::messages;

/// Validates single row predicates and logical trees of them
#[derive(Debug, Clone, Copy)]
pub struct RowsFilterValidator<'a> {
    resolver: PropertyResolver<'a>,
}

impl<'a> RowsFilterValidator<'a> {
    pub fn new(resolver: PropertyResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Validate `{"<path>": {"<$op>": <value>}}`
    pub fn validate(&self, condition: &Value) -> Result<RowsFilter, FilterValidationError> {
        let Some((property, operator_key, raw_value)) = predicate_parts(condition) else {
            return Err(FilterValidationError::Invalid(format!(
                "{}. Must be a dict. Example {}",
                messages::rows_filter(),
                messages::predicate_example()
            )));
        };

        // 1. Resolve the path against the schema
        let info = self.resolver.resolve(property)?;

        // 2. Map the client operator key
        let operator = Operator::from_client_key(operator_key).ok_or_else(|| {
            FilterValidationError::Invalid(format!(
                "Invalid comparison operator, '{}' not in {}",
                operator_key,
                messages::comparison_operator_keys()
            ))
        })?;

        // 3. Only scalar leaves compare against a value
        if !info.leaf_type.is_scalar() {
            return Err(FilterValidationError::Invalid(format!(
                "Filter not supported on {}",
                info.leaf_type
            )));
        }
        let comp_value = coerce_value(raw_value, info.leaf_type)?;

        // 4. Classify the array layout once
        let shape = info.path.shape().ok_or_else(|| {
            FilterValidationError::NotImplemented(format!(
                "Filter over this nested level array is not supported: {}",
                info.path
            ))
        })?;
        debug!(path = %info.path, ?shape, "classified rows filter path");

        Ok(RowsFilter {
            column: info.path,
            shape,
            operator,
            comp_value,
        })
    }

    /// Validate an arbitrarily nested `$and` / `$or` tree.
    ///
    /// Walks the input with an explicit work stack, so deep trees do not
    /// grow the call stack. Children are validated in document order.
    pub fn validate_multiple_filter(&self, conditions: &Value) -> Result<RowsMultipleFilter, FilterValidationError> {
        enum Task<'v> {
            Visit(&'v Value),
            Build { operator: LogicalOperator, arity: usize },
        }

        let mut tasks = vec![Task::Visit(conditions)];
        let mut built: Vec<Condition> = Vec::new();

        while let Some(task) = tasks.pop() {
            match task {
                Task::Visit(condition) => {
                    validate_condition_format(condition)?;
                    if is_predicate(condition) {
                        built.push(Condition::Predicate(self.validate(condition)?));
                        continue;
                    }

                    let operator = logical_operator(condition)?;
                    let children = match condition.get(operator.key()) {
                        Some(Value::Array(children)) if !children.is_empty() => children,
                        _ => {
                            return Err(FilterValidationError::Invalid(format!(
                                "{}. Operator content should be a non-empty array.",
                                condition
                            )))
                        }
                    };
                    for child in children {
                        validate_condition_format(child)?;
                    }

                    tasks.push(Task::Build { operator, arity: children.len() });
                    tasks.extend(children.iter().rev().map(Task::Visit));
                }
                Task::Build { operator, arity } => {
                    let children = built.split_off(built.len().saturating_sub(arity));
                    built.push(Condition::Logical { operator, children });
                }
            }
        }

        match built.pop() {
            Some(conditions) if built.is_empty() => Ok(RowsMultipleFilter { conditions }),
            _ => Err(FilterValidationError::Invalid(messages::rows_multiple_filter())),
        }
    }
}

/// Convert a raw comparison value to the leaf's declared type.
///
/// - `integer`: integers, floats (truncated), numeric strings, booleans
/// - `number`: numbers, numeric strings, booleans
/// - `boolean`: booleans, `"true"`/`"false"` (any case), numbers (non-zero is true)
/// - `string`: strings, and the text of numbers and booleans
pub fn coerce_value(raw: &Value, leaf_type: LeafType) -> Result<ScalarValue, FilterValidationError> {
    let cannot = |target: &str| {
        FilterValidationError::Invalid(format!("Value {} cannot be converted to {}", raw, target))
    };

    match leaf_type {
        LeafType::Integer => match raw {
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(ScalarValue::Integer(i)),
                None => n
                    .as_f64()
                    .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                    .map(|f| ScalarValue::Integer(f.trunc() as i64))
                    .ok_or_else(|| cannot("integer")),
            },
            Value::String(s) => s.trim().parse::<i64>().map(ScalarValue::Integer).map_err(|e| {
                FilterValidationError::Invalid(format!("Value '{}' is not a valid integer: {}", s, e))
            }),
            Value::Bool(b) => Ok(ScalarValue::Integer(i64::from(*b))),
            _ => Err(cannot("integer")),
        },
        LeafType::Number => match raw {
            Value::Number(n) => n.as_f64().map(ScalarValue::Number).ok_or_else(|| cannot("number")),
            Value::String(s) => match s.trim().parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(ScalarValue::Number(f)),
                Ok(_) => Err(cannot("number")),
                Err(e) => Err(FilterValidationError::Invalid(format!(
                    "Value '{}' is not a valid number: {}",
                    s, e
                ))),
            },
            Value::Bool(b) => Ok(ScalarValue::Number(if *b { 1.0 } else { 0.0 })),
            _ => Err(cannot("number")),
        },
        LeafType::Boolean => match raw {
            Value::Bool(b) => Ok(ScalarValue::Boolean(*b)),
            Value::String(s) if s.trim().eq_ignore_ascii_case("true") => Ok(ScalarValue::Boolean(true)),
            Value::String(s) if s.trim().eq_ignore_ascii_case("false") => Ok(ScalarValue::Boolean(false)),
            Value::Number(n) => Ok(ScalarValue::Boolean(n.as_f64().map_or(false, |f| f != 0.0))),
            _ => Err(cannot("boolean")),
        },
        LeafType::String => match raw {
            Value::String(s) => Ok(ScalarValue::String(s.clone())),
            Value::Number(n) => Ok(ScalarValue::String(n.to_string())),
            Value::Bool(b) => Ok(ScalarValue::String(b.to_string())),
            _ => Err(cannot("string")),
        },
        other => Err(FilterValidationError::Invalid(format!("Filter not supported on {}", other))),
    }
}

/// `(path, operator key, value)` of a one-key object holding a one-key object
fn predicate_parts(condition: &Value) -> Option<(&str, &str, &Value)> {
    let (property, comparison) = single_entry(condition.as_object()?)?;
    let (operator_key, value) = single_entry(comparison.as_object()?)?;
    Some((property.as_str(), operator_key.as_str(), value))
}

fn single_entry(map: &Map<String, Value>) -> Option<(&String, &Value)> {
    if map.len() == 1 {
        map.iter().next()
    } else {
        None
    }
}

fn is_predicate(condition: &Value) -> bool {
    predicate_parts(condition).map_or(false, |(_, key, _)| Operator::from_client_key(key).is_some())
}

fn is_logical(condition: &Value) -> bool {
    LogicalOperator::ALL.iter().any(|op| condition.get(op.key()).is_some())
}

fn logical_operator(condition: &Value) -> Result<LogicalOperator, FilterValidationError> {
    let only_key = condition.as_object().and_then(single_entry).map(|(key, _)| key.as_str());
    only_key.and_then(LogicalOperator::from_key).ok_or_else(|| {
        FilterValidationError::Invalid(format!(
            "Only one operator per filter object is allowed. See Example {}",
            messages::logical_example()
        ))
    })
}

fn validate_condition_format(condition: &Value) -> Result<(), FilterValidationError> {
    if !condition.is_object() {
        let message = format!("Must be a dict. {}", messages::rows_multiple_filter());
        error!("{}", message);
        return Err(FilterValidationError::Invalid(message));
    }

    if !(is_predicate(condition) || is_logical(condition)) {
        let message = format!(
            "Wrong format in {}. Valid predicate operators {}. Valid logical operators {}. Example: {}",
            condition,
            messages::predicate_operators(),
            messages::logical_operator_keys(),
            messages::logical_example()
        );
        error!("{}", message);
        return Err(FilterValidationError::Invalid(message));
    }
    Ok(())
}
