//! Column aggregation over JSON cells

use std::cmp::Ordering;
use serde_json::Value;
use crate::filter::{compare_values, AggregateFunction};
use super::error::FrameError;

/// Labelled result rows of one aggregation
pub(crate) type Aggregated = Vec<(String, Value)>;

/// Aggregate the non-null `values` of `column` with `function`
pub(crate) fn aggregate_values(
    column: &str,
    values: &[&Value],
    function: AggregateFunction,
) -> Result<Aggregated, FrameError> {
    let present: Vec<&Value> = values.iter().copied().filter(|v| !v.is_null()).collect();
    let single = |value: Value| Ok(vec![(function.name().to_string(), value)]);
    let non_numeric = || FrameError::NonNumeric { column: column.to_string(), function };

    match function {
        AggregateFunction::Count => single(Value::from(present.len())),
        AggregateFunction::Sum => single(sum(column, &present)?),
        AggregateFunction::Mean => {
            let numbers = numeric(&present).ok_or_else(non_numeric)?;
            single(mean(&numbers).map_or(Value::Null, Value::from))
        }
        AggregateFunction::Min => single(extreme(column, &present, function, Ordering::Less)?),
        AggregateFunction::Max => single(extreme(column, &present, function, Ordering::Greater)?),
        AggregateFunction::Describe => Ok(describe(&present)),
    }
}

/// Numbers (booleans count as 0/1); `None` if any value is something else
fn numeric(values: &[&Value]) -> Option<Vec<f64>> {
    values
        .iter()
        .map(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        })
        .collect()
}

fn sum(column: &str, values: &[&Value]) -> Result<Value, FrameError> {
    let function = AggregateFunction::Sum;

    if !values.is_empty() && values.iter().all(|v| v.is_string()) {
        let joined: String = values.iter().filter_map(|v| v.as_str()).collect();
        return Ok(Value::String(joined));
    }

    let integers: Option<Vec<i64>> = values
        .iter()
        .map(|v| match v {
            Value::Number(n) => n.as_i64(),
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        })
        .collect();
    if let Some(total) = integers.and_then(|ints| ints.into_iter().try_fold(0i64, i64::checked_add)) {
        return Ok(Value::from(total));
    }

    match numeric(values) {
        Some(numbers) => Ok(Value::from(numbers.iter().sum::<f64>())),
        None if values.iter().any(|v| v.is_string()) => Err(FrameError::MixedTypes {
            column: column.to_string(),
            function,
        }),
        None => Err(FrameError::NonNumeric {
            column: column.to_string(),
            function,
        }),
    }
}

fn mean(numbers: &[f64]) -> Option<f64> {
    (!numbers.is_empty()).then(|| numbers.iter().sum::<f64>() / numbers.len() as f64)
}

/// Smallest (`Less`) or largest (`Greater`) value; values must be mutually comparable
fn extreme(
    column: &str,
    values: &[&Value],
    function: AggregateFunction,
    wanted: Ordering,
) -> Result<Value, FrameError> {
    if values.iter().any(|v| v.is_object() || v.is_array()) {
        return Err(FrameError::NonNumeric { column: column.to_string(), function });
    }

    let mut best: Option<&Value> = None;
    for value in values.iter().copied() {
        best = match best {
            None => Some(value),
            Some(current) => match compare_values(value, current) {
                Some(ordering) if ordering == wanted => Some(value),
                Some(_) => Some(current),
                None => {
                    return Err(FrameError::MixedTypes { column: column.to_string(), function })
                }
            },
        };
    }
    Ok(best.cloned().unwrap_or(Value::Null))
}

/// Summary statistics: numeric or categorical depending on the input
fn describe(values: &[&Value]) -> Aggregated {
    let row = |label: &str, value: Value| (label.to_string(), value);

    match numeric(values).filter(|n| !n.is_empty()) {
        Some(mut numbers) => {
            numbers.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
            let count = numbers.len();
            let mean = mean(&numbers);
            let std = mean.filter(|_| count > 1).map(|m| {
                let squares: f64 = numbers.iter().map(|n| (n - m).powi(2)).sum();
                (squares / (count - 1) as f64).sqrt()
            });
            vec![
                row("count", Value::from(count)),
                row("mean", mean.map_or(Value::Null, Value::from)),
                row("std", std.map_or(Value::Null, Value::from)),
                row("min", Value::from(numbers[0])),
                row("25%", Value::from(percentile(&numbers, 0.25))),
                row("50%", Value::from(percentile(&numbers, 0.5))),
                row("75%", Value::from(percentile(&numbers, 0.75))),
                row("max", Value::from(numbers[count - 1])),
            ]
        }
        None => {
            // first-seen order breaks frequency ties
            let mut counts: Vec<(&Value, usize)> = Vec::new();
            for value in values.iter().copied() {
                match counts.iter_mut().find(|(seen, _)| *seen == value) {
                    Some((_, n)) => *n += 1,
                    None => counts.push((value, 1)),
                }
            }
            let top = counts
                .iter()
                .fold(None, |best: Option<&(&Value, usize)>, entry| match best {
                    Some(b) if b.1 >= entry.1 => Some(b),
                    _ => Some(entry),
                });
            vec![
                row("count", Value::from(values.len())),
                row("unique", Value::from(counts.len())),
                row("top", top.map_or(Value::Null, |(v, _)| (*v).clone())),
                row("freq", top.map_or(Value::Null, |(_, n)| Value::from(*n))),
            ]
        }
    }
}

/// Linear interpolation between closest ranks of sorted, non-empty input
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (position - lower as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(values: Vec<Value>, function: AggregateFunction) -> Result<Aggregated, FrameError> {
        let refs: Vec<&Value> = values.iter().collect();
        aggregate_values("col", &refs, function)
    }

    #[test]
    fn test_count_skips_nulls() {
        let out = run(vec![json!(1), Value::Null, json!("a")], AggregateFunction::Count).unwrap();
        assert_eq!(out, vec![("count".to_string(), json!(2))]);
    }

    #[test]
    fn test_sum() {
        assert_eq!(run(vec![json!(1), json!(2)], AggregateFunction::Sum).unwrap()[0].1, json!(3));
        assert_eq!(run(vec![json!(1), json!(2.5)], AggregateFunction::Sum).unwrap()[0].1, json!(3.5));
        assert_eq!(run(vec![json!("a"), json!("b")], AggregateFunction::Sum).unwrap()[0].1, json!("ab"));
        assert!(matches!(
            run(vec![json!("a"), json!(1)], AggregateFunction::Sum),
            Err(FrameError::MixedTypes { .. })
        ));
    }

    #[test]
    fn test_mean_and_extremes() {
        let values = vec![json!(4), json!(1.5), Value::Null, json!(2)];
        assert_eq!(run(values.clone(), AggregateFunction::Mean).unwrap()[0].1, json!(2.5));
        assert_eq!(run(values.clone(), AggregateFunction::Min).unwrap()[0].1, json!(1.5));
        assert_eq!(run(values, AggregateFunction::Max).unwrap()[0].1, json!(4));

        assert_eq!(run(vec![json!("b"), json!("a")], AggregateFunction::Min).unwrap()[0].1, json!("a"));
        assert!(matches!(
            run(vec![json!("b"), json!(1)], AggregateFunction::Max),
            Err(FrameError::MixedTypes { .. })
        ));
        assert!(matches!(
            run(vec![json!("b")], AggregateFunction::Mean),
            Err(FrameError::NonNumeric { .. })
        ));
        assert_eq!(run(vec![], AggregateFunction::Mean).unwrap()[0].1, Value::Null);
    }

    #[test]
    fn test_describe_numeric() {
        let out = run(vec![json!(1), json!(2), json!(3), json!(4)], AggregateFunction::Describe).unwrap();
        let labels: Vec<&str> = out.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["count", "mean", "std", "min", "25%", "50%", "75%", "max"]);
        assert_eq!(out[1].1, json!(2.5));
        assert_eq!(out[4].1, json!(1.75));
        assert_eq!(out[6].1, json!(3.25));
        let std = out[2].1.as_f64().unwrap();
        assert!((std - 1.2909944487358056).abs() < 1e-12);
    }

    #[test]
    fn test_describe_categorical() {
        let out = run(vec![json!("x"), json!("y"), json!("y"), Value::Null], AggregateFunction::Describe).unwrap();
        assert_eq!(
            out,
            vec![
                ("count".to_string(), json!(3)),
                ("unique".to_string(), json!(2)),
                ("top".to_string(), json!("y")),
                ("freq".to_string(), json!(2)),
            ]
        );
    }
}
