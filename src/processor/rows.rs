use serde_json::Value;
use tracing::debug;
use crate::filter::{CanonicalPath, Operator, PathShape, RowsFilter};
use crate::frame::{walk_path, Frame, FrameError, FrameQuery, RowPredicate};

/// Applies one validated row predicate, dispatching on its path shape
#[derive(Debug, Clone, Copy, Default)]
pub struct RowsFilterProcessor;

impl RowsFilterProcessor {
    pub fn new() -> Self {
        Self
    }

    pub fn apply_rows_filter(&self, query: &FrameQuery, rows_filter: &RowsFilter) -> Result<FrameQuery, FrameError> {
        let comp_value = rows_filter.comp_value.to_json();
        let column = &rows_filter.column;
        let operator = rows_filter.operator;

        match rows_filter.shape {
            PathShape::NoArray => select_not_array(query, column, operator, &comp_value),
            PathShape::ArrayAtColumn => select_in_array_column(query, column, operator, &comp_value),
            PathShape::ArrayAsProperty { .. } => select_in_array_property(query, column, operator, &comp_value),
            PathShape::NestedArray { .. } => select_in_nested_array(query, column, operator, &comp_value),
        }
    }
}

/// `Col` or `Col.a.b`: compare the cell, or the value below it
fn select_not_array(
    query: &FrameQuery,
    column: &CanonicalPath,
    operator: Operator,
    comp_value: &Value,
) -> Result<FrameQuery, FrameError> {
    let names = column.names();
    let sub_path = (names.len() > 1).then(|| &names[1..]);
    query.select_with(column.column(), operator, comp_value, sub_path)
}

/// `Col[].a`: keep rows with a matching element, trimming the array to
/// the matching elements
fn select_in_array_column(
    query: &FrameQuery,
    column: &CanonicalPath,
    operator: Operator,
    comp_value: &Value,
) -> Result<FrameQuery, FrameError> {
    let (_, props_path) = column.split_at_first_array();
    let predicate = RowPredicate {
        operator,
        comp_value,
        sub_path: &props_path,
    };
    let frame = filter_array_elements(query.frame(), column.column(), |element| predicate.matches(element))?;
    Ok(query.derive(frame))
}

/// `Col.a[].b`: keep rows whose inner array has a matching item; the row
/// itself is not trimmed
fn select_in_array_property(
    query: &FrameQuery,
    column: &CanonicalPath,
    operator: Operator,
    comp_value: &Value,
) -> Result<FrameQuery, FrameError> {
    let (array_path, props_path) = column.split_at_first_array();
    let predicate = RowPredicate {
        operator,
        comp_value,
        sub_path: &props_path,
    };
    let frame = query
        .frame()
        .filter_by(column.column(), |cell| any_item_matches(cell, &array_path[1..], &predicate))?;
    Ok(query.derive(frame))
}

/// `Col[].a[].b`: keep elements of `Col` whose inner array has a matching
/// item, then regroup like [`select_in_array_column`]
fn select_in_nested_array(
    query: &FrameQuery,
    column: &CanonicalPath,
    operator: Operator,
    comp_value: &Value,
) -> Result<FrameQuery, FrameError> {
    let inner = column.without_first_marker();
    let (array_path, props_path) = inner.split_at_first_array();
    let predicate = RowPredicate {
        operator,
        comp_value,
        sub_path: &props_path,
    };
    let frame = filter_array_elements(query.frame(), column.column(), |element| {
        any_item_matches(element, &array_path[1..], &predicate)
    })?;
    Ok(query.derive(frame))
}

/// True when the array at `array_path` below `value` has an item whose
/// leaf is present and satisfies `predicate`
fn any_item_matches(value: &Value, array_path: &[&str], predicate: &RowPredicate<'_>) -> bool {
    match walk_path(value, array_path) {
        Value::Array(items) => items.iter().any(|item| {
            let leaf = walk_path(item, predicate.sub_path);
            !leaf.is_null() && predicate.operator.apply(leaf, predicate.comp_value)
        }),
        _ => false,
    }
}

/// Explode `column` into `(row, element)` pairs, keep the elements that pass
/// `keep`, and group the survivors back into one row per original row.
///
/// Rows without survivors are dropped; other cells and the row label are
/// taken from the original row. Null cells and empty arrays have no
/// elements; any other non-array cell is its own single element.
fn filter_array_elements<F>(frame: &Frame, column: &str, keep: F) -> Result<Frame, FrameError>
where
    F: Fn(&Value) -> bool,
{
    let position = frame.column_position(column)?;

    // 1. Explode into (row, element) pairs
    let pairs = frame.rows().iter().enumerate().flat_map(|(row, cells)| {
        let elements: &[Value] = match &cells[position] {
            Value::Array(items) => items,
            Value::Null => &[],
            other => std::slice::from_ref(other),
        };
        elements.iter().map(move |element| (row, element))
    });

    // 2. Filter, 3. group back by original row
    let mut grouped: Vec<(usize, Vec<Value>)> = Vec::new();
    let mut exploded = 0usize;
    for (row, element) in pairs {
        exploded += 1;
        if !keep(element) {
            continue;
        }
        match grouped.last_mut() {
            Some((last, items)) if *last == row => items.push(element.clone()),
            _ => grouped.push((row, vec![element.clone()])),
        }
    }
    debug!(column, exploded, rows = grouped.len(), "grouped array elements back");

    let mut index = Vec::with_capacity(grouped.len());
    let mut rows = Vec::with_capacity(grouped.len());
    for (row, items) in grouped {
        let mut cells = frame.rows()[row].clone();
        cells[position] = Value::Array(items);
        index.push(frame.index()[row].clone());
        rows.push(cells);
    }
    Frame::from_parts(frame.columns().to_vec(), index, rows)
}
