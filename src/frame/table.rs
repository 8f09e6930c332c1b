use std::collections::{HashMap, HashSet};
use std::fmt;
use serde_json::{Map, Value};
use super::error::FrameError;

/// Identity of a row
///
/// Loaded rows are labelled by position; aggregation results by function
/// name. Labels are kept through selection and duplicated by explode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowLabel {
    Position(usize),
    Name(String),
}

impl RowLabel {
    pub fn to_json(&self) -> Value {
        match self {
            RowLabel::Position(p) => Value::from(*p),
            RowLabel::Name(n) => Value::String(n.clone()),
        }
    }
}

impl fmt::Display for RowLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowLabel::Position(p) => write!(f, "{}", p),
            RowLabel::Name(n) => f.write_str(n),
        }
    }
}

/// A table of JSON cells
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    columns: Vec<String>,
    index: Vec<RowLabel>,
    rows: Vec<Vec<Value>>,
}

impl Frame {
    /// Build a frame labelled `0..n`
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, FrameError> {
        let index = (0..rows.len()).map(RowLabel::Position).collect();
        Self::from_parts(columns, index, rows)
    }

    pub fn from_parts(columns: Vec<String>, index: Vec<RowLabel>, rows: Vec<Vec<Value>>) -> Result<Self, FrameError> {
        if index.len() != rows.len() {
            return Err(FrameError::IndexLength { expected: rows.len(), found: index.len() });
        }
        if let Some(row) = rows.iter().find(|row| row.len() != columns.len()) {
            return Err(FrameError::RowWidth { expected: columns.len(), found: row.len() });
        }
        Ok(Self { columns, index, rows })
    }

    /// Build from JSON objects; columns appear in first-seen key order and
    /// missing keys become null
    pub fn from_records(records: Vec<Value>) -> Result<Self, FrameError> {
        let mut objects = Vec::with_capacity(records.len());
        for record in records {
            match record {
                Value::Object(map) => objects.push(map),
                other => return Err(FrameError::InvalidRecord(other.to_string())),
            }
        }

        let mut columns: Vec<String> = Vec::new();
        let mut seen = HashSet::new();
        for key in objects.iter().flat_map(|map| map.keys()) {
            if seen.insert(key.as_str()) {
                columns.push(key.clone());
            }
        }

        let rows = objects
            .iter()
            .map(|map| columns.iter().map(|c| map.get(c).cloned().unwrap_or(Value::Null)).collect())
            .collect();
        Self::new(columns, rows)
    }

    /// Build from `(name, values)` pairs of equal length
    pub fn from_columns(columns: Vec<(String, Vec<Value>)>) -> Result<Self, FrameError> {
        let height = columns.first().map_or(0, |(_, values)| values.len());
        if let Some((_, values)) = columns.iter().find(|(_, values)| values.len() != height) {
            return Err(FrameError::RowWidth { expected: height, found: values.len() });
        }

        let mut rows = vec![Vec::with_capacity(columns.len()); height];
        let mut names = Vec::with_capacity(columns.len());
        for (name, values) in columns {
            names.push(name);
            for (row, value) in rows.iter_mut().zip(values) {
                row.push(value);
            }
        }
        Self::new(names, rows)
    }

    /// Replace the row labels
    pub fn with_index(self, index: Vec<RowLabel>) -> Result<Self, FrameError> {
        Self::from_parts(self.columns, index, self.rows)
    }

    /// Relabel rows `0..n`
    pub fn reset_index(self) -> Frame {
        let index = (0..self.rows.len()).map(RowLabel::Position).collect();
        Frame { index, ..self }
    }

    /// Same columns, no rows
    pub fn empty_like(&self) -> Frame {
        Frame {
            columns: self.columns.clone(),
            index: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn index(&self) -> &[RowLabel] {
        &self.index
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// No rows, whatever the columns
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Labelled rows in order
    pub fn iter_rows(&self) -> impl Iterator<Item = (&RowLabel, &[Value])> {
        self.index.iter().zip(self.rows.iter().map(Vec::as_slice))
    }

    pub fn column_position(&self, column: &str) -> Result<usize, FrameError> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| FrameError::MissingColumn {
                column: column.to_string(),
                available: self.columns.clone(),
            })
    }

    /// Cells of one column, top to bottom
    pub fn column_values(&self, column: &str) -> Result<Vec<&Value>, FrameError> {
        let position = self.column_position(column)?;
        Ok(self.rows.iter().map(|row| &row[position]).collect())
    }

    /// Keep only `columns`, in the given order
    pub fn project(&self, columns: &[String]) -> Result<Frame, FrameError> {
        let positions = columns
            .iter()
            .map(|c| self.column_position(c))
            .collect::<Result<Vec<_>, _>>()?;
        let rows = self
            .rows
            .iter()
            .map(|row| positions.iter().map(|&p| row[p].clone()).collect())
            .collect();
        Ok(Frame {
            columns: columns.to_vec(),
            index: self.index.clone(),
            rows,
        })
    }

    /// Rows at the given positions, in the given order; out-of-range positions are skipped
    pub fn take(&self, positions: &[usize]) -> Frame {
        let mut index = Vec::with_capacity(positions.len());
        let mut rows = Vec::with_capacity(positions.len());
        for &p in positions {
            if let (Some(label), Some(row)) = (self.index.get(p), self.rows.get(p)) {
                index.push(label.clone());
                rows.push(row.clone());
            }
        }
        Frame {
            columns: self.columns.clone(),
            index,
            rows,
        }
    }

    /// Rows whose cell in `column` satisfies `keep`
    pub fn filter_by<F>(&self, column: &str, keep: F) -> Result<Frame, FrameError>
    where
        F: Fn(&Value) -> bool,
    {
        let position = self.column_position(column)?;
        let positions: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| keep(&row[position]))
            .map(|(i, _)| i)
            .collect();
        Ok(self.take(&positions))
    }

    /// One row per element of the array in `column`.
    ///
    /// Other cells and the row label are repeated. An empty array yields a
    /// single row holding null; a non-array cell is kept as is.
    pub fn explode(&self, column: &str) -> Result<Frame, FrameError> {
        let position = self.column_position(column)?;
        let mut index = Vec::new();
        let mut rows = Vec::new();

        for (label, row) in self.index.iter().zip(&self.rows) {
            match &row[position] {
                Value::Array(items) if !items.is_empty() => {
                    for item in items {
                        let mut exploded = row.clone();
                        exploded[position] = item.clone();
                        index.push(label.clone());
                        rows.push(exploded);
                    }
                }
                Value::Array(_) => {
                    let mut exploded = row.clone();
                    exploded[position] = Value::Null;
                    index.push(label.clone());
                    rows.push(exploded);
                }
                _ => {
                    index.push(label.clone());
                    rows.push(row.clone());
                }
            }
        }

        Ok(Frame {
            columns: self.columns.clone(),
            index,
            rows,
        })
    }

    /// Flatten the objects in `column` into `"<column>.<key>"` columns.
    ///
    /// Nested objects are flattened recursively (`"<column>.a.b"`); arrays
    /// are left as values. Only the flattened columns are returned, under
    /// the original row labels. Non-object cells contribute nulls.
    pub fn normalize_column(&self, column: &str) -> Result<Frame, FrameError> {
        let position = self.column_position(column)?;

        let flattened: Vec<Vec<(String, Value)>> = self
            .rows
            .iter()
            .map(|row| {
                let mut fields = Vec::new();
                if let Value::Object(map) = &row[position] {
                    flatten_into(column, map, &mut fields);
                }
                fields
            })
            .collect();

        let mut columns: Vec<String> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for (name, _) in flattened.iter().flatten() {
            if !positions.contains_key(name) {
                positions.insert(name.clone(), columns.len());
                columns.push(name.clone());
            }
        }

        let rows = flattened
            .into_iter()
            .map(|fields| {
                let mut row = vec![Value::Null; columns.len()];
                for (name, value) in fields {
                    if let Some(&p) = positions.get(&name) {
                        row[p] = value;
                    }
                }
                row
            })
            .collect();

        Ok(Frame {
            columns,
            index: self.index.clone(),
            rows,
        })
    }

    /// Stack frames vertically over the union of their columns
    pub fn concat(frames: &[Frame]) -> Frame {
        let mut columns: Vec<String> = Vec::new();
        for frame in frames {
            for column in &frame.columns {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
        }

        let mut index = Vec::new();
        let mut rows = Vec::new();
        for frame in frames {
            let positions: Vec<Option<usize>> = columns
                .iter()
                .map(|c| frame.columns.iter().position(|own| own == c))
                .collect();
            for (label, row) in frame.index.iter().zip(&frame.rows) {
                index.push(label.clone());
                rows.push(
                    positions
                        .iter()
                        .map(|p| p.map_or(Value::Null, |p| row[p].clone()))
                        .collect(),
                );
            }
        }

        Frame { columns, index, rows }
    }

    /// Keep the first row of each label
    pub fn dedupe_labels(&self) -> Frame {
        let mut seen = HashSet::new();
        let positions: Vec<usize> = self
            .index
            .iter()
            .enumerate()
            .filter(|(_, label)| seen.insert(*label))
            .map(|(i, _)| i)
            .collect();
        self.take(&positions)
    }
}

fn flatten_into(prefix: &str, map: &Map<String, Value>, out: &mut Vec<(String, Value)>) {
    for (key, value) in map {
        let name = format!("{}.{}", prefix, key);
        match value {
            Value::Object(inner) if !inner.is_empty() => flatten_into(&name, inner, out),
            other => out.push((name, other.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn frame() -> Frame {
        Frame::from_records(vec![
            json!({"id": 1, "tags": [{"v": 1}, {"v": 2}], "obj": {"a": 1, "b": {"c": "x"}}}),
            json!({"id": 2, "tags": [], "obj": {"a": 2}}),
            json!({"id": 3, "tags": [{"v": 3}], "obj": null}),
        ])
        .unwrap()
    }

    #[test]
    fn test_from_records_fills_missing() {
        let frame = Frame::from_records(vec![json!({"a": 1}), json!({"b": 2})]).unwrap();
        assert_eq!(frame.columns(), &["a", "b"]);
        assert_eq!(frame.rows(), &[vec![json!(1), Value::Null], vec![Value::Null, json!(2)]]);
        assert!(Frame::from_records(vec![json!([1])]).is_err());
    }

    #[test]
    fn test_explode_repeats_labels() {
        let exploded = frame().explode("tags").unwrap();
        assert_eq!(
            exploded.index(),
            &[RowLabel::Position(0), RowLabel::Position(0), RowLabel::Position(1), RowLabel::Position(2)]
        );
        assert_eq!(
            exploded.column_values("tags").unwrap(),
            vec![&json!({"v": 1}), &json!({"v": 2}), &Value::Null, &json!({"v": 3})]
        );
    }

    #[test]
    fn test_normalize_column() {
        let normalized = frame().normalize_column("obj").unwrap();
        assert_eq!(normalized.columns(), &["obj.a", "obj.b.c"]);
        assert_eq!(normalized.rows()[0], vec![json!(1), json!("x")]);
        assert_eq!(normalized.rows()[1], vec![json!(2), Value::Null]);
        assert_eq!(normalized.rows()[2], vec![Value::Null, Value::Null]);
    }

    #[test]
    fn test_normalize_wide_column() {
        const WIDTH: usize = 2000;
        let wide: Map<String, Value> = (0..WIDTH).map(|k| (format!("k{}", k), json!(k))).collect();
        let reversed: Map<String, Value> = (0..WIDTH).rev().map(|k| (format!("k{}", k), json!(k * 2))).collect();
        let frame = Frame::from_records(vec![json!({"obj": wide}), json!({"obj": reversed})]).unwrap();

        let normalized = frame.normalize_column("obj").unwrap();

        assert_eq!(normalized.columns().len(), WIDTH);
        assert_eq!(normalized.columns()[WIDTH - 1], format!("obj.k{}", WIDTH - 1));
        assert_eq!(normalized.rows()[1][0], json!(0));
        assert_eq!(normalized.rows()[1][WIDTH - 1], json!((WIDTH - 1) * 2));
    }

    #[test]
    fn test_project_and_missing_column() {
        let frame = frame();
        let projected = frame.project(&["obj".to_string(), "id".to_string()]).unwrap();
        assert_eq!(projected.columns(), &["obj", "id"]);
        assert_eq!(projected.index(), frame.index());

        let err = frame.project(&["nope".to_string()]).unwrap_err();
        assert_eq!(err.to_string(), "Column 'nope' not found. Available columns: ['id', 'tags', 'obj']");
    }

    #[test]
    fn test_concat_and_dedupe() {
        let frame = frame();
        let first = frame.take(&[2, 0]);
        let second = frame.take(&[0, 1]).project(&["id".to_string()]).unwrap();

        let combined = Frame::concat(&[first, second]);
        assert_eq!(combined.num_rows(), 4);
        assert_eq!(combined.rows()[3], vec![json!(2), Value::Null, Value::Null]);

        let unique = combined.dedupe_labels();
        assert_eq!(unique.index(), &[RowLabel::Position(2), RowLabel::Position(0), RowLabel::Position(1)]);
    }

    #[test]
    fn test_from_columns() {
        let frame = Frame::from_columns(vec![
            ("a".to_string(), vec![json!(1), json!(2)]),
            ("b".to_string(), vec![json!("x"), json!("y")]),
        ])
        .unwrap();
        assert_eq!(frame.rows()[1], vec![json!(2), json!("y")]);

        let ragged = Frame::from_columns(vec![
            ("a".to_string(), vec![json!(1)]),
            ("b".to_string(), vec![]),
        ]);
        assert!(ragged.is_err());
    }
}
