use serde_json::Value;
use tracing::warn;
use crate::config::UnknownOperatorPolicy;
use crate::filter::{AggregateFunction, Operator};
use super::aggregate::aggregate_values;
use super::error::FrameError;
use super::table::{Frame, RowLabel};

static NULL: Value = Value::Null;

/// Follow `path` through nested objects; any missing step yields null
pub fn walk_path<'v>(value: &'v Value, path: &[&str]) -> &'v Value {
    path.iter().try_fold(value, |current, key| current.get(*key)).unwrap_or(&NULL)
}

/// A comparison applied to one cell, optionally below a sub-path
#[derive(Debug, Clone, Copy)]
pub struct RowPredicate<'p> {
    pub operator: Operator,
    pub comp_value: &'p Value,
    pub sub_path: &'p [&'p str],
}

impl RowPredicate<'_> {
    pub fn matches(&self, cell: &Value) -> bool {
        self.operator.apply(walk_path(cell, self.sub_path), self.comp_value)
    }
}

/// Immutable query wrapper over a [`Frame`]
///
/// Every operation returns a new wrapper; row labels are never renumbered.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameQuery {
    frame: Frame,
    policy: UnknownOperatorPolicy,
}

impl FrameQuery {
    pub fn new(frame: Frame) -> Self {
        Self {
            frame,
            policy: UnknownOperatorPolicy::default(),
        }
    }

    pub fn with_policy(self, policy: UnknownOperatorPolicy) -> Self {
        Self { policy, ..self }
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn into_frame(self) -> Frame {
        self.frame
    }

    pub fn policy(&self) -> UnknownOperatorPolicy {
        self.policy
    }

    /// Wrap a frame derived from this one, keeping the policy
    pub fn derive(&self, frame: Frame) -> FrameQuery {
        FrameQuery { frame, policy: self.policy }
    }

    /// Restrict to `columns`; `None` or empty keeps every column
    pub fn project(&self, columns: Option<&[String]>) -> Result<FrameQuery, FrameError> {
        match columns {
            Some(columns) if !columns.is_empty() => Ok(self.derive(self.frame.project(columns)?)),
            _ => Ok(self.clone()),
        }
    }

    /// Keep the rows whose `column` (or the value at `sub_path` inside it)
    /// satisfies `<operator> comp_value`.
    ///
    /// `operator` is an internal symbol (`<`, `<=`, `>`, `>=`, `=`, `!=`). An
    /// unknown symbol is handled by the configured [`UnknownOperatorPolicy`].
    pub fn select(
        &self,
        column: &str,
        operator: &str,
        comp_value: &Value,
        sub_path: Option<&[&str]>,
    ) -> Result<FrameQuery, FrameError> {
        match Operator::from_symbol(operator) {
            Some(operator) => self.select_with(column, operator, comp_value, sub_path),
            None => match self.policy {
                UnknownOperatorPolicy::Ignore => {
                    warn!(operator, column, "unknown operator, selection skipped");
                    Ok(self.clone())
                }
                UnknownOperatorPolicy::Reject => Err(FrameError::UnknownOperator(operator.to_string())),
            },
        }
    }

    pub fn select_with(
        &self,
        column: &str,
        operator: Operator,
        comp_value: &Value,
        sub_path: Option<&[&str]>,
    ) -> Result<FrameQuery, FrameError> {
        let predicate = RowPredicate {
            operator,
            comp_value,
            sub_path: sub_path.unwrap_or_default(),
        };
        let selected = self.frame.filter_by(column, |cell| predicate.matches(cell))?;
        Ok(self.derive(selected))
    }

    /// Aggregate `column` (or the value at `sub_path` inside it).
    ///
    /// The result has one column named `column` and one row per statistic,
    /// labelled by the statistic's name.
    pub fn aggregate(
        &self,
        column: &str,
        function: AggregateFunction,
        sub_path: Option<&[&str]>,
    ) -> Result<FrameQuery, FrameError> {
        let sub_path = sub_path.unwrap_or_default();
        let cells = self.frame.column_values(column)?;
        let values: Vec<&Value> = cells.into_iter().map(|cell| walk_path(cell, sub_path)).collect();

        let (labels, rows): (Vec<RowLabel>, Vec<Vec<Value>>) = aggregate_values(column, &values, function)?
            .into_iter()
            .map(|(label, value)| (RowLabel::Name(label), vec![value]))
            .unzip();
        let frame = Frame::from_parts(vec![column.to_string()], labels, rows)?;
        Ok(self.derive(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query() -> FrameQuery {
        FrameQuery::new(
            Frame::from_records(vec![
                json!({"n": 25, "obj": {"a": {"b": 1}}}),
                json!({"n": 30, "obj": {"a": {"b": 5}}}),
                json!({"n": 35, "obj": {"a": null}}),
                json!({"n": 40, "obj": {}}),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn test_select_keeps_labels() {
        let selected = query().select("n", ">", &json!(28), None).unwrap();
        assert_eq!(
            selected.frame().index(),
            &[RowLabel::Position(1), RowLabel::Position(2), RowLabel::Position(3)]
        );
    }

    #[test]
    fn test_select_sub_path_missing_is_null() {
        let selected = query().select("obj", "<", &json!(3), Some(&["a", "b"][..])).unwrap();
        assert_eq!(selected.frame().index(), &[RowLabel::Position(0)]);

        let unequal = query().select("obj", "!=", &json!(1), Some(&["a", "b"][..])).unwrap();
        assert_eq!(unequal.frame().num_rows(), 3);
    }

    #[test]
    fn test_unknown_operator_policy() {
        let ignored = query().select("n", "~", &json!(1), None).unwrap();
        assert_eq!(ignored, query());

        let strict = query().with_policy(UnknownOperatorPolicy::Reject);
        let err = strict.select("n", "~", &json!(1), None).unwrap_err();
        assert_eq!(err.kind(), "UnknownOperator");
    }

    #[test]
    fn test_project_is_idempotent() {
        let columns = vec!["n".to_string()];
        let once = query().project(Some(&columns)).unwrap();
        let twice = once.project(Some(&columns)).unwrap();
        assert_eq!(once, twice);
        assert_eq!(query().project(None).unwrap(), query());
    }

    #[test]
    fn test_aggregate_shape() {
        let result = query().aggregate("obj", AggregateFunction::Sum, Some(&["a", "b"][..])).unwrap();
        assert_eq!(result.frame().columns(), &["obj"]);
        assert_eq!(result.frame().index(), &[RowLabel::Name("sum".to_string())]);
        assert_eq!(result.frame().rows(), &[vec![json!(6)]]);
    }
}
