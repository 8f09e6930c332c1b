use std::collections::HashSet;
use tracing::debug;
use crate::filter::{Condition, LogicalOperator, RowsMultipleFilter};
use crate::frame::{Frame, FrameError, FrameQuery, RowLabel};
use super::rows::RowsFilterProcessor;

/// Evaluates a validated `$and` / `$or` tree over row predicates
///
/// Every leaf is evaluated against the unfiltered input with the single
/// rows filter processor; interior nodes combine their children's results
/// by row label.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowsMultipleFilterProcessor {
    rows_filter_processor: RowsFilterProcessor,
}

impl RowsMultipleFilterProcessor {
    pub fn new(rows_filter_processor: RowsFilterProcessor) -> Self {
        Self { rows_filter_processor }
    }

    /// Fold the tree bottom-up with an explicit work stack.
    ///
    /// `Visit` expands a node; `Solve` combines the topmost `arity` results
    /// once all children of a node have been evaluated. The input tree is
    /// never modified.
    pub fn apply_rows_multiple_filter(
        &self,
        query: &FrameQuery,
        rows_multiple_filter: &RowsMultipleFilter,
    ) -> Result<FrameQuery, FrameError> {
        enum Step<'c> {
            Visit(&'c Condition),
            Solve { operator: LogicalOperator, arity: usize },
        }

        let mut steps = vec![Step::Visit(&rows_multiple_filter.conditions)];
        let mut solved: Vec<FrameQuery> = Vec::new();

        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(Condition::Predicate(rows_filter)) => {
                    solved.push(self.rows_filter_processor.apply_rows_filter(query, rows_filter)?);
                }
                Step::Visit(Condition::Logical { operator, children }) => {
                    steps.push(Step::Solve { operator: *operator, arity: children.len() });
                    steps.extend(children.iter().rev().map(Step::Visit));
                }
                Step::Solve { operator, arity } => {
                    let results = solved.split_off(solved.len().saturating_sub(arity));
                    let combined = match operator {
                        LogicalOperator::And => conjunction(query, &results),
                        LogicalOperator::Or => disjunction(query, &results),
                    };
                    debug!(%operator, children = arity, rows = combined.frame().num_rows(), "solved logical node");
                    solved.push(combined);
                }
            }
        }

        Ok(solved.pop().unwrap_or_else(|| query.derive(query.frame().empty_like())))
    }
}

/// Rows of the first result whose label appears in every result.
///
/// No results, or any empty result, gives an empty table with the input's
/// columns.
fn conjunction(query: &FrameQuery, results: &[FrameQuery]) -> FrameQuery {
    let Some((first, rest)) = results.split_first() else {
        return query.derive(query.frame().empty_like());
    };
    if results.iter().any(|r| r.frame().is_empty()) {
        return query.derive(query.frame().empty_like());
    }

    let others: Vec<HashSet<&RowLabel>> = rest.iter().map(|r| r.frame().index().iter().collect()).collect();
    let positions: Vec<usize> = first
        .frame()
        .index()
        .iter()
        .enumerate()
        .filter(|(_, label)| others.iter().all(|labels| labels.contains(label)))
        .map(|(i, _)| i)
        .collect();
    first.derive(first.frame().take(&positions))
}

/// Concatenation of all results, keeping the first row of each label
fn disjunction(query: &FrameQuery, results: &[FrameQuery]) -> FrameQuery {
    let frames: Vec<Frame> = results.iter().map(|r| r.frame().clone()).collect();
    if frames.is_empty() {
        return query.derive(query.frame().empty_like());
    }
    query.derive(Frame::concat(&frames).dedupe_labels())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use crate::filter::{CanonicalPath, Operator, RowsFilter, ScalarValue};

    fn leaf(path: &str, operator: Operator, value: f64) -> Condition {
        let column = CanonicalPath::parse(path);
        Condition::Predicate(RowsFilter {
            shape: column.shape().unwrap(),
            column,
            operator,
            comp_value: ScalarValue::Number(value),
        })
    }

    fn node(operator: LogicalOperator, children: Vec<Condition>) -> RowsMultipleFilter {
        RowsMultipleFilter {
            conditions: Condition::Logical { operator, children },
        }
    }

    fn query() -> FrameQuery {
        FrameQuery::new(
            Frame::from_records((1..=5).map(|i| json!({"x": i as f64})).collect()).unwrap(),
        )
    }

    fn labels(query: &FrameQuery) -> Vec<RowLabel> {
        query.frame().index().to_vec()
    }

    #[test]
    fn test_and_intersects() {
        let tree = node(
            LogicalOperator::And,
            vec![leaf("x", Operator::Gt, 2.0), leaf("x", Operator::Lt, 4.0)],
        );
        let result = RowsMultipleFilterProcessor::default().apply_rows_multiple_filter(&query(), &tree).unwrap();
        assert_eq!(labels(&result), vec![RowLabel::Position(2)]);
    }

    #[test]
    fn test_or_keeps_first_occurrence_order() {
        let tree = node(
            LogicalOperator::Or,
            vec![leaf("x", Operator::GtEq, 4.0), leaf("x", Operator::LtEq, 4.0)],
        );
        let result = RowsMultipleFilterProcessor::default().apply_rows_multiple_filter(&query(), &tree).unwrap();
        assert_eq!(
            labels(&result),
            vec![3, 4, 0, 1, 2].into_iter().map(RowLabel::Position).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_and_with_empty_child_keeps_columns() {
        let tree = node(
            LogicalOperator::And,
            vec![leaf("x", Operator::Gt, 2.0), leaf("x", Operator::Gt, 10.0)],
        );
        let result = RowsMultipleFilterProcessor::default().apply_rows_multiple_filter(&query(), &tree).unwrap();
        assert!(result.frame().is_empty());
        assert_eq!(result.frame().columns(), &["x"]);
    }

    #[test]
    fn test_deep_nesting() {
        // x > 1 and (x < 3 or (x > 4 and x <= 5))
        let tree = RowsMultipleFilter {
            conditions: Condition::Logical {
                operator: LogicalOperator::And,
                children: vec![
                    leaf("x", Operator::Gt, 1.0),
                    Condition::Logical {
                        operator: LogicalOperator::Or,
                        children: vec![
                            leaf("x", Operator::Lt, 3.0),
                            node(LogicalOperator::And, vec![leaf("x", Operator::Gt, 4.0), leaf("x", Operator::LtEq, 5.0)])
                                .conditions,
                        ],
                    },
                ],
            },
        };
        let result = RowsMultipleFilterProcessor::default().apply_rows_multiple_filter(&query(), &tree).unwrap();
        assert_eq!(labels(&result), vec![RowLabel::Position(1), RowLabel::Position(4)]);
    }

    #[test]
    fn test_predicate_root() {
        let tree = RowsMultipleFilter {
            conditions: leaf("x", Operator::Eq, 3.0),
        };
        let result = RowsMultipleFilterProcessor::default().apply_rows_multiple_filter(&query(), &tree).unwrap();
        assert_eq!(labels(&result), vec![RowLabel::Position(2)]);
    }
}
