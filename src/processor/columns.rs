use tracing::debug;
use crate::filter::{CanonicalPath, ColumnsAggregation, ColumnsFilter};
use crate::frame::{FrameError, FrameQuery};

/// Projects whole top-level columns
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnsFilterProcessor;

impl ColumnsFilterProcessor {
    /// `None` or an empty filter keeps every column
    pub fn apply_columns_filter(
        &self,
        query: &FrameQuery,
        columns_filter: Option<&ColumnsFilter>,
    ) -> Result<FrameQuery, FrameError> {
        query.project(columns_filter.map(|f| f.columns.as_slice()))
    }
}

/// Flattens nested columns down to a leaf, then aggregates it
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnsAggregationProcessor;

impl ColumnsAggregationProcessor {
    pub fn apply_columns_aggregation_filter(
        &self,
        query: &FrameQuery,
        columns_aggregation: &ColumnsAggregation,
    ) -> Result<FrameQuery, FrameError> {
        let expanded = expand_for_aggregation(query, &columns_aggregation.column)?;
        expanded.aggregate(&columns_aggregation.column.flat_name(), columns_aggregation.function, None)
    }
}

/// Walk the path prefix by prefix: an array prefix is exploded and then
/// flattened, the first prefix is flattened when it is a plain object.
/// The result holds a flat `"a.b.c"` column for the leaf.
fn expand_for_aggregation(query: &FrameQuery, column: &CanonicalPath) -> Result<FrameQuery, FrameError> {
    if !column.has_sub_properties() {
        return Ok(query.clone());
    }

    let names = column.names();
    let mut current = query.clone();
    for (i, segment) in column.segments().iter().enumerate() {
        let prefix = names[..=i].join(".");
        if segment.is_array {
            let exploded = current.frame().explode(&prefix)?;
            current = current.derive(exploded.normalize_column(&prefix)?);
        } else if i == 0 {
            current = current.derive(current.frame().normalize_column(&prefix)?);
        }
    }

    debug!(
        column = %column,
        rows = current.frame().num_rows(),
        columns = current.frame().columns().len(),
        "expanded column for aggregation"
    );
    Ok(current)
}
