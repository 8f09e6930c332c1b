use tracing::{debug, error};
use crate::config::EngineConfig;
use crate::filter::ValidatedFilters;
use crate::frame::{codec, Frame, FrameError, FrameQuery};
use crate::processor::{
    ColumnsAggregationProcessor, ColumnsFilterProcessor, RowsFilterProcessor, RowsMultipleFilterProcessor,
};
use super::error::ProcessError;

/// Decode Parquet bytes, then apply the filters
pub fn apply_filters_from_bytes(
    parquet_bytes: &[u8],
    filters: &ValidatedFilters,
    config: &EngineConfig,
) -> Result<Frame, ProcessError> {
    let frame = codec::from_parquet_bytes(parquet_bytes).map_err(unprocessable)?;
    apply_filters_from_frame(frame, filters, config)
}

/// Apply validated filters to a frame.
///
/// Any data error is reported as [`ProcessError::Unprocessable`]; no partial
/// result is returned.
pub fn apply_filters_from_frame(
    frame: Frame,
    filters: &ValidatedFilters,
    config: &EngineConfig,
) -> Result<Frame, ProcessError> {
    run(frame, filters, config).map_err(unprocessable)
}

fn run(frame: Frame, filters: &ValidatedFilters, config: &EngineConfig) -> Result<Frame, FrameError> {
    let rows_filter_processor = RowsFilterProcessor::new();
    let rows_multiple_filter_processor = RowsMultipleFilterProcessor::new(rows_filter_processor);
    let columns_filter_processor = ColumnsFilterProcessor;
    let columns_aggregation_processor = ColumnsAggregationProcessor;

    let mut query = FrameQuery::new(frame).with_policy(config.unknown_operator);

    // 1. Row selection: the logical tree takes precedence over the single predicate
    if let Some(rows_multiple_filter) = &filters.rows_multiple_filter {
        query = rows_multiple_filter_processor.apply_rows_multiple_filter(&query, rows_multiple_filter)?;
    } else if let Some(rows_filter) = &filters.rows_filter {
        query = rows_filter_processor.apply_rows_filter(&query, rows_filter)?;
    }
    debug!(rows = query.frame().num_rows(), "rows selected");

    // 2. Projection
    if let Some(columns_filter) = &filters.columns_filter {
        if !columns_filter.is_empty() && !query.frame().is_empty() {
            query = columns_filter_processor.apply_columns_filter(&query, Some(columns_filter))?;
        }
    }

    // 3. Aggregation, on top of any projection
    if let Some(columns_aggregation) = &filters.columns_aggregation {
        if !query.frame().is_empty() {
            query = columns_aggregation_processor.apply_columns_aggregation_filter(&query, columns_aggregation)?;
        }
    }

    Ok(query.into_frame())
}

fn unprocessable(err: FrameError) -> ProcessError {
    let err = ProcessError::from(err);
    error!("{}", err);
    err
}
