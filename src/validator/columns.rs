use serde_json::Value;
use crate::filter::{AggregateFunction, ColumnsAggregation, ColumnsFilter};
use crate::resolver::PropertyResolver;
use super::error::FilterValidationError;
use super::messages;

/// Validates projections: a list of whole top-level columns
#[derive(Debug, Clone, Copy)]
pub struct ColumnsFilterValidator<'a> {
    resolver: PropertyResolver<'a>,
}

impl<'a> ColumnsFilterValidator<'a> {
    pub fn new(resolver: PropertyResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Validate `["Col1", "Col2[]", ...]`.
    ///
    /// Duplicates are dropped, keeping the first occurrence.
    pub fn validate(&self, columns_filter: &Value) -> Result<ColumnsFilter, FilterValidationError> {
        let bad_format =
            || FilterValidationError::Invalid(format!("{}. Must be an array of column names", messages::columns_filter()));
        let raw_columns = columns_filter.as_array().ok_or_else(bad_format)?;

        let mut columns: Vec<String> = Vec::with_capacity(raw_columns.len());
        for raw in raw_columns {
            let raw = raw.as_str().ok_or_else(bad_format)?;
            let info = self.resolver.resolve(raw)?;
            if info.path.has_sub_properties() {
                return Err(FilterValidationError::Invalid(format!(
                    "Subproperties are not supported for columns_filter: {}",
                    info.path
                )));
            }
            let column = info.path.column().to_string();
            if !columns.contains(&column) {
                columns.push(column);
            }
        }

        Ok(ColumnsFilter { columns })
    }
}

/// Validates `[path, function]` aggregation requests
#[derive(Debug, Clone, Copy)]
pub struct ColumnsAggregationValidator<'a> {
    resolver: PropertyResolver<'a>,
}

impl<'a> ColumnsAggregationValidator<'a> {
    const N_ELEMENTS: usize = 2;

    pub fn new(resolver: PropertyResolver<'a>) -> Self {
        Self { resolver }
    }

    pub fn validate(&self, columns_aggregation: &Value) -> Result<ColumnsAggregation, FilterValidationError> {
        let bad_format = || {
            FilterValidationError::Invalid(format!(
                "{}. Must be an array with {} elements",
                messages::columns_aggregation(),
                Self::N_ELEMENTS
            ))
        };
        let parts = columns_aggregation
            .as_array()
            .filter(|parts| parts.len() == Self::N_ELEMENTS)
            .ok_or_else(bad_format)?;
        let path = parts[0].as_str().ok_or_else(bad_format)?;

        let info = self.resolver.resolve(path)?;
        let function = parts[1]
            .as_str()
            .and_then(AggregateFunction::from_name)
            .ok_or_else(|| {
                FilterValidationError::Invalid(format!(
                    "Invalid aggregation operator not in: {}",
                    messages::aggregate_function_names()
                ))
            })?;

        Ok(ColumnsAggregation {
            column: info.path,
            function,
        })
    }
}
