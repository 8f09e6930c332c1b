use serde_json::Value;
use tracing::error;
use crate::filter::{ColumnsAggregation, ColumnsFilter, RowsFilter, RowsMultipleFilter, ValidatedFilters};
use crate::query::FilterRequest;
use crate::resolver::PropertyResolver;
use crate::schema::SchemaDescriptor;
use super::columns::{ColumnsAggregationValidator, ColumnsFilterValidator};
use super::error::FilterValidationError;
use super::messages;
use super::rows::RowsFilterValidator;

/// Per-request validator over the four raw filter expressions
///
/// Owns the normalized schema and the raw strings. Each `valid_*` accessor
/// parses and validates its expression on demand and returns `Ok(None)`
/// when the expression is absent.
#[derive(Debug, Clone)]
pub struct FilterValidator {
    schema: SchemaDescriptor,
    request: FilterRequest,
}

impl FilterValidator {
    pub fn new(schema: SchemaDescriptor, request: FilterRequest) -> Self {
        Self { schema, request }
    }

    pub fn schema(&self) -> &SchemaDescriptor {
        &self.schema
    }

    pub fn request(&self) -> &FilterRequest {
        &self.request
    }

    /// Top-level column names of the schema
    pub fn all_valid_columns(&self) -> Vec<String> {
        self.schema.column_names()
    }

    pub fn valid_rows_filter(&self) -> Result<Option<RowsFilter>, FilterValidationError> {
        let Some(raw) = parse_raw(self.request.rows_filter.as_deref(), messages::rows_filter)? else {
            return Ok(None);
        };
        RowsFilterValidator::new(self.resolver()).validate(&raw).map(Some)
    }

    pub fn valid_rows_multiple_filter(&self) -> Result<Option<RowsMultipleFilter>, FilterValidationError> {
        let Some(raw) = parse_raw(self.request.rows_multiple_filter.as_deref(), messages::rows_multiple_filter)? else {
            return Ok(None);
        };
        RowsFilterValidator::new(self.resolver()).validate_multiple_filter(&raw).map(Some)
    }

    pub fn valid_columns_filter(&self) -> Result<Option<ColumnsFilter>, FilterValidationError> {
        let Some(raw) = parse_raw(self.request.columns_filter.as_deref(), messages::columns_filter)? else {
            return Ok(None);
        };
        ColumnsFilterValidator::new(self.resolver()).validate(&raw).map(Some)
    }

    pub fn valid_columns_aggregation(&self) -> Result<Option<ColumnsAggregation>, FilterValidationError> {
        let Some(raw) = parse_raw(self.request.columns_aggregation.as_deref(), messages::columns_aggregation)? else {
            return Ok(None);
        };
        ColumnsAggregationValidator::new(self.resolver()).validate(&raw).map(Some)
    }

    /// Validate all four expressions; the first failure wins
    pub fn validate(&self) -> Result<ValidatedFilters, FilterValidationError> {
        Ok(ValidatedFilters {
            rows_filter: self.valid_rows_filter()?,
            rows_multiple_filter: self.valid_rows_multiple_filter()?,
            columns_filter: self.valid_columns_filter()?,
            columns_aggregation: self.valid_columns_aggregation()?,
        })
    }

    /// Copy of this validator with the columns aggregation dropped
    pub fn without_aggregation(&self) -> FilterValidator {
        FilterValidator::new(self.schema.clone(), self.request.without_aggregation())
    }

    fn resolver(&self) -> PropertyResolver<'_> {
        PropertyResolver::new(&self.schema)
    }
}

fn parse_raw(raw: Option<&str>, message: fn() -> String) -> Result<Option<Value>, FilterValidationError> {
    let Some(raw) = raw.filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };
    serde_json::from_str(raw).map(Some).map_err(|err| {
        let message = format!("{}. Json load error: {}", message(), err);
        error!("{}", message);
        FilterValidationError::Invalid(message)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator(request: FilterRequest) -> FilterValidator {
        let schema = SchemaDescriptor::from_value(json!({
            "type": "object",
            "properties": {
                "Field1": {"type": "string"},
                "Field2": {"type": "integer"}
            }
        }))
        .unwrap();
        FilterValidator::new(schema, request)
    }

    #[test]
    fn test_absent_and_empty_are_none() {
        let v = validator(FilterRequest {
            rows_filter: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(v.validate().unwrap(), ValidatedFilters::default());
    }

    #[test]
    fn test_json_error_message() {
        let v = validator(FilterRequest {
            columns_aggregation: Some("[\"Field2\", ".to_string()),
            ..Default::default()
        });
        let err = v.valid_columns_aggregation().unwrap_err();
        assert!(err.to_string().starts_with("Bad columns_aggregation expression. Correct form"));
        assert!(err.to_string().contains(". Json load error: "));
    }

    #[test]
    fn test_without_aggregation() {
        let v = validator(FilterRequest {
            columns_filter: Some(r#"["Field1"]"#.to_string()),
            columns_aggregation: Some(r#"["Field2", "sum"]"#.to_string()),
            ..Default::default()
        });
        assert!(v.valid_columns_aggregation().unwrap().is_some());

        let stripped = v.without_aggregation();
        assert!(stripped.valid_columns_aggregation().unwrap().is_none());
        assert_eq!(stripped.valid_columns_filter().unwrap(), v.valid_columns_filter().unwrap());
        assert_eq!(stripped.all_valid_columns(), vec!["Field1", "Field2"]);
    }
}
