//! Integration tests for validating raw filter requests

mod common;

use common::{load_schema, rows_filter, rows_multiple_filter, sample_validator};
use nestfilter::{AggregateFunction, FilterRequest, FilterValidationError, FilterValidator, Operator, PathShape};

#[test]
fn test_empty_request_validates_to_nothing() {
    let filters = sample_validator(FilterRequest::default()).validate().unwrap();
    assert!(filters.is_empty());
}

#[test]
fn test_rows_filter_is_canonicalized() {
    let filters = sample_validator(rows_filter(r#"{"ArrayColumn.number": {"$lt": 9.0}}"#))
        .validate()
        .unwrap();

    let filter = filters.rows_filter.unwrap();
    assert_eq!(filter.column.to_string(), "ArrayColumn[].number");
    assert_eq!(filter.shape, PathShape::ArrayAtColumn);
    assert_eq!(filter.operator, Operator::Lt);
    // float compared against an integer leaf is truncated
    assert_eq!(filter.comp_value.to_string(), "9");
}

#[test]
fn test_unknown_column_in_projection() {
    let validator = FilterValidator::new(
        load_schema("pydantic_models.json"),
        FilterRequest {
            columns_filter: Some(r#"["Field1", "field4"]"#.to_string()),
            ..Default::default()
        },
    );

    let err = validator.validate().unwrap_err();
    assert_eq!(
        err.message(),
        "Wrong property name: field4. Reason: field4 not in ['Field1', 'Field2', 'Field3']"
    );
}

#[test]
fn test_projection_rejects_sub_properties() {
    let validator = sample_validator(FilterRequest {
        columns_filter: Some(r#"["TextColumn", "ArrayColumn.number"]"#.to_string()),
        ..Default::default()
    });

    let err = validator.valid_columns_filter().unwrap_err();
    assert_eq!(
        err.message(),
        "Subproperties are not supported for columns_filter: ArrayColumn[].number"
    );
}

#[test]
fn test_empty_logical_array_is_an_error() {
    let err = sample_validator(rows_multiple_filter(r#"{"$and": []}"#))
        .validate()
        .unwrap_err();
    assert!(matches!(err, FilterValidationError::Invalid(_)));
    assert!(err.message().ends_with("Operator content should be a non-empty array."));
}

#[test]
fn test_malformed_json() {
    let err = sample_validator(rows_filter("{\"IntColumn\": ")).validate().unwrap_err();
    assert!(err.message().starts_with("Bad rows_filter expression."));
    assert!(err.message().contains("Json load error"));
}

#[test]
fn test_unsupported_nesting_level() {
    let two_levels = sample_validator(rows_filter(r#"{"NestedArrayColumn.inner.value": {"$gt": 1}}"#)).validate();
    assert!(two_levels.is_ok());

    let schema = nestfilter::parser::parse_schema_str(
        r#"
type: object
properties:
  Outer:
    type: array
    items:
      type: object
      properties:
        Middle:
          type: array
          items:
            type: object
            properties:
              Inner:
                type: array
                items:
                  type: object
                  properties:
                    leaf: {type: integer}
"#,
    )
    .unwrap();
    let err = FilterValidator::new(schema, rows_filter(r#"{"Outer.Middle.Inner.leaf": {"$eq": 1}}"#))
        .validate()
        .unwrap_err();
    assert!(matches!(err, FilterValidationError::NotImplemented(_)));
    assert_eq!(
        err.message(),
        "Filter over this nested level array is not supported: Outer[].Middle[].Inner[].leaf"
    );
}

#[test]
fn test_aggregation() {
    let validator = sample_validator(FilterRequest {
        columns_aggregation: Some(r#"["ObjectColumnNestedArray.ArrayProperty.number", "mean"]"#.to_string()),
        ..Default::default()
    });

    let aggregation = validator.valid_columns_aggregation().unwrap().unwrap();
    assert_eq!(aggregation.function, AggregateFunction::Mean);
    assert_eq!(aggregation.column.flat_name(), "ObjectColumnNestedArray.ArrayProperty.number");

    let without = validator.without_aggregation();
    assert!(without.valid_columns_aggregation().unwrap().is_none());
}

#[test]
fn test_bad_aggregation_function() {
    let err = sample_validator(FilterRequest {
        columns_aggregation: Some(r#"["IntColumn", "median"]"#.to_string()),
        ..Default::default()
    })
    .validate()
    .unwrap_err();
    assert_eq!(
        err.message(),
        "Invalid aggregation operator not in: [mean, count, max, min, sum, describe]"
    );
}
