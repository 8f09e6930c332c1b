//! Descriptor parser (verb module)
//!
//! Transforms schema files (JSON or YAML) into [`SchemaDescriptor`]s and
//! config files into [`EngineConfig`].

use std::path::Path;
use serde_json::Value;
use tracing::debug;
use crate::config::EngineConfig;
use crate::error::ParseError;
use crate::schema::SchemaDescriptor;

/// Parse a schema descriptor file; `.json` files are read as JSON, anything
/// else as YAML
pub fn parse_schema_file<P: AsRef<Path>>(path: P) -> Result<SchemaDescriptor, ParseError> {
    let path = path.as_ref();
    let contents = read(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    debug!(path = %path.display(), is_json, "parsing schema descriptor");
    if is_json {
        parse_schema_json(&contents)
    } else {
        parse_schema_str(&contents)
    }
}

/// Parse a schema descriptor from a YAML string (JSON is valid YAML too)
pub fn parse_schema_str(yaml: &str) -> Result<SchemaDescriptor, ParseError> {
    let document: Value = serde_yaml::from_str(yaml)?;
    Ok(SchemaDescriptor::from_value(document)?)
}

/// Parse a schema descriptor from a JSON string
pub fn parse_schema_json(json: &str) -> Result<SchemaDescriptor, ParseError> {
    let document: Value = serde_json::from_str(json)?;
    Ok(SchemaDescriptor::from_value(document)?)
}

/// Parse engine configuration from a YAML file
pub fn parse_config_file<P: AsRef<Path>>(path: P) -> Result<EngineConfig, ParseError> {
    let contents = read(path.as_ref())?;
    parse_config_str(&contents)
}

/// Parse engine configuration from a YAML string; an empty document yields
/// the defaults
pub fn parse_config_str(yaml: &str) -> Result<EngineConfig, ParseError> {
    if yaml.trim().is_empty() {
        return Ok(EngineConfig::default());
    }
    serde_yaml::from_str(yaml).map_err(ParseError::from)
}

fn read(path: &Path) -> Result<String, ParseError> {
    std::fs::read_to_string(path).map_err(|e| ParseError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnknownOperatorPolicy;
    use crate::engine::OutputFormat;

    #[test]
    fn test_parse_yaml_schema() {
        let schema = parse_schema_str(
            r#"
type: object
properties:
  TextColumn:
    type: string
  ArrayColumn:
    type: array
    items:
      type: object
      properties:
        number: {type: integer}
"#,
        )
        .unwrap();
        assert_eq!(schema.column_names(), vec!["TextColumn", "ArrayColumn"]);
    }

    #[test]
    fn test_parse_json_schema_resolves_refs() {
        let schema = parse_schema_json(
            r##"{
                "type": "object",
                "properties": {"Inner": {"$ref": "#/definitions/Inner"}},
                "definitions": {"Inner": {"type": "object", "properties": {"x": {"type": "number"}}}}
            }"##,
        )
        .unwrap();
        let info = crate::resolver::resolve_path(&schema, "Inner.x").unwrap();
        assert_eq!(info.leaf_type, crate::schema::LeafType::Number);
        assert_eq!(schema.column_names(), vec!["Inner"]);
    }

    #[test]
    fn test_non_object_schema_is_rejected() {
        let err = parse_schema_str("- a\n- b\n").unwrap_err();
        assert!(matches!(err, ParseError::Schema { .. }));
    }

    #[test]
    fn test_invalid_json_schema() {
        let err = parse_schema_json("{not json").unwrap_err();
        assert!(matches!(err, ParseError::Json { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_schema_file("does/not/exist.yaml").unwrap_err();
        assert!(err.to_string().starts_with("Failed to read 'does/not/exist.yaml'"));
    }

    #[test]
    fn test_parse_config() {
        let config = parse_config_str("unknown_operator: reject\ndefault_output: parquet\n").unwrap();
        assert_eq!(config.unknown_operator, UnknownOperatorPolicy::Reject);
        assert_eq!(config.default_output, OutputFormat::Parquet);

        assert_eq!(parse_config_str("").unwrap(), EngineConfig::default());
        assert!(parse_config_str("bogus: 1\n").is_err());
    }
}
