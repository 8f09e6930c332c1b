//! One-time `$ref` / `allOf` normalization of a JSON-Schema document

use serde_json::{Map, Value};
use super::error::SchemaError;

pub(super) const REF: &str = "$ref";
pub(super) const ALL_OF: &str = "allOf";

/// Check and simplify `document`.
///
/// - every `$ref` must be a local pointer (`#/...`) to an existing node, and
///   a chain of references must end in a node that is not itself a `$ref`
/// - an `allOf` whose members are all written inline is collapsed into one
///   node: members are merged in order (see [`merge_member`]), keys written
///   next to `allOf` only fill gaps left by the members
///
/// References stay in place together with their `definitions` / `$defs`
/// targets. They are followed one level at a time during path resolution,
/// so recursive and heavily shared definitions are accepted as-is.
pub fn normalize(document: &Value) -> Result<Value, SchemaError> {
    check_references(document)?;
    Ok(collapse_inline(document))
}

fn check_references(document: &Value) -> Result<(), SchemaError> {
    let mut stack = vec![document];
    while let Some(node) = stack.pop() {
        match node {
            Value::Object(map) => {
                if map.contains_key(REF) {
                    follow_chain(document, node)?;
                }
                stack.extend(map.values());
            }
            Value::Array(items) => stack.extend(items),
            _ => {}
        }
    }
    Ok(())
}

/// Follow `$ref` from `node` to the first node without one
fn follow_chain<'d>(document: &'d Value, node: &'d Value) -> Result<&'d Value, SchemaError> {
    let mut current = node;
    let mut seen: Vec<&str> = Vec::new();
    while let Some(reference) = current.get(REF).and_then(Value::as_str) {
        if seen.contains(&reference) {
            return Err(SchemaError::RecursiveReference(reference.to_string()));
        }
        seen.push(reference);
        current = lookup(document, reference)?;
    }
    Ok(current)
}

/// Target of a single local reference
pub(super) fn lookup<'d>(document: &'d Value, reference: &str) -> Result<&'d Value, SchemaError> {
    let Some(pointer) = reference.strip_prefix('#') else {
        return Err(SchemaError::UnsupportedReference(reference.to_string()));
    };
    document
        .pointer(pointer)
        .ok_or_else(|| SchemaError::UnresolvedReference(reference.to_string()))
}

fn collapse_inline(node: &Value) -> Value {
    match node {
        Value::Object(map) => {
            let inline_members = match map.get(ALL_OF) {
                Some(Value::Array(members)) if members.iter().all(|m| m.is_object() && m.get(REF).is_none()) => {
                    Some(members)
                }
                _ => None,
            };

            let mut out = Map::new();
            for (key, value) in map {
                if key == ALL_OF && inline_members.is_some() {
                    continue;
                }
                out.insert(key.clone(), collapse_inline(value));
            }

            if let Some(members) = inline_members {
                let mut merged = Map::new();
                for member in members {
                    if let Value::Object(member) = collapse_inline(member) {
                        merge_member(&mut merged, member);
                    }
                }
                for (key, value) in out {
                    merged.entry(key).or_insert(value);
                }
                out = merged;
            }

            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(collapse_inline).collect()),
        other => other.clone(),
    }
}

/// Fold one `allOf` member into `target`: `properties` maps are united,
/// any other key of the member replaces the earlier value
pub(super) fn merge_member(target: &mut Map<String, Value>, member: Map<String, Value>) {
    for (key, value) in member {
        match value {
            Value::Object(incoming) if key == "properties" => match target.get_mut(&key) {
                Some(Value::Object(existing)) => existing.extend(incoming),
                _ => {
                    target.insert(key, Value::Object(incoming));
                }
            },
            value => {
                target.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keeps_references_and_definitions() {
        let doc = json!({
            "type": "object",
            "properties": {
                "Field1": {"type": "string"},
                "Field3": {"$ref": "#/definitions/NestedModel"}
            },
            "definitions": {
                "NestedModel": {
                    "type": "object",
                    "properties": {"nested_field": {"type": "string"}}
                }
            }
        });

        let normalized = normalize(&doc).unwrap();

        assert_eq!(normalized["properties"]["Field3"], json!({"$ref": "#/definitions/NestedModel"}));
        assert_eq!(normalized["definitions"], doc["definitions"]);
    }

    #[test]
    fn test_collapses_inline_all_of() {
        let doc = json!({
            "type": "object",
            "properties": {
                "Field3": {"title": "Field3", "allOf": [
                    {"title": "Inner", "type": "object", "properties": {"a": {"type": "integer"}}}
                ]}
            }
        });

        let normalized = normalize(&doc).unwrap();
        let field = &normalized["properties"]["Field3"];

        assert_eq!(field["type"], json!("object"));
        // member keys win over siblings
        assert_eq!(field["title"], json!("Inner"));
        assert!(field.get("allOf").is_none());
    }

    #[test]
    fn test_all_of_with_reference_left_in_place() {
        let doc = json!({
            "properties": {"Field3": {"allOf": [{"$ref": "#/$defs/Inner"}]}},
            "$defs": {"Inner": {"type": "object"}}
        });

        let normalized = normalize(&doc).unwrap();
        assert_eq!(normalized["properties"]["Field3"]["allOf"][0]["$ref"], json!("#/$defs/Inner"));
    }

    #[test]
    fn test_all_of_unites_properties() {
        let doc = json!({
            "type": "object",
            "properties": {
                "Sample": {"allOf": [
                    {"type": "object", "properties": {"value": {"type": "number"}}},
                    {"type": "object", "properties": {"depth": {"type": "number"}}}
                ]}
            }
        });

        let normalized = normalize(&doc).unwrap();
        let properties = normalized["properties"]["Sample"]["properties"].as_object().unwrap();
        let names: Vec<&String> = properties.keys().collect();
        assert_eq!(names, vec!["value", "depth"]);
    }

    #[test]
    fn test_recursive_definition_accepted() {
        let doc = json!({
            "type": "object",
            "properties": {"node": {"$ref": "#/definitions/Node"}},
            "definitions": {
                "Node": {"type": "object", "properties": {"child": {"$ref": "#/definitions/Node"}}}
            }
        });

        assert_eq!(normalize(&doc).unwrap(), doc);
    }

    #[test]
    fn test_reference_loop_rejected() {
        let doc = json!({
            "properties": {"a": {"$ref": "#/definitions/A"}},
            "definitions": {
                "A": {"$ref": "#/definitions/B"},
                "B": {"$ref": "#/definitions/A"}
            }
        });

        assert!(matches!(normalize(&doc), Err(SchemaError::RecursiveReference(_))));
    }

    #[test]
    fn test_remote_reference_rejected() {
        let doc = json!({"properties": {"a": {"$ref": "other.json#/A"}}});
        assert!(matches!(normalize(&doc), Err(SchemaError::UnsupportedReference(_))));
    }

    #[test]
    fn test_unresolved_reference() {
        let doc = json!({"properties": {"a": {"$ref": "#/definitions/Missing"}}});
        assert!(matches!(normalize(&doc), Err(SchemaError::UnresolvedReference(_))));
    }
}
