//! Normalized schema descriptor and leaf types

use std::borrow::Cow;
use std::fmt;
use serde_json::{Map, Value};
use super::error::SchemaError;
use super::normalize::{lookup, merge_member, normalize, ALL_OF, REF};

/// A JSON-Schema-like type tree
///
/// Built once per request from the record schema; read-only afterwards.
/// Local `$ref`s are kept and followed on demand through [`Self::expand`].
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDescriptor {
    root: Value,
}

impl SchemaDescriptor {
    /// Normalize a raw schema document into a descriptor
    pub fn from_value(document: Value) -> Result<Self, SchemaError> {
        if !document.is_object() {
            return Err(SchemaError::NotAnObject);
        }
        Ok(Self {
            root: normalize(&document)?,
        })
    }

    /// The normalized root node
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Names of the top-level properties (the table's columns), in schema order
    pub fn column_names(&self) -> Vec<String> {
        self.expand(&self.root)
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| props.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Follow `$ref` from `node` to the first node without one.
    ///
    /// Chains were checked on construction; should one still break, the
    /// last node reached is returned.
    pub fn follow<'a>(&'a self, node: &'a Value) -> &'a Value {
        let mut current = node;
        let mut seen: Vec<&str> = Vec::new();
        while let Some(reference) = current.get(REF).and_then(Value::as_str) {
            if seen.contains(&reference) {
                break;
            }
            let Ok(target) = lookup(&self.root, reference) else {
                break;
            };
            seen.push(reference);
            current = target;
        }
        current
    }

    /// `node` with its reference followed and its `allOf` members merged.
    ///
    /// Only this one level is expanded; children keep their own `$ref`s.
    /// A member that includes a definition already being merged adds
    /// nothing and is skipped.
    pub fn expand<'a>(&'a self, node: &'a Value) -> Cow<'a, Value> {
        let mut in_progress = Vec::new();
        self.expand_guarded(node, &mut in_progress)
    }

    fn expand_guarded<'a>(&'a self, node: &'a Value, in_progress: &mut Vec<&'a str>) -> Cow<'a, Value> {
        let node = self.follow(node);
        let Some(Value::Array(members)) = node.get(ALL_OF) else {
            return Cow::Borrowed(node);
        };

        let mut merged = Map::new();
        for member in members {
            let reference = member.get(REF).and_then(Value::as_str);
            if let Some(reference) = reference {
                if in_progress.contains(&reference) {
                    continue;
                }
                in_progress.push(reference);
            }
            let expanded = self.expand_guarded(member, in_progress);
            if reference.is_some() {
                in_progress.pop();
            }
            if let Value::Object(member) = expanded.into_owned() {
                merge_member(&mut merged, member);
            }
        }
        if let Value::Object(own) = node {
            for (key, value) in own {
                if key != ALL_OF {
                    merged.entry(key.clone()).or_insert_with(|| value.clone());
                }
            }
        }
        Cow::Owned(Value::Object(merged))
    }
}

/// Declared type of the node a path resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafType {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
    Null,
    /// Node carries no (recognized) `type`
    Untyped,
}

impl LeafType {
    /// Read the `type` of a schema node.
    ///
    /// A type list such as `["string", "null"]` resolves to its first non-null entry.
    pub fn from_node(node: &Value) -> Self {
        match node_type(node) {
            Some("string") => LeafType::String,
            Some("integer") => LeafType::Integer,
            Some("number") => LeafType::Number,
            Some("boolean") => LeafType::Boolean,
            Some("object") => LeafType::Object,
            Some("array") => LeafType::Array,
            Some("null") => LeafType::Null,
            _ => LeafType::Untyped,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LeafType::String => "string",
            LeafType::Integer => "integer",
            LeafType::Number => "number",
            LeafType::Boolean => "boolean",
            LeafType::Object => "object",
            LeafType::Array => "array",
            LeafType::Null => "null",
            LeafType::Untyped => "untyped",
        }
    }

    /// Scalar types that a rows filter can compare against
    pub fn is_scalar(&self) -> bool {
        matches!(self, LeafType::String | LeafType::Integer | LeafType::Number | LeafType::Boolean)
    }
}

impl fmt::Display for LeafType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `type` keyword of a node, skipping `null` in type lists
pub(crate) fn node_type(node: &Value) -> Option<&str> {
    match node.get("type")? {
        Value::String(t) => Some(t.as_str()),
        Value::Array(types) => {
            let mut names = types.iter().filter_map(Value::as_str);
            let first = names.clone().next();
            names.find(|t| *t != "null").or(first)
        }
        _ => None,
    }
}
