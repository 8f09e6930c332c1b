use std::borrow::Cow;
use serde_json::Value;
use crate::filter::{CanonicalPath, PathSegment};
use crate::schema::{node_type, LeafType, SchemaDescriptor};
use super::error::ResolveError;

/// A resolved property: canonical path plus the leaf's declared type
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyInfo {
    pub path: CanonicalPath,
    pub leaf_type: LeafType,
}

/// Resolves flattened property paths against one schema descriptor
///
/// Shared by all expression validators of a request.
#[derive(Debug, Clone, Copy)]
pub struct PropertyResolver<'a> {
    schema: &'a SchemaDescriptor,
}

impl<'a> PropertyResolver<'a> {
    pub fn new(schema: &'a SchemaDescriptor) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'a SchemaDescriptor {
        self.schema
    }

    /// Walk `flattened_path` (e.g. `ArrayColumn.number` or
    /// `ArrayColumn[].number`) down the schema.
    ///
    /// An `array` node marks the segment that led to it, so the canonical
    /// form always carries the markers the schema implies whether or not
    /// the input spelled them out. `$ref` and `allOf` are expanded only
    /// on the nodes the path actually visits.
    pub fn resolve(&self, flattened_path: &str) -> Result<PropertyInfo, ResolveError> {
        let mut node: Cow<'a, Value> = Cow::Borrowed(self.schema.root());
        let mut segments: Vec<PathSegment> = Vec::new();

        for raw in flattened_path.split('.') {
            let requested = PathSegment::parse(raw);
            node = expand(self.schema, node);

            let wrong_name = |node: &Value| ResolveError::WrongPropertyName {
                path: flattened_path.to_string(),
                segment: raw.to_string(),
                valid: sibling_names(self.schema, node),
            };

            let child = match node_type(&node) {
                Some("object") => child_of(&node, |n| n.get("properties")?.get(&requested.name)),
                Some("array") => match segments.last_mut() {
                    Some(previous) => {
                        previous.is_array = true;
                        child_of(&node, |n| n.get("items"))
                            .map(|items| expand(self.schema, items))
                            .and_then(|items| child_of(&items, |n| n.get("properties")?.get(&requested.name)))
                    }
                    None => None,
                },
                _ => None,
            };
            let Some(child) = child else {
                return Err(wrong_name(&node));
            };

            node = expand(self.schema, child);
            segments.push(PathSegment::new(requested.name.clone(), false));

            if requested.is_array {
                if node_type(&node) != Some("array") {
                    return Err(ResolveError::UnexpectedArrayMarker {
                        path: flattened_path.to_string(),
                        segment: raw.to_string(),
                    });
                }
                if let Some(last) = segments.last_mut() {
                    last.is_array = true;
                }
            }
        }

        Ok(PropertyInfo {
            path: CanonicalPath::new(segments),
            leaf_type: LeafType::from_node(&node),
        })
    }
}

/// Resolve a single path without keeping a resolver around
pub fn resolve_path(schema: &SchemaDescriptor, flattened_path: &str) -> Result<PropertyInfo, ResolveError> {
    PropertyResolver::new(schema).resolve(flattened_path)
}

/// Follow `$ref` and merge `allOf` on the current node, keeping borrows
/// where possible
fn expand<'a>(schema: &'a SchemaDescriptor, node: Cow<'a, Value>) -> Cow<'a, Value> {
    match node {
        Cow::Borrowed(value) => schema.expand(value),
        Cow::Owned(value) if value.get("$ref").is_some() || value.get("allOf").is_some() => {
            Cow::Owned(schema.expand(&value).into_owned())
        }
        owned => owned,
    }
}

/// Pick a child of a node, borrowing from the schema when the node does
fn child_of<'a>(node: &Cow<'a, Value>, pick: impl Fn(&Value) -> Option<&Value>) -> Option<Cow<'a, Value>> {
    match node {
        Cow::Borrowed(value) => pick(*value).map(Cow::Borrowed),
        Cow::Owned(value) => pick(value).cloned().map(Cow::Owned),
    }
}

/// Names offered when a segment is wrong: `properties`, else
/// `items.properties`, else the node's own keys
fn sibling_names(schema: &SchemaDescriptor, node: &Value) -> Vec<String> {
    let keys = |value: Option<&Value>| -> Option<Vec<String>> {
        let map = value?.as_object()?;
        (!map.is_empty()).then(|| map.keys().cloned().collect())
    };
    let items = node.get("items").map(|items| schema.expand(items));
    keys(node.get("properties"))
        .or_else(|| keys(items.as_deref().and_then(|items| items.get("properties"))))
        .or_else(|| keys(Some(node)))
        .unwrap_or_default()
}
