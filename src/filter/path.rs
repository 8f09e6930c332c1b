//! Canonical paths and path shapes

use std::fmt;

/// Suffix marking an array-valued segment in the wire syntax
pub const ARRAY_MARKER: &str = "[]";

/// One property name in a path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSegment {
    pub name: String,
    /// The property holds an array whose items the next segment addresses
    pub is_array: bool,
}

impl PathSegment {
    pub fn new(name: impl Into<String>, is_array: bool) -> Self {
        Self { name: name.into(), is_array }
    }

    /// Split a raw segment such as `ArrayColumn[]` into name and marker
    pub fn parse(raw: &str) -> Self {
        match raw.strip_suffix(ARRAY_MARKER) {
            Some(name) => Self::new(name, true),
            None => Self::new(raw, false),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_array {
            write!(f, "{}{}", self.name, ARRAY_MARKER)
        } else {
            f.write_str(&self.name)
        }
    }
}

/// A dotted property path with array markers, e.g. `ArrayColumn[].number`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CanonicalPath {
    segments: Vec<PathSegment>,
}

impl CanonicalPath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// Read a path already in canonical form. No schema check is made.
    pub fn parse(raw: &str) -> Self {
        Self::new(raw.split('.').map(PathSegment::parse).collect())
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The top-level column the path starts from
    pub fn column(&self) -> &str {
        self.segments.first().map(|s| s.name.as_str()).unwrap_or_default()
    }

    /// Segment names without markers
    pub fn names(&self) -> Vec<&str> {
        self.segments.iter().map(|s| s.name.as_str()).collect()
    }

    /// Dotted name without markers, as used for flattened columns
    pub fn flat_name(&self) -> String {
        self.names().join(".")
    }

    /// True when the path reaches below a top-level column
    pub fn has_sub_properties(&self) -> bool {
        self.segments.len() > 1
    }

    /// Indices of array-marked segments
    pub fn array_positions(&self) -> Vec<usize> {
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_array)
            .map(|(i, _)| i)
            .collect()
    }

    /// Classify the path for row filtering; `None` for unsupported layouts
    pub fn shape(&self) -> Option<PathShape> {
        match self.array_positions().as_slice() {
            [] => Some(PathShape::NoArray),
            [0] => Some(PathShape::ArrayAtColumn),
            [index] => Some(PathShape::ArrayAsProperty { array_index: *index }),
            [0, inner] => Some(PathShape::NestedArray { inner_index: *inner }),
            _ => None,
        }
    }

    /// Split around the first array segment.
    ///
    /// Returns the names up to and including the first array-marked segment
    /// and the names after it. Without any array segment the whole path is
    /// the first part.
    pub fn split_at_first_array(&self) -> (Vec<&str>, Vec<&str>) {
        let names = self.names();
        let cut = self
            .segments
            .iter()
            .position(|s| s.is_array)
            .map(|i| i + 1)
            .unwrap_or(names.len());
        let (array_path, props_path) = names.split_at(cut);
        (array_path.to_vec(), props_path.to_vec())
    }

    /// Copy of the path with the first array marker removed
    pub fn without_first_marker(&self) -> CanonicalPath {
        let mut segments = self.segments.clone();
        if let Some(first) = segments.iter_mut().find(|s| s.is_array) {
            first.is_array = false;
        }
        CanonicalPath::new(segments)
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// Array layout of a rows-filter path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathShape {
    /// `Col` or `Col.sub.leaf`
    NoArray,
    /// `Col[].sub...`
    ArrayAtColumn,
    /// `Col.sub[].inner...`
    ArrayAsProperty { array_index: usize },
    /// `Col[].prop[].inner...`
    NestedArray { inner_index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trip() {
        let path = CanonicalPath::parse("ObjectColumnNestedArray.ArrayProperty[].number");
        assert_eq!(path.to_string(), "ObjectColumnNestedArray.ArrayProperty[].number");
        assert_eq!(path.flat_name(), "ObjectColumnNestedArray.ArrayProperty.number");
        assert_eq!(path.column(), "ObjectColumnNestedArray");
    }

    #[test]
    fn test_shapes() {
        assert_eq!(CanonicalPath::parse("IntColumn").shape(), Some(PathShape::NoArray));
        assert_eq!(CanonicalPath::parse("Obj.a.b").shape(), Some(PathShape::NoArray));
        assert_eq!(CanonicalPath::parse("ArrayColumn[].number").shape(), Some(PathShape::ArrayAtColumn));
        assert_eq!(
            CanonicalPath::parse("Obj.list[].number").shape(),
            Some(PathShape::ArrayAsProperty { array_index: 1 })
        );
        assert_eq!(
            CanonicalPath::parse("Col[].list[].number").shape(),
            Some(PathShape::NestedArray { inner_index: 1 })
        );
        assert_eq!(CanonicalPath::parse("Obj.a[].b[].c").shape(), None);
        assert_eq!(CanonicalPath::parse("A[].b[].c[].d").shape(), None);
    }

    #[test]
    fn test_split_at_first_array() {
        let path = CanonicalPath::parse("Obj.list[].inner.value");
        let (array_path, props_path) = path.split_at_first_array();
        assert_eq!(array_path, vec!["Obj", "list"]);
        assert_eq!(props_path, vec!["inner", "value"]);

        let flat = CanonicalPath::parse("Obj.value");
        assert_eq!(flat.split_at_first_array(), (vec!["Obj", "value"], vec![]));
    }

    #[test]
    fn test_without_first_marker() {
        let path = CanonicalPath::parse("Col[].list[].number");
        assert_eq!(path.without_first_marker().to_string(), "Col.list[].number");
    }
}
