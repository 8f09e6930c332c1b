use std::fmt;

/// Errors that can occur during path resolution
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveError {
    /// A segment does not exist at its level of the schema
    WrongPropertyName {
        path: String,
        segment: String,
        valid: Vec<String>,
    },
    /// A segment carries `[]` but the property is not an array
    UnexpectedArrayMarker { path: String, segment: String },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::WrongPropertyName { path, segment, valid } => {
                write!(f, "Wrong property name: {}. Reason: {} not in {}", path, segment, quoted_list(valid))
            }
            ResolveError::UnexpectedArrayMarker { path, segment } => {
                write!(f, "Wrong property name: {}. Reason: {} is not an array", path, segment)
            }
        }
    }
}

impl std::error::Error for ResolveError {}

/// Render names as `['a', 'b']`
pub(crate) fn quoted_list<S: AsRef<str>>(names: &[S]) -> String {
    let quoted: Vec<String> = names.iter().map(|n| format!("'{}'", n.as_ref())).collect();
    format!("[{}]", quoted.join(", "))
}
