use std::fmt;
use crate::resolver::ResolveError;

/// Errors raised while validating client filter expressions
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValidationError {
    /// Malformed or unsupported client input
    Invalid(String),
    /// Well-formed input the engine cannot evaluate (array layouts beyond
    /// two levels)
    NotImplemented(String),
}

impl FilterValidationError {
    pub fn message(&self) -> &str {
        match self {
            FilterValidationError::Invalid(m) | FilterValidationError::NotImplemented(m) => m,
        }
    }
}

impl fmt::Display for FilterValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for FilterValidationError {}

impl From<ResolveError> for FilterValidationError {
    fn from(err: ResolveError) -> Self {
        FilterValidationError::Invalid(err.to_string())
    }
}
