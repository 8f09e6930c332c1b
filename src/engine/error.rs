use std::fmt;
use crate::frame::FrameError;

/// Errors surfaced by the filter orchestrator
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessError {
    /// Any failure while applying validated filters to data
    Unprocessable { kind: String, message: String },
    /// The requested output representation is not supported
    UnsupportedContentType { requested: String, supported: Vec<String> },
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::Unprocessable { kind, message } => {
                write!(f, "Processing filter exception ({}): {}", kind, message)
            }
            ProcessError::UnsupportedContentType { requested, supported } => {
                write!(f, "Unsupported content type '{}'. Supported: {}", requested, supported.join(", "))
            }
        }
    }
}

impl std::error::Error for ProcessError {}

impl From<FrameError> for ProcessError {
    fn from(err: FrameError) -> Self {
        ProcessError::Unprocessable {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}
