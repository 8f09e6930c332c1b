use serde::Deserialize;
use tracing::debug;
use crate::config::EngineConfig;
use crate::frame::{codec, Frame};
use super::error::ProcessError;

/// Representation of a filtered frame handed back to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Parquet,
    #[default]
    Json,
}

struct MimeType {
    name: &'static str,
    extension: &'static str,
    alternatives: &'static [&'static str],
    format: OutputFormat,
}

const MIME_TYPES: [MimeType; 2] = [
    MimeType {
        name: "application/x-parquet",
        extension: ".parquet",
        alternatives: &["application/parquet"],
        format: OutputFormat::Parquet,
    },
    MimeType {
        name: "application/json",
        extension: ".json",
        alternatives: &[],
        format: OutputFormat::Json,
    },
];

impl MimeType {
    fn matches(&self, requested: &str) -> bool {
        let requested = requested.trim().to_lowercase();
        requested == self.name
            || self.alternatives.contains(&requested.as_str())
            || requested.replace('.', "") == self.extension.replace('.', "")
    }
}

impl OutputFormat {
    /// Resolve a content type, file extension or bare format name
    /// (`application/x-parquet`, `.parquet`, `json`, ...), case-insensitively.
    pub fn from_content_type(requested: &str) -> Result<OutputFormat, ProcessError> {
        MIME_TYPES
            .iter()
            .find(|mime| mime.matches(requested))
            .map(|mime| mime.format)
            .ok_or_else(|| ProcessError::UnsupportedContentType {
                requested: requested.to_string(),
                supported: MIME_TYPES.iter().map(|mime| mime.name.to_string()).collect(),
            })
    }

    /// `None` (or a blank value) falls back to the configured default
    pub fn negotiate(requested: Option<&str>, config: &EngineConfig) -> Result<OutputFormat, ProcessError> {
        match requested.map(str::trim).filter(|r| !r.is_empty()) {
            Some(requested) => Self::from_content_type(requested),
            None => Ok(config.default_output),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Parquet => "application/x-parquet",
            OutputFormat::Json => "application/json",
        }
    }
}

/// A rendered frame
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Parquet(Vec<u8>),
    /// Split-oriented JSON: `{"columns", "index", "data"}`
    Json(String),
}

impl Rendered {
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Rendered::Parquet(bytes) => bytes,
            Rendered::Json(text) => text.into_bytes(),
        }
    }
}

pub fn render(frame: &Frame, format: OutputFormat) -> Result<Rendered, ProcessError> {
    debug!(format = format.content_type(), rows = frame.num_rows(), "rendering frame");
    let rendered = match format {
        OutputFormat::Parquet => Rendered::Parquet(codec::to_parquet_bytes(frame)?),
        OutputFormat::Json => Rendered::Json(codec::to_split_json_string(frame)?),
    };
    Ok(rendered)
}
