//! Engine configuration

use serde::Deserialize;
use crate::engine::OutputFormat;

/// What `select` does with an operator symbol it does not know
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownOperatorPolicy {
    /// Return the table unchanged (logged as a warning)
    #[default]
    Ignore,
    /// Fail with `FrameError::UnknownOperator`
    Reject,
}

/// Options shared by every filtering pass
///
/// ```yaml
/// unknown_operator: reject
/// default_output: parquet
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub unknown_operator: UnknownOperatorPolicy,
    /// Representation used when the client names no content type
    pub default_output: OutputFormat,
}
