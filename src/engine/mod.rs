//! Filter orchestration (verb module)
//!
//! Frame or Parquet bytes + validated filters → filtered frame, plus the
//! output representation and multi-payload helpers used at the boundary.

mod apply;
mod error;
mod nested;
mod output;
mod payload;

pub use apply::{apply_filters_from_bytes, apply_filters_from_frame};
pub use error::ProcessError;
pub use nested::{FilterProcessor, NestedFilterProcessor};
pub use output::{render, OutputFormat, Rendered};
pub use payload::{aggregate_payloads, filter_payloads, FramePayload};
