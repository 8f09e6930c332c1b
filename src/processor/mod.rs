//! Nested filter processors (verb module)
//!
//! Validated filters + [`FrameQuery`](crate::frame::FrameQuery) → derived
//! query. Row filters dispatch on the path shape fixed at validation time;
//! logical trees are folded bottom-up over independent leaf selections.

mod columns;
mod multiple;
mod rows;

pub use columns::{ColumnsAggregationProcessor, ColumnsFilterProcessor};
pub use multiple::RowsMultipleFilterProcessor;
pub use rows::RowsFilterProcessor;
