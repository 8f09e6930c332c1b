//! In-memory tables (noun module)
//!
//! [`Frame`] holds rows of JSON cells under named columns plus a row index
//! that survives selection, explode and group-back. [`FrameQuery`] is the
//! immutable query wrapper the filter processors build on, and [`codec`]
//! moves frames in and out of Parquet and the split JSON layout.

mod aggregate;
pub mod codec;
mod error;
mod query;
mod table;

pub use error::FrameError;
pub use query::{walk_path, FrameQuery, RowPredicate};
pub use table::{Frame, RowLabel};
