//! Path resolution (verb module)
//!
//! Schema + flattened property path → canonical path with array markers and
//! the leaf's declared type.

mod resolve;
mod error;

pub use resolve::{resolve_path, PropertyInfo, PropertyResolver};
pub use error::ResolveError;
pub(crate) use error::quoted_list;
