//! Schema descriptor (noun module)
//!
//! A JSON-Schema-like type tree used to validate filter paths. Documents are
//! checked and simplified once on construction; `$ref` pointers are followed
//! lazily, one level per path segment.

mod descriptor;
mod error;
mod normalize;

pub use descriptor::{LeafType, SchemaDescriptor};
pub use error::SchemaError;
pub use normalize::normalize;

pub(crate) use descriptor::node_type;
