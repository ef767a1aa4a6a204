pub mod graph;
pub mod primitive;

pub use graph::*;
pub use primitive::{resolve_primitive_kind, PrimitiveKind};
