//! Built-in layers, one per facet shape.

pub mod field;
pub mod graph;
pub mod nominal;
