//! Rendering hints attached to flow-graph nodes and edges.

mod shape;
mod stroke;

pub use shape::NodeShape;
pub use stroke::EdgeStyle;
