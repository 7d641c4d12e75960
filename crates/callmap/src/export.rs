//! Diagram export backends.
//!
//! - [`dot`]: Graphviz DOT text, behind the `graphviz` feature.

#[cfg(feature = "graphviz")]
pub mod dot;
