//! Callmap Core Types and Definitions
//!
//! This crate provides the foundational types shared by the call-routing
//! analysis crates. It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Draw**: Rendering hints for flow-graph nodes and edges ([`draw`] module)
//! - **Model**: Typed entity tables of a configuration export ([`model`] module)
//! - **Semantic**: Destinations, flow graphs and report records ([`semantic`] module)

pub mod color;
pub mod draw;
pub mod identifier;
pub mod model;
pub mod semantic;
