//! Semantic value types produced by the analysis pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! Bundle (TOML export)
//!     ↓ bundle loader
//! Tables (model)
//!     ↓ destination parser
//! Destination - typed route target
//!     ↓ entity resolver
//! VisualKind + label
//!     ↓ flow builder / reachability analyzer
//! Diagram, UserRecord (these types)
//!     ↓ export
//! DOT
//! ```
//!
//! # Organization
//!
//! - [`destination`] - Parsed route targets: [`Destination`], [`DestinationKind`]
//! - [`diagram`] - Flow graph values: [`Diagram`], [`Node`], [`Edge`], [`VisualKind`]
//! - [`record`] - Reachability report values: [`UserRecord`]

pub mod destination;
pub mod diagram;
pub mod record;

pub use destination::*;
pub use diagram::*;
pub use record::*;
