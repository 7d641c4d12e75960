//! # Callmap Parser
//!
//! Input-side parsing for call-routing analysis:
//!
//! - [`parse_destination`] classifies a free-text route target such as
//!   `Wachtrij(8020 Sales)` or `End Call` into a typed destination.
//! - [`number`] normalizes phone numbers and maps them onto trunk number
//!   blocks.
//! - [`load_bundle`] reads a TOML configuration bundle into typed tables,
//!   reporting problems as [`error::Diagnostic`]s with source spans.
//!
//! ## Usage
//!
//! ```
//! # use callmap_parser::{load_bundle, parse_destination, error::ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let bundle = load_bundle(r#"
//!         [[auto_attendants]]
//!         extension = "100"
//!         default = "8020 Sales"
//!     "#)?;
//!
//!     let route = bundle.tables().auto_attendants[0].default_route.as_deref();
//!     let destination = route.and_then(parse_destination);
//!     assert_eq!(destination.map(|d| d.identifier().to_string()).as_deref(), Some("8020"));
//!     Ok(())
//! }
//! ```

mod bundle;
mod destination;
pub mod error;
pub mod number;
mod span;

pub use bundle::{Bundle, load_bundle};
pub use destination::parse_destination;
pub use span::Span;
