//! Error and diagnostic system for bundle loading.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Multiple labeled spans for rich error context
//! - Severity levels
//! - Warning collector for record-level problems across a bundle
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning message with optional error code, multiple source
//! locations, and help text. Fatal diagnostics are wrapped in [`ParseError`];
//! warnings travel next to the loaded tables.
//!
//! # Example
//!
//! ```
//! # use callmap_parser::error::{Diagnostic, ErrorCode};
//! # use callmap_parser::Span;
//!
//! let span = Span::new(100..120);
//! let original_span = Span::new(50..70);
//!
//! let diag = Diagnostic::warning("extension `200` is defined by more than one queue")
//!     .with_code(ErrorCode::E100)
//!     .with_label(span, "ignored duplicate")
//!     .with_secondary_label(original_span, "first defined here")
//!     .with_help("remove the duplicate record or give it a unique extension");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
