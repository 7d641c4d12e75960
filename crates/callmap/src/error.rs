//! Error types for callmap operations.
//!
//! This module provides the main error type [`CallMapError`]. Route
//! analysis itself never fails: unresolvable or malformed configuration is
//! drawn into the diagrams. Errors come from the edges of the pipeline,
//! such as reading and parsing bundles, invalid configuration and group
//! selection.

use std::io;

use thiserror::Error;

use callmap_parser::error::ParseError;

/// The main error type for callmap operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the bundle source next to the structured
/// diagnostics so callers can render snippets for every label.
#[derive(Debug, Error)]
pub enum CallMapError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No flow group matches `{0}`")]
    Selection(String),
}

impl CallMapError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
