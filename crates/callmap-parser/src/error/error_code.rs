//! Error codes for bundle diagnostics.
//!
//! Codes are grouped by the part of the bundle they concern:
//! - `E0xx` - Document structure
//! - `E1xx` - Entity records
//! - `E2xx` - Trunk ranges

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Document Errors (E0xx)
    // =========================================================================
    /// Malformed bundle document.
    ///
    /// The bundle is not valid TOML, or a section has the wrong shape
    /// (for example `queues` given as a table instead of an array of tables).
    E001,

    // =========================================================================
    // Record Errors (E1xx)
    // =========================================================================
    /// Duplicate extension.
    ///
    /// Two records of the same table share an extension. The first record
    /// wins; later ones are ignored.
    E100,

    /// Missing extension.
    ///
    /// A record has no extension or number, so no route can point at it.
    E101,

    /// Invalid menu slot.
    ///
    /// A menu key is not a single digit `0` to `9`.
    E102,

    // =========================================================================
    // Trunk Range Errors (E2xx)
    // =========================================================================
    /// Invalid trunk range.
    ///
    /// A range bound is missing or is not a phone number.
    E200,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E200 => "E200",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E102.to_string(), "E102");
        assert_eq!(ErrorCode::E200.as_str(), "E200");
    }
}
