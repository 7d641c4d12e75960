//! Collector for accumulating warnings while loading a bundle.

use crate::error::Diagnostic;

/// Accumulates record-level warnings so a bundle reports every problem at
/// once instead of stopping at the first.
///
/// Structural problems abort loading with a [`ParseError`](crate::error::ParseError)
/// before any record is read, so only warnings are ever collected.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    warnings: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        debug_assert!(
            diagnostic.severity().is_warning(),
            "record diagnostics are warnings"
        );
        self.warnings.push(diagnostic);
    }

    /// Finish collection, returning the warnings in emission order.
    pub fn finish(self) -> Vec<Diagnostic> {
        self.warnings
    }
}
