//! Labeled source spans for diagnostic messages.

use crate::span::Span;

/// A message attached to a span of the bundle source.
///
/// - **Primary labels** mark the record or value the diagnostic is about.
/// - **Secondary labels** point at related places, such as the record that
///   first claimed a duplicated extension.
#[derive(Debug, Clone)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
}

impl Label {
    /// Create a new primary label.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a new secondary label.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_and_secondary_labels() {
        let duplicate = Label::primary(Span::new(40..45), "ignored duplicate");
        let original = Label::secondary(Span::new(10..15), "first defined here");

        assert!(duplicate.is_primary());
        assert_eq!(duplicate.span().start(), 40);
        assert_eq!(duplicate.message(), "ignored duplicate");
        assert!(!original.is_primary());
        assert_eq!(original.span().end(), 15);
    }
}
