//! Typed route targets.

use std::fmt;

/// Kind of a parsed route target.
///
/// `ExtensionNumber` and `UnknownType` carry a bare number whose entity type
/// is not known from the route text; the resolver probes every table for
/// them. The remaining kinds either name their table explicitly or are
/// terminal actions that need no lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DestinationKind {
    Queue,
    RingGroup,
    User,
    AutoAttendant,
    Voicemail,
    ExtensionNumber,
    UnknownType,
    EndCall,
    Repeat,
    Accept,
    External,
    UnknownText,
}

impl DestinationKind {
    /// Returns `true` for kinds that end a call path without a table lookup.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::EndCall | Self::Repeat | Self::Accept | Self::External | Self::UnknownText
        )
    }

    /// Returns `true` for kinds whose entity type is unknown.
    pub fn is_untyped(self) -> bool {
        matches!(self, Self::ExtensionNumber | Self::UnknownType)
    }

    /// Stable name used in node ids and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queue => "Queue",
            Self::RingGroup => "RingGroup",
            Self::User => "User",
            Self::AutoAttendant => "AutoAttendant",
            Self::Voicemail => "Voicemail",
            Self::ExtensionNumber => "ExtensionNumber",
            Self::UnknownType => "UnknownType",
            Self::EndCall => "EndCall",
            Self::Repeat => "Repeat",
            Self::Accept => "Accept",
            Self::External => "External",
            Self::UnknownText => "UnknownText",
        }
    }
}

impl fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A route target parsed from a free-text "route to" field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Destination {
    kind: DestinationKind,
    identifier: String,
}

impl Destination {
    pub fn new(kind: DestinationKind, identifier: impl Into<String>) -> Self {
        Self {
            kind,
            identifier: identifier.into(),
        }
    }

    pub fn kind(&self) -> DestinationKind {
        self.kind
    }

    /// The entity number, or the canonical text of a terminal action.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.identifier)
    }
}
