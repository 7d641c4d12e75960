//! Interned identifiers for flow-graph nodes and diagrams.
//!
//! Node identities in a call-flow diagram are derived from several pieces of
//! routing context (a role prefix, the destination kind, the destination
//! identifier and the diagram scope). The [`Id`] type interns the derived
//! string once so that graph bookkeeping can copy, hash and compare node ids
//! cheaply.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> std::sync::MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock")
}

/// Interned identifier.
///
/// # Examples
///
/// ```
/// use callmap_core::identifier::Id;
///
/// let id = Id::new("IVR_100");
/// assert_eq!(id, "IVR_100");
///
/// let derived = Id::from_parts(&["DEST", "Queue", "8020 Sales", "ops"]);
/// assert_eq!(derived, "DEST_Queue_8020-20-Sales_ops");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Creates an `Id` by joining escaped parts with `_`.
    ///
    /// ASCII letters and digits are kept; every other character, `_`
    /// included, becomes `-HEX-` with its code point in upper-case hex.
    /// Parts never contain a bare `_`, so distinct part lists always give
    /// distinct ids. Empty parts are kept as empty segments.
    pub fn from_parts(parts: &[&str]) -> Self {
        let joined = parts
            .iter()
            .map(|part| escape(part))
            .collect::<Vec<_>>()
            .join("_");
        Self::new(&joined)
    }
}

fn escape(part: &str) -> String {
    let mut out = String::with_capacity(part.len());
    for c in part.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else {
            out.push_str(&format!("-{:X}-", u32::from(c)));
        }
    }
    out
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let str_value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        write!(f, "{str_value}")
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        let interner = interner();
        let self_str = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        self_str == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}
