//! Loader for configuration bundles.
//!
//! A bundle is a TOML document with one array of tables per exported
//! table:
//!
//! ```toml
//! [[auto_attendants]]
//! extension = "100"
//! name = "Main"
//! default = "End Call"
//! menu = { 1 = "Wachtrij(200 Sales)" }
//!
//! [[queues]]
//! extension = 200
//! members = ["Alice"]
//!
//! [[users]]
//! number = "101"
//! first_name = "Alice"
//! did = "0201234501:0201234502"
//!
//! [[trunk_ranges]]
//! label = "Amsterdam"
//! start = "020 123 4500"
//! end = "020 123 4599"
//! ```
//!
//! Exports are loosely typed, so every scalar field accepts a string, an
//! integer or a float. Values are trimmed and empty strings count as absent.
//! Missing sections load as empty tables.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use log::{debug, warn};
use serde::Deserialize;
use thiserror::Error;
use toml::Spanned;

use callmap_core::model::{
    AttendantRole, AutoAttendant, MENU_SLOTS, NumberBlockRange, Queue, RingGroup, Tables, User,
    normalize_extension,
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    number,
    span::Span,
};

/// A loaded bundle: the typed tables plus the warnings raised while
/// loading them.
#[derive(Debug, Clone)]
pub struct Bundle {
    tables: Tables,
    warnings: Vec<Diagnostic>,
}

impl Bundle {
    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    /// Non-fatal problems found in the bundle, in source order.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }
}

/// Load a bundle from TOML source text.
///
/// # Errors
///
/// Returns a [`ParseError`] with an [`ErrorCode::E001`] diagnostic when the
/// source is not valid TOML or a section has the wrong shape. Record-level
/// problems are reported as warnings on the returned [`Bundle`].
///
/// # Examples
///
/// ```
/// use callmap_parser::load_bundle;
///
/// let bundle = load_bundle(r#"
///     [[queues]]
///     extension = 200
///     name = "Sales"
///     members = ["Alice", "Bob"]
/// "#).unwrap();
///
/// let queue = &bundle.tables().queues[0];
/// assert_eq!(queue.extension.as_deref(), Some("200"));
/// assert_eq!(queue.members, ["Alice", "Bob"]);
/// assert!(bundle.warnings().is_empty());
/// ```
pub fn load_bundle(source: &str) -> Result<Bundle, ParseError> {
    let raw: RawBundle = toml::from_str(source).map_err(|err| {
        let span = err
            .span()
            .map(Span::new)
            .unwrap_or_else(|| Span::new(0..0));
        Diagnostic::error(format!("malformed bundle: {}", err.message().trim_end()))
            .with_code(ErrorCode::E001)
            .with_label(span, "cannot be read")
            .with_help("bundles are TOML documents with arrays of tables such as [[queues]]")
    })?;

    let mut loader = Loader::default();
    let tables = Tables {
        auto_attendants: loader.auto_attendants(raw.auto_attendants),
        queues: loader.queues(raw.queues),
        ring_groups: loader.ring_groups(raw.ring_groups),
        users: loader.users(raw.users),
        number_blocks: loader.trunk_ranges(raw.trunk_ranges),
    };

    debug!(
        auto_attendants = tables.auto_attendants.len(),
        queues = tables.queues.len(),
        ring_groups = tables.ring_groups.len(),
        users = tables.users.len(),
        number_blocks = tables.number_blocks.len();
        "Loaded bundle"
    );

    let warnings = loader.diagnostics.finish();
    Ok(Bundle { tables, warnings })
}

// =============================================================================
// Raw document structure
// =============================================================================

/// A loosely typed scalar cell.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    /// The trimmed cell text, or `None` when blank.
    fn into_text(self) -> Option<String> {
        let text = match self {
            Scalar::Text(text) => text,
            Scalar::Integer(value) => value.to_string(),
            Scalar::Float(value) => value.to_string(),
            Scalar::Bool(value) => value.to_string(),
        };
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

fn text(cell: Option<Scalar>) -> Option<String> {
    cell.and_then(Scalar::into_text)
}

fn spanned_text(cell: Option<&Spanned<Scalar>>) -> Option<String> {
    cell.and_then(|cell| cell.get_ref().clone().into_text())
}

fn span_of<T>(cell: &Spanned<T>) -> Span {
    Span::new(cell.span())
}

/// A DID column: colon-separated text or an explicit list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Dids {
    Many(Vec<Scalar>),
    One(Scalar),
}

impl Dids {
    fn into_list(self) -> Vec<String> {
        let cells = match self {
            Dids::Many(cells) => cells,
            Dids::One(cell) => vec![cell],
        };
        cells
            .into_iter()
            .filter_map(Scalar::into_text)
            .flat_map(|text| {
                text.split(':')
                    .map(str::trim)
                    .filter(|did| !did.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawBundle {
    auto_attendants: Vec<RawAutoAttendant>,
    queues: Vec<RawQueue>,
    ring_groups: Vec<RawRingGroup>,
    users: Vec<RawUser>,
    trunk_ranges: Vec<RawTrunkRange>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAutoAttendant {
    extension: Option<Spanned<Scalar>>,
    name: Option<Scalar>,
    #[serde(alias = "onderdeel")]
    department: Option<Scalar>,
    role: Option<Scalar>,
    office_closed: Option<Scalar>,
    on_break: Option<Scalar>,
    on_holiday: Option<Scalar>,
    #[serde(alias = "send_call_to")]
    default: Option<Scalar>,
    invalid_input: Option<Scalar>,
    menu: BTreeMap<String, Spanned<Scalar>>,
    timeout: Option<Scalar>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawQueue {
    extension: Option<Spanned<Scalar>>,
    name: Option<Scalar>,
    ring_time: Option<Scalar>,
    max_wait_time: Option<Scalar>,
    members: Vec<Scalar>,
    no_answer: Option<Scalar>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRingGroup {
    extension: Option<Spanned<Scalar>>,
    name: Option<Scalar>,
    ring_time: Option<Scalar>,
    members: Vec<Scalar>,
    no_answer: Option<Scalar>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawUser {
    #[serde(alias = "extension")]
    number: Option<Spanned<Scalar>>,
    #[serde(alias = "full_name")]
    name: Option<Scalar>,
    first_name: Option<Scalar>,
    last_name: Option<Scalar>,
    mobile: Option<Scalar>,
    outbound_caller_id: Option<Scalar>,
    did: Option<Dids>,
    department: Option<Scalar>,
    email: Option<Scalar>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTrunkRange {
    label: Option<Scalar>,
    start: Option<Spanned<Scalar>>,
    end: Option<Spanned<Scalar>>,
}

#[derive(Debug, Error)]
enum TrunkRangeError {
    #[error("trunk range has no start number")]
    MissingStart,

    #[error("`{0}` is not a phone number")]
    InvalidNumber(String),
}

// =============================================================================
// Conversion
// =============================================================================

/// Converts raw sections into typed tables, collecting diagnostics.
#[derive(Debug, Default)]
struct Loader {
    diagnostics: DiagnosticCollector,
}

impl Loader {
    /// Track the extension of one record; warns about blanks and duplicates.
    fn check_extension(
        &mut self,
        seen: &mut IndexMap<String, Span>,
        table: &str,
        index: usize,
        cell: Option<&Spanned<Scalar>>,
    ) -> Option<String> {
        let extension = spanned_text(cell).and_then(|raw| normalize_extension(&raw));
        let Some(extension) = extension else {
            warn!(table = table, index = index; "Record without extension");
            let mut diag = Diagnostic::warning(format!(
                "{table} record #{} has no extension",
                index + 1
            ))
            .with_code(ErrorCode::E101)
            .with_help("routes can only point at records with an extension");
            if let Some(cell) = cell {
                diag = diag.with_label(span_of(cell), "blank extension");
            }
            self.diagnostics.emit(diag);
            return None;
        };

        // `cell` is always present when an extension was read from it.
        let span = cell.map(span_of).unwrap_or_default();
        if let Some(first) = seen.get(&extension) {
            self.diagnostics.emit(
                Diagnostic::warning(format!(
                    "extension `{extension}` is defined by more than one {table} record"
                ))
                .with_code(ErrorCode::E100)
                .with_label(span, "ignored duplicate")
                .with_secondary_label(*first, "first defined here")
                .with_help("remove the duplicate record or give it a unique extension"),
            );
        } else {
            seen.insert(extension.clone(), span);
        }
        Some(extension)
    }

    fn auto_attendants(&mut self, raw: Vec<RawAutoAttendant>) -> Vec<AutoAttendant> {
        let mut seen = IndexMap::new();
        raw.into_iter()
            .enumerate()
            .map(|(index, record)| {
                let extension = self.check_extension(
                    &mut seen,
                    "auto-attendant",
                    index,
                    record.extension.as_ref(),
                );

                let mut menu: [Option<String>; MENU_SLOTS] = Default::default();
                for (key, route) in record.menu {
                    match key.trim().parse::<usize>() {
                        Ok(slot) if slot < MENU_SLOTS && key.trim().len() == 1 => {
                            menu[slot] = spanned_text(Some(&route));
                        }
                        _ => self.diagnostics.emit(
                            Diagnostic::warning(format!("`{key}` is not a menu slot"))
                                .with_code(ErrorCode::E102)
                                .with_label(span_of(&route), "route ignored")
                                .with_help("menu keys are single digits from 0 to 9"),
                        ),
                    }
                }

                AutoAttendant {
                    extension,
                    name: text(record.name),
                    department: text(record.department),
                    role: text(record.role)
                        .map(|role| AttendantRole::from_label(&role))
                        .unwrap_or_default(),
                    office_closed: text(record.office_closed),
                    on_break: text(record.on_break),
                    on_holiday: text(record.on_holiday),
                    default_route: text(record.default),
                    invalid_input: text(record.invalid_input),
                    menu,
                    timeout: text(record.timeout),
                }
            })
            .collect()
    }

    fn queues(&mut self, raw: Vec<RawQueue>) -> Vec<Queue> {
        let mut seen = IndexMap::new();
        raw.into_iter()
            .enumerate()
            .map(|(index, record)| Queue {
                extension: self.check_extension(
                    &mut seen,
                    "queue",
                    index,
                    record.extension.as_ref(),
                ),
                name: text(record.name),
                ring_time: text(record.ring_time),
                max_wait_time: text(record.max_wait_time),
                members: record
                    .members
                    .into_iter()
                    .filter_map(Scalar::into_text)
                    .collect(),
                no_answer: text(record.no_answer),
            })
            .collect()
    }

    fn ring_groups(&mut self, raw: Vec<RawRingGroup>) -> Vec<RingGroup> {
        let mut seen = IndexMap::new();
        raw.into_iter()
            .enumerate()
            .map(|(index, record)| RingGroup {
                extension: self.check_extension(
                    &mut seen,
                    "ring group",
                    index,
                    record.extension.as_ref(),
                ),
                name: text(record.name),
                ring_time: text(record.ring_time),
                members: record
                    .members
                    .into_iter()
                    .filter_map(Scalar::into_text)
                    .collect(),
                no_answer: text(record.no_answer),
            })
            .collect()
    }

    fn users(&mut self, raw: Vec<RawUser>) -> Vec<User> {
        let mut seen = IndexMap::new();
        raw.into_iter()
            .enumerate()
            .map(|(index, record)| {
                let number =
                    self.check_extension(&mut seen, "user", index, record.number.as_ref());
                let name = text(record.name).or_else(|| {
                    let full = [text(record.first_name), text(record.last_name)]
                        .into_iter()
                        .flatten()
                        .collect::<Vec<_>>()
                        .join(" ");
                    (!full.is_empty()).then_some(full)
                });

                User {
                    number,
                    name,
                    mobile: text(record.mobile),
                    outbound_caller_id: text(record.outbound_caller_id),
                    dids: record.did.map(Dids::into_list).unwrap_or_default(),
                    department: text(record.department),
                    email: text(record.email),
                }
            })
            .collect()
    }

    fn trunk_ranges(&mut self, raw: Vec<RawTrunkRange>) -> Vec<NumberBlockRange> {
        raw.into_iter()
            .enumerate()
            .filter_map(|(index, record)| {
                let label = text(record.label).unwrap_or_else(|| format!("Block {}", index + 1));
                match trunk_range(&record.start, &record.end, &label) {
                    Ok(range) => Some(range),
                    Err((err, span)) => {
                        warn!(label = label.as_str(), err = err.to_string(); "Skipping trunk range");
                        let mut diag = Diagnostic::warning(format!("trunk range `{label}`: {err}"))
                            .with_code(ErrorCode::E200)
                            .with_help("range bounds are phone numbers, e.g. \"020 123 4500\"");
                        if let Some(span) = span {
                            diag = diag.with_label(span, "range skipped");
                        }
                        self.diagnostics.emit(diag);
                        None
                    }
                }
            })
            .collect()
    }
}

/// Builds one range; a missing end makes a single-number range.
fn trunk_range(
    start: &Option<Spanned<Scalar>>,
    end: &Option<Spanned<Scalar>>,
    label: &str,
) -> Result<NumberBlockRange, (TrunkRangeError, Option<Span>)> {
    let bound = |cell: &Spanned<Scalar>| {
        let raw = spanned_text(Some(cell)).unwrap_or_default();
        number::normalize(&raw).ok_or_else(|| {
            (
                TrunkRangeError::InvalidNumber(raw),
                Some(span_of(cell)),
            )
        })
    };

    let start_cell = start
        .as_ref()
        .ok_or((TrunkRangeError::MissingStart, end.as_ref().map(span_of)))?;
    let first = bound(start_cell)?;
    let last = match end {
        Some(cell) => bound(cell)?,
        None => first,
    };
    Ok(NumberBlockRange::new(first, last, label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bundle() {
        let bundle = load_bundle("").unwrap();
        assert_eq!(bundle.tables(), &Tables::default());
        assert!(bundle.warnings().is_empty());
    }

    #[test]
    fn test_loose_scalars() {
        let bundle = load_bundle(
            r#"
            [[queues]]
            extension = 200.0
            name = "  Sales  "
            ring_time = 20
            max_wait_time = ""
            members = ["Alice", "", 101]
            "#,
        )
        .unwrap();

        let queue = &bundle.tables().queues[0];
        assert_eq!(queue.extension.as_deref(), Some("200"));
        assert_eq!(queue.name.as_deref(), Some("Sales"));
        assert_eq!(queue.ring_time.as_deref(), Some("20"));
        assert_eq!(queue.max_wait_time, None);
        assert_eq!(queue.members, ["Alice", "101"]);
    }

    #[test]
    fn test_attendant_menu_and_role() {
        let bundle = load_bundle(
            r#"
            [[auto_attendants]]
            extension = "100"
            role = "Primair"
            onderdeel = "Sales"
            send_call_to = "End Call"
            menu = { 1 = "200", 9 = "Wachtrij(300)", 12 = "400" }
            "#,
        )
        .unwrap();

        let attendant = &bundle.tables().auto_attendants[0];
        assert_eq!(attendant.role, AttendantRole::Primary);
        assert_eq!(attendant.department.as_deref(), Some("Sales"));
        assert_eq!(attendant.default_route.as_deref(), Some("End Call"));
        assert_eq!(attendant.menu[1].as_deref(), Some("200"));
        assert_eq!(attendant.menu[9].as_deref(), Some("Wachtrij(300)"));

        let warnings = bundle.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code(), Some(ErrorCode::E102));
    }

    #[test]
    fn test_user_names_and_dids() {
        let bundle = load_bundle(
            r#"
            [[users]]
            number = 101
            first_name = "Alice"
            last_name = "Jansen"
            did = "0201234501: 0201234502"

            [[users]]
            number = "102"
            name = "Bob"
            did = ["0201234503", 201234504]
            "#,
        )
        .unwrap();

        let users = &bundle.tables().users;
        assert_eq!(users[0].name.as_deref(), Some("Alice Jansen"));
        assert_eq!(users[0].dids, ["0201234501", "0201234502"]);
        assert_eq!(users[1].name.as_deref(), Some("Bob"));
        assert_eq!(users[1].dids, ["0201234503", "201234504"]);
    }

    #[test]
    fn test_duplicate_and_missing_extensions() {
        let source = r#"
            [[queues]]
            extension = "200"
            name = "First"

            [[queues]]
            extension = "200"
            name = "Second"

            [[queues]]
            name = "Orphan"
        "#;
        let bundle = load_bundle(source).unwrap();

        assert_eq!(bundle.tables().queues.len(), 3);
        let warnings = bundle.warnings();
        assert_eq!(warnings.len(), 2);

        assert_eq!(warnings[0].code(), Some(ErrorCode::E100));
        let labels = warnings[0].labels();
        assert_eq!(labels.len(), 2);
        assert!(labels[0].span().start() > labels[1].span().start());
        assert_eq!(&source[labels[1].span().to_range()], "\"200\"");

        assert_eq!(warnings[1].code(), Some(ErrorCode::E101));
    }

    #[test]
    fn test_trunk_ranges() {
        let bundle = load_bundle(
            r#"
            [[trunk_ranges]]
            label = "Amsterdam"
            start = "020 123 4500"
            end = "020 123 4599"

            [[trunk_ranges]]
            label = "Single"
            start = "+31 10 1234567"

            [[trunk_ranges]]
            label = "Broken"
            start = "call me"
            end = "0201234599"
            "#,
        )
        .unwrap();

        let blocks = &bundle.tables().number_blocks;
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].start(), 31201234500);
        assert_eq!(blocks[0].end(), 31201234599);
        assert_eq!(blocks[1].start(), blocks[1].end());

        let warnings = bundle.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code(), Some(ErrorCode::E200));
        assert!(warnings[0].message().contains("Broken"));
    }

    #[test]
    fn test_malformed_toml() {
        let err = load_bundle("[[queues]\nextension = 1").unwrap_err();
        let diag = &err.diagnostics()[0];
        assert!(diag.severity().is_error());
        assert_eq!(diag.code(), Some(ErrorCode::E001));
        assert_eq!(diag.labels().len(), 1);
    }

    #[test]
    fn test_wrong_section_shape() {
        let err = load_bundle("queues = \"none\"").unwrap_err();
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E001));
    }
}
