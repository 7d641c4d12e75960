//! Typed entity tables loaded from a telephony configuration export.
//!
//! Every record field that an export may leave blank is an `Option`. The
//! loader collapses "column missing", "cell empty" and "cell null" into
//! `None`, so code working with these tables only distinguishes present from
//! absent values.
//!
//! Extension-like identifiers are kept as strings. Leading zeros and
//! non-numeric suffixes are significant, so they are never converted to
//! numbers; [`normalize_extension`] only strips surrounding noise.

use std::fmt;

/// Number of numbered menu slots on an auto-attendant (`Menu 0` to `Menu 9`).
pub const MENU_SLOTS: usize = 10;

/// Department labels that mean "no department".
const PLACEHOLDER_DEPARTMENTS: &[&str] = &["-", "nan", "none", "n/a", "null", "geen"];

/// Normalize an extension-like identifier for comparison.
///
/// Trims surrounding whitespace and drops a trailing `.0` left behind when a
/// spreadsheet stored the number as a float. Returns `None` for blank input.
///
/// # Examples
///
/// ```
/// use callmap_core::model::normalize_extension;
///
/// assert_eq!(normalize_extension(" 0201 ").as_deref(), Some("0201"));
/// assert_eq!(normalize_extension("101.0").as_deref(), Some("101"));
/// assert_eq!(normalize_extension("   "), None);
/// ```
pub fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let normalized = match trimmed.strip_suffix(".0") {
        Some(head) if !head.is_empty() && head.chars().all(|c| c.is_ascii_digit()) => head,
        _ => trimmed,
    };
    Some(normalized.to_string())
}

/// Role of an auto-attendant inside its department.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttendantRole {
    Primary,
    Secondary,
    #[default]
    Unspecified,
}

impl AttendantRole {
    /// Interpret a role label from an export (English or Dutch).
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "primary" | "primair" => Self::Primary,
            "secondary" | "secundair" => Self::Secondary,
            _ => Self::Unspecified,
        }
    }
}

/// An outgoing route field of an auto-attendant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RouteField {
    OfficeClosed,
    OnBreak,
    OnHoliday,
    Default,
    InvalidInput,
    Menu(usize),
}

impl fmt::Display for RouteField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OfficeClosed => f.write_str("Office closed"),
            Self::OnBreak => f.write_str("On break"),
            Self::OnHoliday => f.write_str("On holiday"),
            Self::Default => f.write_str("Default"),
            Self::InvalidInput => f.write_str("Invalid input"),
            Self::Menu(slot) => write!(f, "Menu {slot}"),
        }
    }
}

/// An auto-attendant (digital receptionist / IVR).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutoAttendant {
    pub extension: Option<String>,
    pub name: Option<String>,
    pub department: Option<String>,
    pub role: AttendantRole,
    pub office_closed: Option<String>,
    pub on_break: Option<String>,
    pub on_holiday: Option<String>,
    pub default_route: Option<String>,
    pub invalid_input: Option<String>,
    pub menu: [Option<String>; MENU_SLOTS],
    /// Seconds to wait for input before the default route is taken.
    pub timeout: Option<String>,
}

impl AutoAttendant {
    /// Display name, falling back to a placeholder for unnamed attendants.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed")
    }

    /// Department label, or `None` when blank or a placeholder such as `-`.
    pub fn department_label(&self) -> Option<&str> {
        let department = self.department.as_deref()?.trim();
        let lowered = department.to_lowercase();
        if department.is_empty() || PLACEHOLDER_DEPARTMENTS.contains(&lowered.as_str()) {
            None
        } else {
            Some(department)
        }
    }

    /// Populated menu slots in slot order.
    pub fn menu_options(&self) -> impl Iterator<Item = (usize, &str)> {
        self.menu
            .iter()
            .enumerate()
            .filter_map(|(slot, route)| route.as_deref().map(|route| (slot, route)))
    }

    /// Returns `true` when at least one menu slot is populated.
    pub fn has_menu(&self) -> bool {
        self.menu.iter().any(Option::is_some)
    }

    /// Every configured outgoing route, time-based branches first.
    pub fn routes(&self) -> impl Iterator<Item = (RouteField, &str)> {
        let fixed = [
            (RouteField::OfficeClosed, &self.office_closed),
            (RouteField::OnBreak, &self.on_break),
            (RouteField::OnHoliday, &self.on_holiday),
            (RouteField::Default, &self.default_route),
            (RouteField::InvalidInput, &self.invalid_input),
        ];
        fixed
            .into_iter()
            .filter_map(|(field, route)| route.as_deref().map(|route| (field, route)))
            .chain(
                self.menu_options()
                    .map(|(slot, route)| (RouteField::Menu(slot), route)),
            )
    }
}

/// A call queue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Queue {
    pub extension: Option<String>,
    pub name: Option<String>,
    pub ring_time: Option<String>,
    pub max_wait_time: Option<String>,
    /// Member display names in export order.
    pub members: Vec<String>,
    pub no_answer: Option<String>,
}

/// A ring group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RingGroup {
    pub extension: Option<String>,
    pub name: Option<String>,
    pub ring_time: Option<String>,
    /// Member display names in export order.
    pub members: Vec<String>,
    pub no_answer: Option<String>,
}

/// A user (extension owner).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    pub number: Option<String>,
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub outbound_caller_id: Option<String>,
    pub dids: Vec<String>,
    pub department: Option<String>,
    pub email: Option<String>,
}

/// An inclusive range of normalized numbers belonging to one number block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NumberBlockRange {
    start: u64,
    end: u64,
    label: String,
}

impl NumberBlockRange {
    /// Creates a range; `start` and `end` are swapped when given in reverse.
    pub fn new(start: u64, end: u64, label: impl Into<String>) -> Self {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        Self {
            start,
            end,
            label: label.into(),
        }
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns `true` when `number` lies inside the inclusive range.
    pub fn contains(&self, number: u64) -> bool {
        (self.start..=self.end).contains(&number)
    }
}

/// All tables of one configuration bundle.
///
/// Any table may be empty; analyses over empty tables produce empty or
/// "unknown" results rather than failing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tables {
    pub auto_attendants: Vec<AutoAttendant>,
    pub queues: Vec<Queue>,
    pub ring_groups: Vec<RingGroup>,
    pub users: Vec<User>,
    pub number_blocks: Vec<NumberBlockRange>,
}
