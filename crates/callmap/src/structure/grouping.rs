//! Partitioning of auto-attendants into flow groups.
//!
//! Attendants sharing a department are drawn together in one diagram;
//! attendants without a department get a diagram of their own. Group order
//! follows the first appearance of each group in the attendant table.

use std::fmt;

use indexmap::IndexMap;
use log::warn;

use callmap_core::model::{AttendantRole, AutoAttendant, Tables, normalize_extension};

/// What a flow group is keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// Attendants sharing a department label.
    Department(String),
    /// A single attendant without a department, keyed by extension.
    Standalone(String),
}

impl GroupKey {
    /// Short kind tag used in diagram ids and file names.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Department(_) => "department",
            Self::Standalone(_) => "ivr",
        }
    }

    /// Department name or attendant extension.
    pub fn value(&self) -> &str {
        match self {
            Self::Department(value) | Self::Standalone(value) => value,
        }
    }
}

/// A set of auto-attendants drawn in one diagram.
#[derive(Debug, Clone)]
pub struct FlowGroup<'a> {
    key: GroupKey,
    name: String,
    attendants: Vec<&'a AutoAttendant>,
}

impl<'a> FlowGroup<'a> {
    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    /// Display name, e.g. `Department: Sales` or `IVR: Main menu (100)`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every attendant of the group, in table order.
    pub fn attendants(&self) -> &[&'a AutoAttendant] {
        &self.attendants
    }

    /// Attendants a diagram starts from: the primary ones, or every
    /// attendant when none is marked primary.
    pub fn roots(&self) -> Vec<&'a AutoAttendant> {
        let primary: Vec<_> = self
            .attendants
            .iter()
            .copied()
            .filter(|attendant| attendant.role == AttendantRole::Primary)
            .collect();
        if primary.is_empty() {
            self.attendants.clone()
        } else {
            primary
        }
    }

    /// Returns `true` when `selector` names this group by display name,
    /// department or extension, ignoring case.
    pub fn matches(&self, selector: &str) -> bool {
        let selector = selector.trim();
        self.name.eq_ignore_ascii_case(selector) || self.key.value().eq_ignore_ascii_case(selector)
    }
}

impl fmt::Display for FlowGroup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Partition the attendant table into flow groups.
///
/// Attendants without an extension cannot be drawn and are skipped.
pub fn flow_groups(tables: &Tables) -> Vec<FlowGroup<'_>> {
    let mut groups: IndexMap<GroupKey, FlowGroup<'_>> = IndexMap::new();

    for (index, attendant) in tables.auto_attendants.iter().enumerate() {
        let Some(extension) = attendant.extension.as_deref().and_then(normalize_extension) else {
            warn!(
                index = index,
                name = attendant.display_name();
                "Skipping auto-attendant without extension"
            );
            continue;
        };

        let (key, name) = match attendant.department_label() {
            Some(department) => (
                GroupKey::Department(department.to_string()),
                format!("Department: {department}"),
            ),
            None => (
                GroupKey::Standalone(extension.clone()),
                format!("IVR: {} ({extension})", attendant.display_name()),
            ),
        };

        groups
            .entry(key.clone())
            .or_insert_with(|| FlowGroup {
                key,
                name,
                attendants: Vec::new(),
            })
            .attendants
            .push(attendant);
    }

    groups.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attendant(extension: Option<&str>, department: Option<&str>, role: AttendantRole) -> AutoAttendant {
        AutoAttendant {
            extension: extension.map(str::to_string),
            name: extension.map(|ext| format!("Menu {ext}")),
            department: department.map(str::to_string),
            role,
            ..AutoAttendant::default()
        }
    }

    #[test]
    fn test_groups_by_department_in_first_appearance_order() {
        let tables = Tables {
            auto_attendants: vec![
                attendant(Some("100"), Some("Sales"), AttendantRole::Secondary),
                attendant(Some("200"), Some("-"), AttendantRole::Primary),
                attendant(Some("101"), Some("Sales"), AttendantRole::Primary),
                attendant(Some("300"), None, AttendantRole::Unspecified),
                attendant(None, Some("Sales"), AttendantRole::Primary),
            ],
            ..Tables::default()
        };

        let groups = flow_groups(&tables);
        let names: Vec<_> = groups.iter().map(FlowGroup::name).collect();
        assert_eq!(
            names,
            vec!["Department: Sales", "IVR: Menu 200 (200)", "IVR: Menu 300 (300)"]
        );

        let sales = &groups[0];
        assert_eq!(sales.key(), &GroupKey::Department("Sales".to_string()));
        assert_eq!(sales.attendants().len(), 2);
        let roots: Vec<_> = sales.roots().iter().map(|a| a.extension.clone()).collect();
        assert_eq!(roots, vec![Some("101".to_string())]);
    }

    #[test]
    fn test_roots_fall_back_to_all_attendants() {
        let tables = Tables {
            auto_attendants: vec![
                attendant(Some("100"), Some("Support"), AttendantRole::Secondary),
                attendant(Some("101"), Some("Support"), AttendantRole::Unspecified),
            ],
            ..Tables::default()
        };

        let groups = flow_groups(&tables);
        assert_eq!(groups[0].roots().len(), 2);
    }

    #[test]
    fn test_matches() {
        let tables = Tables {
            auto_attendants: vec![
                attendant(Some("100"), Some("Sales"), AttendantRole::Primary),
                attendant(Some("300"), Some("nan"), AttendantRole::Primary),
            ],
            ..Tables::default()
        };

        let groups = flow_groups(&tables);
        assert!(groups[0].matches("sales"));
        assert!(groups[0].matches("Department: Sales"));
        assert!(!groups[0].matches("100"));
        assert!(groups[1].matches("300"));
        assert_eq!(groups[1].key().tag(), "ivr");
    }
}
