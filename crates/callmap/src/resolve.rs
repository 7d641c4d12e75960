//! Entity resolution for route targets.
//!
//! A parsed [`Destination`] only names a kind hint and an identifier. The
//! [`Directory`] looks the identifier up in the configuration tables and
//! decides what the target really is, producing the node label and visual
//! kind used by flow diagrams and the entity used by reachability reports.

use indexmap::IndexMap;
use log::trace;

use callmap_core::{
    model::{AutoAttendant, Queue, RingGroup, Tables, User, normalize_extension},
    semantic::{Destination, DestinationKind, VisualKind},
};

/// Lookup tables over the configuration records.
///
/// Every table is keyed by normalized extension; when two records share a
/// key the first one wins.
#[derive(Debug)]
pub struct Directory<'a> {
    queues: IndexMap<String, &'a Queue>,
    ring_groups: IndexMap<String, &'a RingGroup>,
    users: IndexMap<String, &'a User>,
    users_by_name: IndexMap<&'a str, &'a User>,
    attendants: IndexMap<String, &'a AutoAttendant>,
}

impl<'a> Directory<'a> {
    pub fn new(tables: &'a Tables) -> Self {
        let mut users_by_name = IndexMap::new();
        for user in &tables.users {
            if let Some(name) = user.name.as_deref().map(str::trim) {
                users_by_name.entry(name).or_insert(user);
            }
        }

        Self {
            queues: index(&tables.queues, |queue| queue.extension.as_deref()),
            ring_groups: index(&tables.ring_groups, |group| group.extension.as_deref()),
            users: index(&tables.users, |user| user.number.as_deref()),
            users_by_name,
            attendants: index(&tables.auto_attendants, |attendant| {
                attendant.extension.as_deref()
            }),
        }
    }

    pub fn queue(&self, extension: &str) -> Option<&'a Queue> {
        self.queues.get(extension).copied()
    }

    pub fn ring_group(&self, extension: &str) -> Option<&'a RingGroup> {
        self.ring_groups.get(extension).copied()
    }

    pub fn user(&self, number: &str) -> Option<&'a User> {
        self.users.get(number).copied()
    }

    /// Looks a user up by display name, as queue and ring-group member
    /// lists refer to users.
    pub fn user_by_name(&self, name: &str) -> Option<&'a User> {
        self.users_by_name.get(name.trim()).copied()
    }

    pub fn attendant(&self, extension: &str) -> Option<&'a AutoAttendant> {
        self.attendants.get(extension).copied()
    }

    /// Resolves a parsed destination.
    pub fn resolve_destination(&self, destination: &Destination) -> Resolved<'a> {
        self.resolve(Some(destination.identifier()), destination.kind())
    }

    /// Resolves an identifier under a kind hint.
    ///
    /// Numeric identifiers are probed against queues, ring groups, users and
    /// auto-attendants in that order. A probe only runs when the hint names
    /// its kind or carries no type information. Voicemail is only resolved
    /// for an explicit voicemail hint.
    pub fn resolve(&self, identifier: Option<&str>, kind: DestinationKind) -> Resolved<'a> {
        let Some(identifier) = identifier.map(str::trim).filter(|id| !id.is_empty()) else {
            return Resolved::plain(VisualKind::ConfigError, "Not configured");
        };

        let resolved = match kind {
            DestinationKind::EndCall => Resolved::plain(VisualKind::EndCall, "Hang up"),
            DestinationKind::Repeat => Resolved::plain(VisualKind::Repeat, "Repeat Prompt"),
            DestinationKind::External => {
                Resolved::plain(VisualKind::External, format!("External:\n{identifier}"))
            }
            DestinationKind::Accept => Resolved::plain(VisualKind::Accept, "Accept"),
            DestinationKind::UnknownText => {
                Resolved::plain(VisualKind::Text, format!("Text:\n{identifier}"))
            }
            _ if is_numeric(identifier) => self.resolve_number(identifier, kind),
            _ => Resolved::plain(VisualKind::Unknown, format!("Unknown ID: {identifier}")),
        };

        trace!(
            identifier = identifier,
            hint = kind.as_str(),
            visual = resolved.visual.key();
            "Resolved route target"
        );
        resolved
    }

    fn resolve_number(&self, number: &str, kind: DestinationKind) -> Resolved<'a> {
        let probes = |target: DestinationKind| kind == target || kind.is_untyped();

        if let Some(queue) = self.queue(number).filter(|_| probes(DestinationKind::Queue)) {
            let members = self.members(&queue.members);
            let name = queue
                .name
                .clone()
                .unwrap_or_else(|| format!("Queue {number}"));
            let label = format!(
                "Queue: {name} ({number})\n(Ring: {}, MaxWait: {})\nMembers:\n {}",
                seconds(queue.ring_time.as_deref()),
                seconds(queue.max_wait_time.as_deref()),
                members_text(&members),
            );
            return Resolved::with_entity(VisualKind::Queue, label, members, Entity::Queue(queue));
        }

        if let Some(group) = self
            .ring_group(number)
            .filter(|_| probes(DestinationKind::RingGroup))
        {
            let members = self.members(&group.members);
            let name = group
                .name
                .clone()
                .unwrap_or_else(|| format!("Ring Group {number}"));
            let label = format!(
                "RG: {name} ({number})\n(Ring: {})\nMembers:\n {}",
                seconds(group.ring_time.as_deref()),
                members_text(&members),
            );
            return Resolved::with_entity(
                VisualKind::RingGroup,
                label,
                members,
                Entity::RingGroup(group),
            );
        }

        if let Some(user) = self.user(number).filter(|_| probes(DestinationKind::User)) {
            let name = user
                .name
                .clone()
                .unwrap_or_else(|| format!("User {number}"));
            let label = format!("User: {name}\n({})", user_details(user));
            return Resolved::with_entity(VisualKind::User, label, Vec::new(), Entity::User(user));
        }

        if let Some(attendant) = self
            .attendant(number)
            .filter(|_| probes(DestinationKind::AutoAttendant))
        {
            let name = attendant
                .name
                .clone()
                .unwrap_or_else(|| format!("IVR {number}"));
            let label = format!("IVR: {name}\n({number})");
            return Resolved::with_entity(
                VisualKind::AutoAttendant,
                label,
                Vec::new(),
                Entity::AutoAttendant(attendant),
            );
        }

        if kind == DestinationKind::Voicemail {
            let owner = self.user(number);
            let label = match owner.and_then(|user| user.name.as_deref()) {
                Some(name) => format!("Voicemail ({number})\nof: {name}"),
                None => format!("Voicemail ({number})"),
            };
            return Resolved::with_entity(
                VisualKind::Voicemail,
                label,
                Vec::new(),
                Entity::Voicemail(owner),
            );
        }

        Resolved::plain(VisualKind::Unknown, format!("Unknown ext: {number}"))
    }

    fn members(&self, names: &'a [String]) -> Vec<Member<'a>> {
        names
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(|name| Member {
                name,
                user: self.user_by_name(name),
            })
            .collect()
    }
}

fn index<'a, T>(
    records: &'a [T],
    extension: impl Fn(&T) -> Option<&str>,
) -> IndexMap<String, &'a T> {
    let mut map = IndexMap::new();
    for record in records {
        if let Some(key) = extension(record).and_then(normalize_extension) {
            map.entry(key).or_insert(record);
        }
    }
    map
}

fn is_numeric(identifier: &str) -> bool {
    identifier.chars().all(|c| c.is_ascii_digit())
}

/// Formats a loosely typed timer as whole seconds, e.g. `20s`.
fn seconds(raw: Option<&str>) -> String {
    raw.and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .map_or_else(|| "N/A".to_string(), |value| format!("{}s", value.trunc() as i64))
}

fn members_text(members: &[Member<'_>]) -> String {
    if members.is_empty() {
        return "(No members)".to_string();
    }
    members
        .iter()
        .map(|member| match member.user {
            Some(user) => format!("{} ({})", member.name, user_details(user)),
            None => format!("{} (unknown)", member.name),
        })
        .collect::<Vec<_>>()
        .join("\n ")
}

/// One-line summary of a user's numbers.
///
/// ```
/// # use callmap::{model::User, resolve::user_details};
/// let user = User {
///     number: Some("101".to_string()),
///     mobile: Some("0612345678".to_string()),
///     dids: vec!["0201234501".to_string(), "0201234502".to_string()],
///     ..User::default()
/// };
/// assert_eq!(user_details(&user), "Ext: 101, Mob: 0612345678, DID: 0201234501");
/// ```
pub fn user_details(user: &User) -> String {
    let number = user
        .number
        .as_deref()
        .and_then(normalize_extension)
        .unwrap_or_else(|| "N/A".to_string());
    let mut details = vec![format!("Ext: {number}")];
    if let Some(mobile) = user.mobile.as_deref() {
        details.push(format!("Mob: {mobile}"));
    }
    if let Some(caller_id) = user.outbound_caller_id.as_deref() {
        details.push(format!("CID: {caller_id}"));
    }
    if let Some(did) = user.dids.iter().map(|did| did.trim()).find(|did| !did.is_empty()) {
        details.push(format!("DID: {did}"));
    }
    details.join(", ")
}

/// A configuration record a route target resolved to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Entity<'a> {
    Queue(&'a Queue),
    RingGroup(&'a RingGroup),
    User(&'a User),
    AutoAttendant(&'a AutoAttendant),
    /// A voicemail box and the user owning its number, if any.
    Voicemail(Option<&'a User>),
}

/// A queue or ring-group member name and the user it refers to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Member<'a> {
    pub name: &'a str,
    pub user: Option<&'a User>,
}

/// Outcome of resolving a route target.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<'a> {
    visual: VisualKind,
    label: String,
    members: Vec<Member<'a>>,
    entity: Option<Entity<'a>>,
}

impl<'a> Resolved<'a> {
    fn plain(visual: VisualKind, label: impl Into<String>) -> Self {
        Self {
            visual,
            label: label.into(),
            members: Vec::new(),
            entity: None,
        }
    }

    fn with_entity(
        visual: VisualKind,
        label: String,
        members: Vec<Member<'a>>,
        entity: Entity<'a>,
    ) -> Self {
        Self {
            visual,
            label,
            members,
            entity: Some(entity),
        }
    }

    pub fn visual(&self) -> VisualKind {
        self.visual
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Queue or ring-group members; empty for other targets.
    pub fn members(&self) -> &[Member<'a>] {
        &self.members
    }

    pub fn entity(&self) -> Option<Entity<'a>> {
        self.entity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> Tables {
        Tables {
            queues: vec![Queue {
                extension: Some("100".to_string()),
                name: Some("Sales".to_string()),
                ring_time: Some("20.0".to_string()),
                max_wait_time: None,
                members: vec!["Alice".to_string(), "Zed".to_string()],
                no_answer: Some("End Call".to_string()),
            }],
            ring_groups: vec![RingGroup {
                extension: Some("300".to_string()),
                members: Vec::new(),
                ..RingGroup::default()
            }],
            users: vec![
                User {
                    number: Some("100".to_string()),
                    name: Some("Front desk".to_string()),
                    ..User::default()
                },
                User {
                    number: Some("101.0".to_string()),
                    name: Some("Alice".to_string()),
                    outbound_caller_id: Some("+31201234500".to_string()),
                    ..User::default()
                },
                User {
                    number: Some("101".to_string()),
                    name: Some("Alice (old)".to_string()),
                    ..User::default()
                },
            ],
            auto_attendants: vec![AutoAttendant {
                extension: Some("800".to_string()),
                ..AutoAttendant::default()
            }],
            number_blocks: Vec::new(),
        }
    }

    #[test]
    fn test_untyped_number_prefers_queue() {
        let tables = tables();
        let directory = Directory::new(&tables);

        let resolved = directory.resolve(Some("100"), DestinationKind::ExtensionNumber);
        assert_eq!(resolved.visual(), VisualKind::Queue);
        assert!(matches!(resolved.entity(), Some(Entity::Queue(_))));

        let typed = directory.resolve(Some("100"), DestinationKind::User);
        assert_eq!(typed.visual(), VisualKind::User);
        assert_eq!(typed.label(), "User: Front desk\n(Ext: 100)");
    }

    #[test]
    fn test_queue_label_lists_members_and_timers() {
        let tables = tables();
        let directory = Directory::new(&tables);

        let resolved = directory.resolve(Some("100"), DestinationKind::Queue);
        assert_eq!(
            resolved.label(),
            "Queue: Sales (100)\n(Ring: 20s, MaxWait: N/A)\nMembers:\n \
             Alice (Ext: 101, CID: +31201234500)\n Zed (unknown)"
        );
        assert_eq!(resolved.members().len(), 2);
        assert!(resolved.members()[0].user.is_some());
        assert!(resolved.members()[1].user.is_none());
    }

    #[test]
    fn test_ring_group_defaults() {
        let tables = tables();
        let directory = Directory::new(&tables);

        let resolved = directory.resolve(Some("300"), DestinationKind::UnknownType);
        assert_eq!(
            resolved.label(),
            "RG: Ring Group 300 (300)\n(Ring: N/A)\nMembers:\n (No members)"
        );
    }

    #[test]
    fn test_first_record_wins() {
        let tables = tables();
        let directory = Directory::new(&tables);
        assert_eq!(directory.user("101").and_then(|u| u.name.as_deref()), Some("Alice"));
    }

    #[test]
    fn test_typed_hint_skips_other_tables() {
        let tables = tables();
        let directory = Directory::new(&tables);

        let resolved = directory.resolve(Some("800"), DestinationKind::Queue);
        assert_eq!(resolved.visual(), VisualKind::Unknown);
        assert_eq!(resolved.label(), "Unknown ext: 800");

        let attendant = directory.resolve(Some("800"), DestinationKind::AutoAttendant);
        assert_eq!(attendant.label(), "IVR: IVR 800\n(800)");
    }

    #[test]
    fn test_voicemail_names_owner() {
        let tables = tables();
        let directory = Directory::new(&tables);

        let owned = directory.resolve(Some("101"), DestinationKind::Voicemail);
        assert_eq!(owned.visual(), VisualKind::Voicemail);
        assert_eq!(owned.label(), "Voicemail (101)\nof: Alice");

        let orphan = directory.resolve(Some("555"), DestinationKind::Voicemail);
        assert_eq!(orphan.label(), "Voicemail (555)");
        assert_eq!(orphan.entity(), Some(Entity::Voicemail(None)));
    }

    #[test]
    fn test_terminal_and_missing_targets() {
        let tables = Tables::default();
        let directory = Directory::new(&tables);

        assert_eq!(
            directory.resolve(None, DestinationKind::Queue).visual(),
            VisualKind::ConfigError
        );
        assert_eq!(
            directory.resolve(Some("  "), DestinationKind::Queue).label(),
            "Not configured"
        );
        assert_eq!(
            directory.resolve(Some("End Call"), DestinationKind::EndCall).label(),
            "Hang up"
        );
        assert_eq!(
            directory
                .resolve(Some("+31 6 1234 5678"), DestinationKind::External)
                .label(),
            "External:\n+31 6 1234 5678"
        );
        assert_eq!(
            directory.resolve(Some("banana"), DestinationKind::UnknownText).visual(),
            VisualKind::Text
        );
        assert_eq!(
            directory.resolve(Some("x12"), DestinationKind::UnknownType).label(),
            "Unknown ID: x12"
        );
    }

    #[test]
    fn test_seconds() {
        assert_eq!(seconds(Some("20")), "20s");
        assert_eq!(seconds(Some("19.9")), "19s");
        assert_eq!(seconds(Some("soon")), "N/A");
        assert_eq!(seconds(None), "N/A");
    }
}
