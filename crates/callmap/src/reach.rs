//! Reachability reports.
//!
//! Where a flow diagram shows every path, these reports answer which users
//! a call can end up with. [`find_reachable_users`] walks routes breadth
//! first with one visited set for the whole walk, so every target is
//! expanded at most once no matter how many paths lead to it.

use std::{
    collections::{BTreeSet, HashSet, VecDeque},
    fmt,
};

use indexmap::IndexMap;
use log::{debug, trace};

use callmap_core::{
    model::{AutoAttendant, User, normalize_extension},
    semantic::{DestinationKind, NO_DEPARTMENT, UserRecord},
};
use callmap_parser::{number::NumberBlocks, parse_destination};

use crate::{
    resolve::{Directory, Entity, Member},
    structure::FlowGroup,
};

/// Collects every user reachable from the `starts` routes.
///
/// Start routes are at depth 1; routes deeper than `max_depth` are
/// dropped. Users end a path. Queue and ring-group members are collected
/// before the no-answer route is followed, and auto-attendants continue
/// through all of their route fields. Voicemail and terminal targets reach
/// nobody.
pub fn find_reachable_users<'a>(
    starts: impl IntoIterator<Item = &'a str>,
    directory: &Directory<'a>,
    blocks: &NumberBlocks,
    max_depth: usize,
) -> BTreeSet<UserRecord> {
    let mut pending: VecDeque<(&'a str, usize)> =
        starts.into_iter().map(|route| (route, 1)).collect();
    let mut visited: HashSet<(DestinationKind, String)> = HashSet::new();
    let mut users = BTreeSet::new();

    while let Some((route, depth)) = pending.pop_front() {
        if depth > max_depth {
            continue;
        }
        let Some(destination) = parse_destination(route) else {
            continue;
        };
        if !visited.insert((destination.kind(), destination.identifier().to_string())) {
            continue;
        }

        let resolved = directory.resolve_destination(&destination);
        trace!(target_kind = resolved.visual().key(), depth = depth; "Reached route target");

        match resolved.entity() {
            Some(Entity::User(user)) => {
                users.insert(user_record(user, blocks));
            }
            Some(Entity::Queue(queue)) => {
                users.extend(member_records(resolved.members(), blocks));
                if let Some(no_answer) = queue.no_answer.as_deref() {
                    pending.push_back((no_answer, depth + 1));
                }
            }
            Some(Entity::RingGroup(group)) => {
                users.extend(member_records(resolved.members(), blocks));
                if let Some(no_answer) = group.no_answer.as_deref() {
                    pending.push_back((no_answer, depth + 1));
                }
            }
            Some(Entity::AutoAttendant(attendant)) => {
                pending.extend(attendant.routes().map(|(_, route)| (route, depth + 1)));
            }
            Some(Entity::Voicemail(_)) | None => {}
        }
    }

    users
}

/// Report row: a user reachable from a flow group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachRow {
    pub group: String,
    pub user: UserRecord,
}

/// Runs [`find_reachable_users`] per flow group over every route field of
/// the group's attendants. Rows are in group order, then user order.
pub fn reachability_report<'a>(
    groups: &[FlowGroup<'a>],
    directory: &Directory<'a>,
    blocks: &NumberBlocks,
    max_depth: usize,
) -> Vec<ReachRow> {
    let rows: Vec<ReachRow> = groups
        .iter()
        .flat_map(|group| {
            let starts = group
                .attendants()
                .iter()
                .copied()
                .flat_map(|attendant| attendant.routes().map(|(_, route)| route));
            find_reachable_users(starts, directory, blocks, max_depth)
                .into_iter()
                .map(move |user| ReachRow {
                    group: group.name().to_string(),
                    user,
                })
        })
        .collect();

    debug!(groups = groups.len(), rows = rows.len(); "Built reachability report");
    rows
}

/// How an attendant route reaches a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Via {
    /// The route targets the user.
    Direct,
    /// The user is a member of the targeted queue.
    Queue { extension: String, name: String },
    /// The user is a member of the targeted ring group.
    RingGroup { extension: String, name: String },
}

impl fmt::Display for Via {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => f.write_str("Direct"),
            Self::Queue { extension, name } => write!(f, "Queue: {name} ({extension})"),
            Self::RingGroup { extension, name } => write!(f, "Ring group: {name} ({extension})"),
        }
    }
}

/// Report row: an attendant that routes straight to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendantAttribution {
    pub user: UserRecord,
    pub attendant_extension: String,
    pub attendant_name: String,
    pub via: Via,
    /// Route fields leading to the user, e.g. `Menu 1`, in field order.
    pub routes: Vec<String>,
}

/// Attributes users to the attendants that reach them in one hop.
///
/// A route reaches a user when it targets the user directly or targets a
/// queue or ring group the user is a member of. One row is produced per
/// user, attendant and [`Via`]; rows are ordered by user number, then by
/// attendant table order.
pub fn attendants_per_user<'a>(
    attendants: &'a [AutoAttendant],
    directory: &Directory<'a>,
    blocks: &NumberBlocks,
) -> Vec<AttendantAttribution> {
    type Key = (UserRecord, String, Via);
    let mut rows: IndexMap<Key, AttendantAttribution> = IndexMap::new();

    for attendant in attendants {
        let Some(extension) = attendant.extension.as_deref().and_then(normalize_extension) else {
            continue;
        };

        for (field, route) in attendant.routes() {
            let Some(destination) = parse_destination(route) else {
                continue;
            };
            let resolved = directory.resolve_destination(&destination);
            let reached: Vec<(&User, Via)> = match resolved.entity() {
                Some(Entity::User(user)) => vec![(user, Via::Direct)],
                Some(Entity::Queue(queue)) => {
                    let via = Via::Queue {
                        extension: destination.identifier().to_string(),
                        name: queue
                            .name
                            .clone()
                            .unwrap_or_else(|| format!("Queue {}", destination.identifier())),
                    };
                    member_users(resolved.members(), &via)
                }
                Some(Entity::RingGroup(group)) => {
                    let via = Via::RingGroup {
                        extension: destination.identifier().to_string(),
                        name: group
                            .name
                            .clone()
                            .unwrap_or_else(|| format!("Ring Group {}", destination.identifier())),
                    };
                    member_users(resolved.members(), &via)
                }
                _ => Vec::new(),
            };

            for (user, via) in reached {
                let record = user_record(user, blocks);
                let row = rows
                    .entry((record.clone(), extension.clone(), via.clone()))
                    .or_insert_with(|| AttendantAttribution {
                        user: record,
                        attendant_extension: extension.clone(),
                        attendant_name: attendant.display_name().to_string(),
                        via,
                        routes: Vec::new(),
                    });
                let field = field.to_string();
                if !row.routes.contains(&field) {
                    row.routes.push(field);
                }
            }
        }
    }

    let mut rows: Vec<_> = rows.into_values().collect();
    rows.sort_by(|a, b| a.user.number.cmp(&b.user.number));
    debug!(rows = rows.len(); "Built attendants-per-user report");
    rows
}

fn member_users<'a>(members: &[Member<'a>], via: &Via) -> Vec<(&'a User, Via)> {
    members
        .iter()
        .filter_map(|member| member.user)
        .map(|user| (user, via.clone()))
        .collect()
}

fn member_records(members: &[Member<'_>], blocks: &NumberBlocks) -> Vec<UserRecord> {
    members
        .iter()
        .filter_map(|member| member.user)
        .map(|user| user_record(user, blocks))
        .collect()
}

/// Builds the report record of a user, classifying DIDs and the outbound
/// caller id by number block.
pub fn user_record(user: &User, blocks: &NumberBlocks) -> UserRecord {
    let department = user
        .department
        .as_deref()
        .map(str::trim)
        .filter(|department| !department.is_empty())
        .unwrap_or(NO_DEPARTMENT);

    UserRecord {
        number: user
            .number
            .as_deref()
            .and_then(normalize_extension)
            .unwrap_or_default(),
        name: user.name.clone().unwrap_or_default(),
        department: department.to_string(),
        dids: user.dids.clone(),
        outbound_caller_id: user.outbound_caller_id.clone(),
        mobile: user.mobile.clone(),
        email: user.email.clone(),
        did_blocks: user
            .dids
            .iter()
            .filter_map(|did| blocks.find_block(did))
            .map(str::to_string)
            .collect(),
        caller_id_block: user
            .outbound_caller_id
            .as_deref()
            .and_then(|caller_id| blocks.find_block(caller_id))
            .map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use callmap_core::model::{NumberBlockRange, Queue, RingGroup, Tables};

    use super::*;

    fn user(number: &str, name: &str) -> User {
        User {
            number: Some(number.to_string()),
            name: Some(name.to_string()),
            ..User::default()
        }
    }

    fn tables() -> Tables {
        Tables {
            auto_attendants: vec![
                AutoAttendant {
                    extension: Some("100".to_string()),
                    name: Some("Main".to_string()),
                    default_route: Some("Queue(200)".to_string()),
                    menu: {
                        let mut menu: [Option<String>; 10] = Default::default();
                        menu[1] = Some("Gebruiker(103)".to_string());
                        menu[2] = Some("Queue(200 Sales)".to_string());
                        menu
                    },
                    ..AutoAttendant::default()
                },
                AutoAttendant {
                    extension: Some("110".to_string()),
                    name: Some("After hours".to_string()),
                    default_route: Some("300".to_string()),
                    ..AutoAttendant::default()
                },
            ],
            queues: vec![Queue {
                extension: Some("200".to_string()),
                name: Some("Sales".to_string()),
                members: vec!["Alice".to_string(), "Ghost".to_string()],
                no_answer: Some("IVR(110)".to_string()),
                ..Queue::default()
            }],
            ring_groups: vec![RingGroup {
                extension: Some("300".to_string()),
                members: vec!["Bob".to_string()],
                no_answer: Some("Queue(200)".to_string()),
                ..RingGroup::default()
            }],
            users: vec![
                User {
                    dids: vec!["0201234501".to_string(), "0301234501".to_string()],
                    outbound_caller_id: Some("+31 20 1234500".to_string()),
                    department: Some("Sales".to_string()),
                    ..user("101", "Alice")
                },
                user("102", "Bob"),
                user("103", "Carol"),
            ],
            number_blocks: vec![NumberBlockRange::new(31201234500, 31201234599, "Amsterdam")],
        }
    }

    fn numbers(users: &BTreeSet<UserRecord>) -> Vec<&str> {
        users.iter().map(|user| user.number.as_str()).collect()
    }

    #[test]
    fn test_reachable_users_follow_no_answer_chains() {
        let tables = tables();
        let directory = Directory::new(&tables);
        let blocks = NumberBlocks::new(tables.number_blocks.clone());

        let users = find_reachable_users(["Queue(200)"], &directory, &blocks, 10);
        assert_eq!(numbers(&users), vec!["101", "102"]);

        let alice = users.first().unwrap();
        assert_eq!(alice.department, "Sales");
        assert_eq!(alice.did_blocks, vec!["Amsterdam".to_string()]);
        assert_eq!(alice.caller_id_block.as_deref(), Some("Amsterdam"));

        let bob = users.last().unwrap();
        assert_eq!(bob.department, NO_DEPARTMENT);
        assert!(bob.did_blocks.is_empty());
    }

    #[test]
    fn test_depth_limit_drops_deep_routes() {
        let tables = tables();
        let directory = Directory::new(&tables);
        let blocks = NumberBlocks::default();

        // Queue 200 at depth 1, attendant 110 at depth 2, ring group 300 at depth 3.
        assert_eq!(
            numbers(&find_reachable_users(["Queue(200)"], &directory, &blocks, 2)),
            vec!["101"]
        );
        assert!(find_reachable_users(["Queue(200)"], &directory, &blocks, 0).is_empty());
    }

    #[test]
    fn test_unparseable_and_terminal_routes_reach_nobody() {
        let tables = tables();
        let directory = Directory::new(&tables);
        let blocks = NumberBlocks::default();

        let starts = ["", "End Call", "Voicemail(101)"];
        let users = find_reachable_users(starts, &directory, &blocks, 10);
        assert!(users.is_empty());
    }

    #[test]
    fn test_attendants_per_user() {
        let tables = tables();
        let directory = Directory::new(&tables);
        let blocks = NumberBlocks::default();

        let rows = attendants_per_user(&tables.auto_attendants, &directory, &blocks);
        let summary: Vec<_> = rows
            .iter()
            .map(|row| {
                (
                    row.user.name.as_str(),
                    row.attendant_extension.as_str(),
                    row.via.to_string(),
                    row.routes.join(", "),
                )
            })
            .collect();

        assert_eq!(
            summary,
            vec![
                (
                    "Alice",
                    "100",
                    "Queue: Sales (200)".to_string(),
                    "Default, Menu 2".to_string()
                ),
                (
                    "Bob",
                    "110",
                    "Ring group: Ring Group 300 (300)".to_string(),
                    "Default".to_string()
                ),
                ("Carol", "100", "Direct".to_string(), "Menu 1".to_string()),
            ]
        );
    }
}
