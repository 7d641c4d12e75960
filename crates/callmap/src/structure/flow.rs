//! Call-flow diagram construction.
//!
//! [`FlowBuilder`] expands the routes of a flow group's root attendants into
//! a [`FlowGraph`]. Every root gets the fixed time-check topology:
//!
//! ```text
//! Start -> Within office hours? --No--> closed route
//!                 |Yes
//!          Break active? --Yes--> break route
//!                 |No
//!          Holiday active? --Yes--> holiday route
//!                 |No
//!          Menu playing... / No menu --Choose N / Timeout / Invalid / Direct--> ...
//! ```
//!
//! Route targets are expanded with an explicit worklist. Each pending step
//! carries its own copy of the path of `(source, kind, identifier)` keys that
//! led to it, so cycle detection is scoped to a step's ancestry and sibling
//! branches never see each other's visits. A step deeper than the configured
//! maximum ends in a "Max depth reached" leaf.
//!
//! Path-scoped cycle keys let densely interlinked attendants revisit the same
//! targets along every distinct path, so the step count can grow
//! exponentially with the depth. A diagram therefore draws at most
//! [`MAX_STEPS`] steps; whatever is still pending then ends in a
//! "Max depth reached" leaf.

use log::{debug, trace, warn};

use callmap_core::{
    draw::EdgeStyle,
    identifier::Id,
    model::{AutoAttendant, normalize_extension},
    semantic::{Diagram, DestinationKind, Node, VisualKind},
};
use callmap_parser::parse_destination;

use super::{FlowGroup, GroupKey, graph_base::FlowGraph};
use crate::{
    config::Palette,
    resolve::{Directory, Entity},
};

const NO_ROUTE_LABEL: &str = "Hang up (no route)";
const MAX_DEPTH_LABEL: &str = "Max depth reached";

/// Upper bound on the route targets drawn for one diagram.
pub(crate) const MAX_STEPS: usize = 10_000;

/// A route target already expanded on the current path.
type PathKey = (Id, DestinationKind, String);

/// A route target waiting to be drawn.
#[derive(Debug)]
struct Step<'a> {
    source: Id,
    label: String,
    route: Option<&'a str>,
    depth: usize,
    path: Vec<PathKey>,
}

impl<'a> Step<'a> {
    fn new(
        source: Id,
        label: impl Into<String>,
        route: Option<&'a str>,
        depth: usize,
        path: &[PathKey],
    ) -> Self {
        Self {
            source,
            label: label.into(),
            route,
            depth,
            path: path.to_vec(),
        }
    }
}

/// Builds the diagram of one flow group.
pub(crate) struct FlowBuilder<'a, 'd> {
    directory: &'d Directory<'a>,
    palette: &'d Palette,
    max_depth: usize,
    context: String,
    graph: FlowGraph,
}

impl<'a, 'd> FlowBuilder<'a, 'd> {
    pub(crate) fn new(
        directory: &'d Directory<'a>,
        palette: &'d Palette,
        max_depth: usize,
    ) -> Self {
        Self {
            directory,
            palette,
            max_depth,
            context: String::new(),
            graph: FlowGraph::new(),
        }
    }

    /// Draws every root attendant of `group` and returns the diagram.
    pub(crate) fn build(mut self, group: &FlowGroup<'a>) -> Diagram {
        self.context = group.key().value().to_string();

        let department = match group.key() {
            GroupKey::Department(name) => {
                let id = Id::from_parts(&["DEPT", name]);
                self.add_node(id, VisualKind::Department, name.clone());
                Some(id)
            }
            GroupKey::Standalone(_) => None,
        };

        for attendant in group.roots() {
            let Some(start) = self.draw_root(attendant) else {
                continue;
            };
            if let Some(department) = department {
                self.graph.add_edge(department, start, None, EdgeStyle::Dotted);
            }
        }

        debug!(
            group = group.name(),
            nodes = self.graph.nodes_count(),
            edges = self.graph.edges_count();
            "Built flow diagram"
        );

        let id = Id::from_parts(&["flow", group.key().tag(), group.key().value()]);
        self.graph.into_diagram(id, group.name())
    }

    /// Draws the time-check topology of a root attendant and expands its
    /// routes. Returns the start node.
    fn draw_root(&mut self, attendant: &'a AutoAttendant) -> Option<Id> {
        let extension = attendant.extension.as_deref().and_then(normalize_extension)?;

        let resolved = self
            .directory
            .resolve(Some(&extension), DestinationKind::AutoAttendant);
        let start = self.destination_id(resolved.visual(), &extension);
        self.add_node(start, resolved.visual(), resolved.label());

        let office = self.check_node("OFFICECHECK", &extension, "Within office hours?");
        let on_break = self.check_node("BREAKCHECK", &extension, "Break active?");
        let holiday = self.check_node("HOLIDAYCHECK", &extension, "Holiday active?");
        let in_hours = Id::from_parts(&["INHOURS", &extension, &self.context]);
        let in_hours_label = if attendant.has_menu() {
            "Menu playing..."
        } else {
            "No menu"
        };
        self.add_node(in_hours, VisualKind::InHours, in_hours_label);

        self.add_edge(start, office, None);
        self.add_edge(office, on_break, Some("Yes"));
        self.add_edge(on_break, holiday, Some("No"));
        self.add_edge(holiday, in_hours, Some("No"));

        let mut steps = vec![
            Step::new(office, "No", attendant.office_closed.as_deref(), 1, &[]),
            Step::new(on_break, "Yes", attendant.on_break.as_deref(), 1, &[]),
        ];
        let holiday_route = attendant.on_holiday.as_deref();
        if holiday_route.and_then(parse_destination).is_some() {
            steps.push(Step::new(holiday, "Yes", holiday_route, 1, &[]));
        } else {
            self.add_edge(holiday, in_hours, Some("Yes (no route)"));
        }
        steps.extend(input_steps(attendant, in_hours, 1, &[]));

        self.run(steps);
        Some(start)
    }

    /// Drains the worklist in depth-first order, expanding steps in the
    /// order they were scheduled.
    fn run(&mut self, initial: Vec<Step<'a>>) {
        let mut stack: Vec<Step<'a>> = initial.into_iter().rev().collect();
        let mut drawn = 0;
        while let Some(step) = stack.pop() {
            if drawn == MAX_STEPS {
                warn!(
                    diagram = self.context.as_str(),
                    pending = stack.len() + 1;
                    "Step limit reached, truncating diagram"
                );
                self.draw_max_depth(step.source, &step.label);
                for step in stack.drain(..) {
                    self.draw_max_depth(step.source, &step.label);
                }
                break;
            }
            drawn += 1;
            let children = self.draw_destination(step);
            stack.extend(children.into_iter().rev());
        }
    }

    /// Draws one route target and returns the steps it leads to.
    fn draw_destination(&mut self, step: Step<'a>) -> Vec<Step<'a>> {
        let Step {
            source,
            label,
            route,
            depth,
            mut path,
        } = step;

        let Some(destination) = route.and_then(parse_destination) else {
            let leaf = self.leaf_id("END", source, &label);
            self.add_node(leaf, VisualKind::EndCall, NO_ROUTE_LABEL);
            self.add_edge(source, leaf, Some(&label));
            return Vec::new();
        };

        if depth > self.max_depth {
            trace!(
                source = source.to_string(),
                label = label.as_str(),
                depth = depth;
                "Max depth reached"
            );
            self.draw_max_depth(source, &label);
            return Vec::new();
        }

        let resolved = self.directory.resolve_destination(&destination);
        let target = self.destination_id(resolved.visual(), destination.identifier());
        self.add_node(target, resolved.visual(), resolved.label());

        let key = (source, destination.kind(), destination.identifier().to_string());
        if path.contains(&key) {
            trace!(source = source.to_string(), target = target.to_string(); "Cycle detected");
            self.graph.add_edge(
                source,
                target,
                Some(&format!("{label} (cycle)")),
                EdgeStyle::Dashed,
            );
            return Vec::new();
        }

        self.add_edge(source, target, Some(&label));
        path.push(key);

        let next = depth + 1;
        match resolved.entity() {
            Some(Entity::Queue(queue)) => vec![Step::new(
                target,
                "No Answer",
                queue.no_answer.as_deref(),
                next,
                &path,
            )],
            Some(Entity::RingGroup(group)) => vec![Step::new(
                target,
                "No Answer",
                group.no_answer.as_deref(),
                next,
                &path,
            )],
            Some(Entity::AutoAttendant(attendant)) => nested_steps(attendant, target, next, &path),
            _ => Vec::new(),
        }
    }

    fn draw_max_depth(&mut self, source: Id, label: &str) {
        let leaf = self.leaf_id("MAXDEPTH", source, label);
        self.add_node(leaf, VisualKind::MaxDepth, MAX_DEPTH_LABEL);
        self.add_edge(source, leaf, Some(label));
    }

    fn destination_id(&self, visual: VisualKind, identifier: &str) -> Id {
        Id::from_parts(&["DEST", &format!("{visual:?}"), identifier, &self.context])
    }

    fn leaf_id(&self, prefix: &str, source: Id, label: &str) -> Id {
        Id::from_parts(&[prefix, &source.to_string(), label, &self.context])
    }

    fn check_node(&mut self, prefix: &str, extension: &str, label: &str) -> Id {
        let id = Id::from_parts(&[prefix, extension, &self.context]);
        self.add_node(id, VisualKind::Check, label);
        id
    }

    fn add_node(&mut self, id: Id, kind: VisualKind, label: impl Into<String>) {
        let node = Node::new(id, kind, label).with_fill(self.palette.fill(kind));
        self.graph.add_node(node);
    }

    fn add_edge(&mut self, source: Id, target: Id, label: Option<&str>) {
        self.graph.add_edge(source, target, label, EdgeStyle::Solid);
    }
}

/// Branches of an attendant reached through another route: configured
/// time-based branches first, then the input branches.
fn nested_steps<'a>(
    attendant: &'a AutoAttendant,
    node: Id,
    depth: usize,
    path: &[PathKey],
) -> Vec<Step<'a>> {
    let time_based = [
        ("Closed", attendant.office_closed.as_deref()),
        ("Break", attendant.on_break.as_deref()),
        ("Holiday", attendant.on_holiday.as_deref()),
    ];
    time_based
        .into_iter()
        .filter(|(_, route)| route.is_some())
        .map(|(label, route)| Step::new(node, label, route, depth, path))
        .chain(input_steps(attendant, node, depth, path))
        .collect()
}

/// Menu choices with timeout and invalid-input fallbacks, or a single
/// direct route when the attendant plays no menu.
fn input_steps<'a>(
    attendant: &'a AutoAttendant,
    node: Id,
    depth: usize,
    path: &[PathKey],
) -> Vec<Step<'a>> {
    let default_route = attendant.default_route.as_deref();
    if !attendant.has_menu() {
        return vec![Step::new(node, "Direct", default_route, depth, path)];
    }

    let mut steps: Vec<_> = attendant
        .menu_options()
        .map(|(slot, route)| Step::new(node, format!("Choose {slot}"), Some(route), depth, path))
        .collect();
    steps.push(Step::new(
        node,
        timeout_label(attendant.timeout.as_deref()),
        default_route,
        depth,
        path,
    ));
    let invalid_route = attendant.invalid_input.as_deref();
    if invalid_route.is_some() && invalid_route != default_route {
        steps.push(Step::new(node, "Invalid", invalid_route, depth, path));
    }
    steps
}

fn timeout_label(timeout: Option<&str>) -> String {
    match timeout {
        Some(seconds) => format!("Timeout ({seconds}s) /\nNo input"),
        None => "Timeout /\nNo input".to_string(),
    }
}
