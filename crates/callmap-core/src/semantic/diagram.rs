//! Flow graph value types.
//!
//! A [`Diagram`] is the hand-off format between the flow builder and any
//! rendering backend: an ordered list of nodes carrying a label plus shape
//! and fill hints, and an ordered list of labeled edges between node ids.
//! Order is insertion order, so identical inputs render identically.

use std::{fmt, str::FromStr};

use crate::{
    color::Color,
    draw::{EdgeStyle, NodeShape},
    identifier::Id,
};

/// What a flow-graph node stands for.
///
/// The first group mirrors the resolver's outcomes for a route target; the
/// second group holds the structural nodes a flow diagram adds around them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VisualKind {
    ConfigError,
    EndCall,
    Repeat,
    External,
    Accept,
    Text,
    Queue,
    RingGroup,
    User,
    AutoAttendant,
    Voicemail,
    Unknown,
    Department,
    Check,
    InHours,
    MaxDepth,
}

impl VisualKind {
    /// Every kind, in declaration order.
    pub const ALL: [VisualKind; 16] = [
        Self::ConfigError,
        Self::EndCall,
        Self::Repeat,
        Self::External,
        Self::Accept,
        Self::Text,
        Self::Queue,
        Self::RingGroup,
        Self::User,
        Self::AutoAttendant,
        Self::Voicemail,
        Self::Unknown,
        Self::Department,
        Self::Check,
        Self::InHours,
        Self::MaxDepth,
    ];

    /// Configuration key of this kind, e.g. `ring_group`.
    pub fn key(self) -> &'static str {
        match self {
            Self::ConfigError => "config_error",
            Self::EndCall => "end_call",
            Self::Repeat => "repeat",
            Self::External => "external",
            Self::Accept => "accept",
            Self::Text => "text",
            Self::Queue => "queue",
            Self::RingGroup => "ring_group",
            Self::User => "user",
            Self::AutoAttendant => "auto_attendant",
            Self::Voicemail => "voicemail",
            Self::Unknown => "unknown",
            Self::Department => "department",
            Self::Check => "check",
            Self::InHours => "in_hours",
            Self::MaxDepth => "max_depth",
        }
    }

    pub fn default_shape(self) -> NodeShape {
        match self {
            Self::EndCall => NodeShape::Octagon,
            Self::Repeat => NodeShape::InvHouse,
            Self::External => NodeShape::Note,
            Self::Accept => NodeShape::RArrow,
            Self::User | Self::InHours => NodeShape::Ellipse,
            Self::AutoAttendant => NodeShape::MDiamond,
            Self::Voicemail => NodeShape::Cylinder,
            Self::Department => NodeShape::Tab,
            Self::Check => NodeShape::Diamond,
            Self::MaxDepth => NodeShape::Plaintext,
            Self::ConfigError | Self::Text | Self::Queue | Self::RingGroup | Self::Unknown => {
                NodeShape::Box
            }
        }
    }

    /// CSS name of the default fill color.
    pub fn default_fill_name(self) -> &'static str {
        match self {
            Self::EndCall => "red",
            Self::Repeat => "orange",
            Self::External => "khaki",
            Self::Accept => "lightgreen",
            Self::Queue => "palegreen",
            Self::RingGroup => "lightskyblue",
            Self::User => "whitesmoke",
            Self::AutoAttendant => "lightcoral",
            Self::Voicemail => "mediumpurple",
            Self::Department => "lightsteelblue",
            Self::Check => "lightyellow",
            Self::MaxDepth => "white",
            Self::ConfigError | Self::Text | Self::Unknown | Self::InHours => "lightgray",
        }
    }

    pub fn default_fill(self) -> Color {
        Color::new(self.default_fill_name()).unwrap_or_default()
    }
}

impl FromStr for VisualKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key() == s)
            .ok_or_else(|| format!("unknown node kind `{s}`"))
    }
}

impl fmt::Display for VisualKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A flow-graph node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    id: Id,
    kind: VisualKind,
    label: String,
    shape: NodeShape,
    fill: Color,
}

impl Node {
    /// Creates a node with the kind's default shape and fill.
    pub fn new(id: Id, kind: VisualKind, label: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            label: label.into(),
            shape: kind.default_shape(),
            fill: kind.default_fill(),
        }
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = fill;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn kind(&self) -> VisualKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn shape(&self) -> NodeShape {
        self.shape
    }

    pub fn fill(&self) -> Color {
        self.fill
    }
}

/// A directed, optionally labeled flow-graph edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    source: Id,
    target: Id,
    label: Option<String>,
    style: EdgeStyle,
}

impl Edge {
    pub fn new(source: Id, target: Id, label: Option<String>, style: EdgeStyle) -> Self {
        Self {
            source,
            target,
            label,
            style,
        }
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn style(&self) -> EdgeStyle {
        self.style
    }
}

/// A complete call-flow diagram for one flow group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagram {
    id: Id,
    title: String,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Diagram {
    pub fn new(id: Id, title: impl Into<String>, nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self {
            id,
            title: title.into(),
            nodes,
            edges,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    /// Human-readable name of the flow group, e.g. `Department: Sales`.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Looks up a node by id.
    pub fn node(&self, id: Id) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Returns the nodes of the given kind in insertion order.
    pub fn nodes_of_kind(&self, kind: VisualKind) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |node| node.kind == kind)
    }

    /// Returns the edges leaving `source` in insertion order.
    pub fn edges_from(&self, source: Id) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |edge| edge.source == source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visual_kind_keys_round_trip() {
        for kind in VisualKind::ALL {
            assert_eq!(kind.key().parse::<VisualKind>(), Ok(kind));
        }
        assert!("lobby".parse::<VisualKind>().is_err());
    }

    #[test]
    fn test_default_styles() {
        assert_eq!(VisualKind::EndCall.default_shape(), NodeShape::Octagon);
        assert_eq!(VisualKind::EndCall.default_fill().to_hex(), "#ff0000");
        assert_eq!(VisualKind::AutoAttendant.default_shape(), NodeShape::MDiamond);
        assert_eq!(VisualKind::Queue.default_fill().to_hex(), "#98fb98");
    }

    #[test]
    fn test_default_fill_names_parse() {
        for kind in VisualKind::ALL {
            assert!(
                Color::new(kind.default_fill_name()).is_ok(),
                "{kind}: `{}` is not a color",
                kind.default_fill_name()
            );
        }
        assert_eq!(VisualKind::InHours.default_fill().to_hex(), "#d3d3d3");
    }

    #[test]
    fn test_diagram_lookup() {
        let start = Id::new("diagram_test_start");
        let end = Id::new("diagram_test_end");
        let diagram = Diagram::new(
            Id::new("diagram_test"),
            "Test",
            vec![
                Node::new(start, VisualKind::AutoAttendant, "IVR: Main\n(100)"),
                Node::new(end, VisualKind::EndCall, "Hang up"),
            ],
            vec![Edge::new(start, end, Some("Direct".to_string()), EdgeStyle::Solid)],
        );

        assert_eq!(diagram.node(end).map(Node::label), Some("Hang up"));
        assert_eq!(diagram.nodes_of_kind(VisualKind::EndCall).count(), 1);
        assert_eq!(diagram.edges_from(start).count(), 1);
        assert_eq!(diagram.edges_from(end).count(), 0);
    }
}
