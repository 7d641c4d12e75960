//! Graphviz DOT export.
//!
//! Diagrams are converted to `dot_structures` values and printed with the
//! `graphviz-rust` printer; no Graphviz installation is needed to produce
//! the text.

use dot_structures::{
    Attribute, Edge as DotEdge, EdgeTy, Graph, GraphAttributes, Id as DotId, Node as DotNode,
    NodeId, Stmt, Vertex,
};
use graphviz_rust::printer::{DotPrinter, PrinterContext};
use log::debug;

use callmap_core::{
    draw::EdgeStyle,
    identifier::Id,
    semantic::{Diagram, Edge, Node},
};

use crate::config::StyleConfig;

/// Renders a diagram as a DOT `digraph`.
///
/// Nodes are rounded and filled with their fill color; cycle edges keep
/// their dashed style.
pub fn render_dot(diagram: &Diagram, style: &StyleConfig) -> String {
    let mut stmts = vec![
        Stmt::GAttribute(GraphAttributes::Graph(vec![
            attr("rankdir", plain(style.rankdir())),
            attr("label", quoted(diagram.title())),
            attr("labelloc", plain("t")),
        ])),
        Stmt::GAttribute(GraphAttributes::Node(vec![
            attr("shape", plain("box")),
            attr("style", quoted("rounded,filled")),
            attr("fontname", quoted(style.font_name())),
            attr("fontsize", plain(&style.node_font_size().to_string())),
        ])),
        Stmt::GAttribute(GraphAttributes::Edge(vec![
            attr("fontname", quoted(style.font_name())),
            attr("fontsize", plain(&style.edge_font_size().to_string())),
        ])),
    ];
    stmts.extend(diagram.nodes().iter().map(node_stmt));
    stmts.extend(diagram.edges().iter().map(edge_stmt));

    let graph = Graph::DiGraph {
        id: node_name(diagram.id()),
        strict: false,
        stmts,
    };
    let text = graph.print(&mut PrinterContext::default());

    debug!(
        diagram = diagram.id().to_string(),
        bytes = text.len();
        "Rendered DOT"
    );
    text
}

fn node_stmt(node: &Node) -> Stmt {
    Stmt::Node(DotNode::new(
        NodeId(node_name(node.id()), None),
        vec![
            attr("label", quoted(node.label())),
            attr("shape", plain(node.shape().as_dot_str())),
            attr("fillcolor", quoted(&node.fill().to_hex())),
        ],
    ))
}

fn edge_stmt(edge: &Edge) -> Stmt {
    let mut attributes = Vec::new();
    if let Some(label) = edge.label() {
        attributes.push(attr("label", quoted(label)));
    }
    if edge.style() != EdgeStyle::Solid {
        attributes.push(attr("style", plain(edge.style().as_dot_str())));
    }

    Stmt::Edge(DotEdge {
        ty: EdgeTy::Pair(
            Vertex::N(NodeId(node_name(edge.source()), None)),
            Vertex::N(NodeId(node_name(edge.target()), None)),
        ),
        attributes,
    })
}

fn attr(key: &str, value: DotId) -> Attribute {
    Attribute(plain(key), value)
}

fn plain(value: &str) -> DotId {
    DotId::Plain(value.to_string())
}

fn node_name(id: Id) -> DotId {
    quoted(&id.to_string())
}

/// Double-quoted DOT string; line breaks become `\n` escapes.
fn quoted(value: &str) -> DotId {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('"');
    for c in value.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            c => escaped.push(c),
        }
    }
    escaped.push('"');
    DotId::Escaped(escaped)
}
