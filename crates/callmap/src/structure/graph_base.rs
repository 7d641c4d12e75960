//! Low-level graph storage for flow diagrams.
//!
//! This module provides [`FlowGraph`], the mutable graph a flow builder
//! writes into before it is frozen into a [`Diagram`].
//!
//! Capabilities:
//! - Node storage by ID in insertion order; the first write of an ID wins
//! - Edge storage in insertion order, deduplicated by source, target and label
//!
//! Insertion order is kept everywhere so that identical tables always
//! produce identical diagrams.

use indexmap::{IndexMap, IndexSet};

use callmap_core::{
    draw::EdgeStyle,
    identifier::Id,
    semantic::{Diagram, Edge, Node},
};

/// Key deduplicating edges. The edge style is not part of it.
type EdgeKey = (Id, Id, Option<String>);

/// Mutable flow graph under construction.
#[derive(Debug, Default)]
pub(super) struct FlowGraph {
    nodes: IndexMap<Id, Node>,
    edges: Vec<Edge>,
    edge_keys: IndexSet<EdgeKey>,
}

impl FlowGraph {
    /// Creates a new empty graph.
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Checks if a node with the given ID exists in the graph.
    pub(super) fn contains_node(&self, id: Id) -> bool {
        self.nodes.contains_key(&id)
    }

    pub(super) fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub(super) fn edges_count(&self) -> usize {
        self.edges.len()
    }

    /// Adds a node unless one with the same ID exists.
    ///
    /// # Returns
    /// `true` if the node was inserted, `false` if an earlier node with the
    /// same ID was kept.
    pub(super) fn add_node(&mut self, node: Node) -> bool {
        let id = node.id();
        if self.nodes.contains_key(&id) {
            return false;
        }
        self.nodes.insert(id, node);
        true
    }

    /// Adds a directed edge between two existing nodes.
    ///
    /// # Returns
    /// `true` if the edge was added, `false` if an edge with the same source,
    /// target and label already exists.
    ///
    /// # Panics
    /// Panics in debug mode if either the source or target node does not exist in the graph.
    /// This panic is for internal developer testing and bug detection. In a release build,
    /// this check is optimized away.
    pub(super) fn add_edge(
        &mut self,
        source: Id,
        target: Id,
        label: Option<&str>,
        style: EdgeStyle,
    ) -> bool {
        #[cfg(debug_assertions)]
        {
            assert!(
                self.nodes.contains_key(&source),
                "Adding edge: Source node {source} does not exist for {label:?}",
            );
            assert!(
                self.nodes.contains_key(&target),
                "Adding edge: Target node {target} does not exist for {label:?}",
            );
        }

        let label = label.map(str::to_string);
        if !self.edge_keys.insert((source, target, label.clone())) {
            return false;
        }
        self.edges.push(Edge::new(source, target, label, style));
        true
    }

    /// Freezes the graph into a diagram.
    pub(super) fn into_diagram(self, id: Id, title: impl Into<String>) -> Diagram {
        Diagram::new(id, title, self.nodes.into_values().collect(), self.edges)
    }
}
