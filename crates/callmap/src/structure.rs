//! Flow-graph construction.
//!
//! This module turns configuration tables into call-flow [`Diagram`]s:
//!
//! - [`flow_groups`] partitions the auto-attendants into the groups that are
//!   drawn together (one per department, one per standalone attendant).
//! - [`flow_diagram`] expands the routes of a group's root attendants into a
//!   diagram, resolving every route target through a [`Directory`].
//!
//! [`Diagram`]: callmap_core::semantic::Diagram

mod flow;
mod graph_base;
mod grouping;

pub use grouping::{FlowGroup, GroupKey, flow_groups};

use callmap_core::semantic::Diagram;

use crate::{config::Palette, resolve::Directory};

/// Builds the call-flow diagram of one flow group.
///
/// Routes out of a root attendant are at depth 1; any route deeper than
/// `max_depth` ends in a "Max depth reached" leaf.
pub fn flow_diagram<'a>(
    group: &FlowGroup<'a>,
    directory: &Directory<'a>,
    palette: &Palette,
    max_depth: usize,
) -> Diagram {
    flow::FlowBuilder::new(directory, palette, max_depth).build(group)
}
