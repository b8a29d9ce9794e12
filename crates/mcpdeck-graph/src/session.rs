use tracing::debug;

use crate::graph::{GraphDiff, WorkflowGraph};

/// Handle for one in-flight rebuild
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Current graph of an open editor plus the bookkeeping for overlapping rebuilds
///
/// Rebuilds may complete out of order. Only a result for a ticket newer than
/// the last applied one replaces the graph; older results are dropped.
#[derive(Debug, Clone, Default)]
pub struct WorkflowSession {
    graph: WorkflowGraph,
    issued: u64,
    applied: u64,
    selected: Option<String>,
}

impl WorkflowSession {
    pub fn new(graph: WorkflowGraph) -> Self {
        Self {
            graph,
            ..Self::default()
        }
    }

    pub fn graph(&self) -> &WorkflowGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut WorkflowGraph {
        &mut self.graph
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Select a node; unknown ids clear the selection
    pub fn select(&mut self, node_id: Option<&str>) {
        self.selected = node_id
            .filter(|id| self.graph.node(id).is_some())
            .map(str::to_string);
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.issued += 1;
        RefreshTicket(self.issued)
    }

    /// Install a rebuilt graph; `None` if a newer refresh already landed
    pub fn complete_refresh(&mut self, ticket: RefreshTicket, graph: WorkflowGraph) -> Option<GraphDiff> {
        if ticket.0 <= self.applied {
            debug!(
                ticket = ticket.0,
                applied = self.applied,
                "Dropping stale workflow refresh"
            );
            return None;
        }

        let diff = self.graph.diff(&graph);
        self.graph = graph;
        self.applied = ticket.0;

        if let Some(selected) = &self.selected {
            if self.graph.node(selected).is_none() {
                debug!(node_id = %selected, "Selected node no longer exists");
                self.selected = None;
            }
        }

        Some(diff)
    }
}
