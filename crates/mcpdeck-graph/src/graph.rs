use std::collections::BTreeSet;

use mcpdeck_types::AuthKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{GraphError, Result};
use crate::layout::Position;
use crate::edge::WorkflowEdge;
use crate::node::{AuthProviderNodeData, NodeData, NodeType, WorkflowNode};

/// Nodes and edges ready for a canvas renderer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowGraph {
    pub nodes: Vec<WorkflowNode>,
    pub edges: Vec<WorkflowEdge>,
}

/// Id-level difference between two graphs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDiff {
    pub added_nodes: Vec<String>,
    pub removed_nodes: Vec<String>,
    pub added_edges: Vec<String>,
    pub removed_edges: Vec<String>,
}

impl GraphDiff {
    pub fn is_empty(&self) -> bool {
        self.added_nodes.is_empty()
            && self.removed_nodes.is_empty()
            && self.added_edges.is_empty()
            && self.removed_edges.is_empty()
    }
}

impl WorkflowGraph {
    pub fn new(nodes: Vec<WorkflowNode>, edges: Vec<WorkflowEdge>) -> Self {
        Self { nodes, edges }
    }

    pub fn node(&self, node_id: &str) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    pub fn edge(&self, edge_id: &str) -> Option<&WorkflowEdge> {
        self.edges.iter().find(|e| e.id == edge_id)
    }

    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    pub fn edge_ids(&self) -> Vec<&str> {
        self.edges.iter().map(|e| e.id.as_str()).collect()
    }

    pub fn nodes_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &WorkflowNode> {
        self.nodes.iter().filter(move |n| n.node_type() == node_type)
    }

    /// Merge a JSON object into a node's data, keeping its id, type and position
    ///
    /// `null` members remove optional fields. A boolean `enabled` member also
    /// recolors every edge pointing at the node.
    pub fn update_node_data(&mut self, node_id: &str, patch: &Value) -> Result<()> {
        let invalid = |reason: String| GraphError::InvalidPatch {
            node_id: node_id.to_string(),
            reason,
        };

        if !patch.is_object() {
            return Err(invalid("patch must be a JSON object".to_string()));
        }

        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == node_id)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.to_string()))?;

        let mut tagged = serde_json::to_value(&node.data).map_err(|e| invalid(e.to_string()))?;
        match tagged.get_mut("data") {
            Some(data) => merge_patch(data, patch),
            None => return Err(invalid("node has no data payload".to_string())),
        }
        node.data = serde_json::from_value(tagged).map_err(|e| invalid(e.to_string()))?;

        if let Some(enabled) = patch.get("enabled").and_then(Value::as_bool) {
            let mut recolored = 0;
            for edge in self.edges.iter_mut().filter(|e| e.target == node_id) {
                edge.set_status(enabled);
                recolored += 1;
            }
            debug!(node_id, enabled, recolored, "Recolored incoming edges");
        }

        Ok(())
    }

    /// Drop nodes and every edge touching them
    pub fn remove_nodes<S: AsRef<str>>(&mut self, node_ids: &[S]) {
        let ids: BTreeSet<&str> = node_ids.iter().map(|id| id.as_ref()).collect();
        self.nodes.retain(|n| !ids.contains(n.id.as_str()));
        self.edges
            .retain(|e| !ids.contains(e.source.as_str()) && !ids.contains(e.target.as_str()));
    }

    /// Insert an unattached auth node, to be connected to a tool afterwards
    pub fn add_auth_provider_node(
        &mut self,
        kind: AuthKind,
        provider_id: &str,
        name: &str,
        has_client_id: bool,
        position: Position,
    ) -> Result<&WorkflowNode> {
        let id = NodeType::AuthProvider.node_id(provider_id);
        if self.node(&id).is_some() {
            return Err(GraphError::DuplicateNode(id));
        }

        self.nodes.push(WorkflowNode::new(
            id,
            position,
            NodeData::AuthProvider(AuthProviderNodeData {
                provider_id: provider_id.to_string(),
                tool_id: None,
                kind,
                name: name.to_string(),
                has_client_id,
            }),
        ));

        let index = self.nodes.len() - 1;
        Ok(&self.nodes[index])
    }

    /// What changed going from `self` to `next`
    pub fn diff(&self, next: &WorkflowGraph) -> GraphDiff {
        let old_nodes: BTreeSet<&str> = self.node_ids().into_iter().collect();
        let new_nodes: BTreeSet<&str> = next.node_ids().into_iter().collect();
        let old_edges: BTreeSet<&str> = self.edge_ids().into_iter().collect();
        let new_edges: BTreeSet<&str> = next.edge_ids().into_iter().collect();

        GraphDiff {
            added_nodes: difference(&new_nodes, &old_nodes),
            removed_nodes: difference(&old_nodes, &new_nodes),
            added_edges: difference(&new_edges, &old_edges),
            removed_edges: difference(&old_edges, &new_edges),
        }
    }
}

fn difference(left: &BTreeSet<&str>, right: &BTreeSet<&str>) -> Vec<String> {
    left.difference(right).map(|id| id.to_string()).collect()
}

/// JSON merge patch: objects merge recursively, `null` deletes, anything else replaces
fn merge_patch(target: &mut Value, patch: &Value) {
    let Value::Object(patch_map) = patch else {
        *target = patch.clone();
        return;
    };

    if !target.is_object() {
        *target = Value::Object(serde_json::Map::new());
    }

    if let Value::Object(target_map) = target {
        for (key, value) in patch_map {
            if value.is_null() {
                target_map.remove(key);
            } else {
                merge_patch(target_map.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
    }
}
