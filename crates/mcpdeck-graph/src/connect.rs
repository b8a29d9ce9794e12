use std::collections::BTreeSet;

use mcpdeck_types::{AuthKind, Tool};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::edge::{EdgeType, SOURCE_HANDLE, TARGET_HANDLE};
use crate::error::{ConnectError, GraphError};
use crate::graph::WorkflowGraph;
use crate::node::NodeData;

/// Connection drawn by the user on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub source_handle: Option<String>,
    #[serde(default)]
    pub target_handle: Option<String>,
}

impl Connection {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
        }
    }

    pub fn with_handles(mut self, source_handle: &str, target_handle: &str) -> Self {
        self.source_handle = Some(source_handle.to_string());
        self.target_handle = Some(target_handle.to_string());
        self
    }
}

/// A change to one auth slot of one tool, to be persisted upstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthLinkChange {
    pub tool_id: String,
    pub kind: AuthKind,
    /// `None` clears the slot
    pub provider_id: Option<String>,
}

impl AuthLinkChange {
    pub fn link(tool_id: &str, kind: AuthKind, provider_id: &str) -> Self {
        Self {
            tool_id: tool_id.to_string(),
            kind,
            provider_id: Some(provider_id.to_string()),
        }
    }

    pub fn unlink(tool_id: &str, kind: AuthKind) -> Self {
        Self {
            tool_id: tool_id.to_string(),
            kind,
            provider_id: None,
        }
    }

    /// Body of the tool update request, e.g. `{"oAuthProviderId": null}`
    pub fn to_patch(&self) -> Value {
        let mut patch = serde_json::Map::new();
        patch.insert(self.kind.tool_field().to_string(), json!(self.provider_id));
        Value::Object(patch)
    }

    /// Apply the change to a local tool list; returns false if the tool is unknown
    pub fn apply_to(&self, tools: &mut [Tool]) -> bool {
        match tools.iter_mut().find(|t| t.id == self.tool_id) {
            Some(tool) => {
                tool.set_provider(self.kind, self.provider_id.clone());
                true
            }
            None => false,
        }
    }
}

/// Auth node deletion that needs confirmation before anything is removed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRemoval {
    pub node_id: String,
    pub provider_id: String,
    pub kind: AuthKind,
    pub unlink: Vec<AuthLinkChange>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePlan {
    /// Nodes that can be dropped right away
    pub remove: Vec<String>,
    pub confirm: Vec<AuthRemoval>,
}

impl DeletePlan {
    pub fn requires_confirmation(&self) -> bool {
        !self.confirm.is_empty()
    }

    /// Every unlink across all confirmations, one per tool slot
    pub fn unlinks(&self) -> Vec<AuthLinkChange> {
        let mut seen = BTreeSet::new();
        self.confirm
            .iter()
            .flat_map(|removal| removal.unlink.iter())
            .filter(|change| seen.insert((change.tool_id.clone(), change.kind)))
            .cloned()
            .collect()
    }
}

impl WorkflowGraph {
    /// Validate a tool to auth-provider connection
    ///
    /// Only a tool's `source` handle may connect to an auth provider's `target`
    /// handle, and only while the tool's slot for that provider kind is empty.
    pub fn plan_connect(&self, connection: &Connection) -> Result<AuthLinkChange, ConnectError> {
        let source = self
            .node(&connection.source)
            .ok_or_else(|| ConnectError::UnknownNode(connection.source.clone()))?;
        let target = self
            .node(&connection.target)
            .ok_or_else(|| ConnectError::UnknownNode(connection.target.clone()))?;

        let tool = source
            .as_tool()
            .ok_or_else(|| ConnectError::InvalidSource(source.id.clone()))?;
        let provider = target
            .as_auth_provider()
            .ok_or_else(|| ConnectError::InvalidTarget(target.id.clone()))?;

        if let Some(handle) = connection.source_handle.as_deref() {
            if handle != SOURCE_HANDLE {
                return Err(ConnectError::InvalidHandle(handle.to_string()));
            }
        }
        if let Some(handle) = connection.target_handle.as_deref() {
            if handle != TARGET_HANDLE {
                return Err(ConnectError::InvalidHandle(handle.to_string()));
            }
        }

        if tool.provider_for(provider.kind).is_some() {
            return Err(ConnectError::SlotOccupied {
                tool_id: tool.tool_id.clone(),
                kind: provider.kind,
            });
        }

        debug!(
            tool_id = %tool.tool_id,
            provider_id = %provider.provider_id,
            kind = provider.kind.label(),
            "Planned auth link"
        );

        Ok(AuthLinkChange::link(&tool.tool_id, provider.kind, &provider.provider_id))
    }

    /// Split a deletion into nodes removable now and auth nodes needing confirmation
    ///
    /// Each auth removal clears the provider from every tool in the graph that
    /// references it, not just the tool the node is drawn next to.
    pub fn plan_delete<S: AsRef<str>>(&self, node_ids: &[S]) -> DeletePlan {
        let mut plan = DeletePlan::default();

        for node_id in node_ids {
            let node_id = node_id.as_ref();
            let Some(node) = self.node(node_id) else {
                debug!(node_id, "Ignoring delete of unknown node");
                continue;
            };

            match &node.data {
                NodeData::AuthProvider(auth) => {
                    let unlink = self
                        .nodes
                        .iter()
                        .filter_map(|n| n.as_tool())
                        .filter(|tool| tool.provider_for(auth.kind) == Some(auth.provider_id.as_str()))
                        .map(|tool| AuthLinkChange::unlink(&tool.tool_id, auth.kind))
                        .collect();

                    plan.confirm.push(AuthRemoval {
                        node_id: node.id.clone(),
                        provider_id: auth.provider_id.clone(),
                        kind: auth.kind,
                        unlink,
                    });
                }
                _ => plan.remove.push(node.id.clone()),
            }
        }

        plan
    }

    /// Unlink for a deleted tool to auth-provider edge
    ///
    /// Only `deletable` edges carry a link; other edges yield `None`.
    pub fn plan_edge_delete(&self, edge_id: &str) -> Result<Option<AuthLinkChange>, GraphError> {
        let edge = self
            .edge(edge_id)
            .ok_or_else(|| GraphError::EdgeNotFound(edge_id.to_string()))?;

        if edge.edge_type != Some(EdgeType::Deletable) {
            return Ok(None);
        }

        let tool = self.node(&edge.source).and_then(|n| n.as_tool());
        let auth = self.node(&edge.target).and_then(|n| n.as_auth_provider());

        Ok(match (tool, auth) {
            (Some(tool), Some(auth)) => Some(AuthLinkChange::unlink(&tool.tool_id, auth.kind)),
            _ => None,
        })
    }
}
