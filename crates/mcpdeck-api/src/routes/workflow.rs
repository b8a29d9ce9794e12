use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use mcpdeck_graph::{Connection, DeletePlan, NodeData, WorkflowGraph};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequest {
    pub node_ids: Vec<String>,
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub requires_confirmation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<DeletePlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph: Option<WorkflowGraph>,
}

/// Current workflow graph of a server
pub async fn get_workflow(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(server_id): Path<String>,
) -> ApiResult<Json<WorkflowGraph>> {
    let inputs = state.admin_for(&headers).load_workflow(&server_id).await?;
    Ok(Json(inputs.build()))
}

/// Link an auth provider to a tool and return the rebuilt graph
pub async fn connect(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(server_id): Path<String>,
    Json(connection): Json<Connection>,
) -> ApiResult<Json<WorkflowGraph>> {
    let admin = state.admin_for(&headers);
    let inputs = admin.load_workflow(&server_id).await?;

    let mut graph = inputs.build();
    inputs.add_palette_node(&mut graph, &connection.target);

    let change = graph.plan_connect(&connection)?;
    admin.apply_link(&change).await?;

    tracing::info!(
        server_id = %server_id,
        tool_id = %change.tool_id,
        kind = change.kind.label(),
        "Auth provider linked"
    );

    let inputs = admin.load_workflow(&server_id).await?;
    Ok(Json(inputs.build()))
}

/// Delete nodes, asking for confirmation before unlinking auth providers
pub async fn delete_nodes(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(server_id): Path<String>,
    Json(req): Json<DeleteRequest>,
) -> ApiResult<Json<DeleteResponse>> {
    if req.node_ids.is_empty() {
        return Err(ApiError::BadRequest("nodeIds must not be empty".to_string()));
    }

    let admin = state.admin_for(&headers);
    let graph = admin.load_workflow(&server_id).await?.build();
    let plan = graph.plan_delete(&req.node_ids);

    if plan.requires_confirmation() && !req.confirmed {
        return Ok(Json(DeleteResponse {
            requires_confirmation: true,
            plan: Some(plan),
            graph: None,
        }));
    }

    for change in plan.unlinks() {
        admin.apply_link(&change).await?;
    }
    if !plan.confirm.is_empty() {
        tracing::info!(
            server_id = %server_id,
            providers = plan.confirm.len(),
            "Auth providers unlinked"
        );
    }

    let mut graph = admin.load_workflow(&server_id).await?.build();
    graph.remove_nodes(&plan.remove);

    Ok(Json(DeleteResponse {
        requires_confirmation: false,
        plan: None,
        graph: Some(graph),
    }))
}

/// Patch one node's data; `enabled` on a tool node is persisted upstream
pub async fn patch_node(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((server_id, node_id)): Path<(String, String)>,
    Json(patch): Json<Value>,
) -> ApiResult<Json<WorkflowGraph>> {
    let admin = state.admin_for(&headers);
    let mut graph = admin.load_workflow(&server_id).await?.build();

    graph.update_node_data(&node_id, &patch)?;

    let enabled = patch.get("enabled").and_then(Value::as_bool);
    if let (Some(enabled), Some(node)) = (enabled, graph.node(&node_id)) {
        if let NodeData::Tool(tool) = &node.data {
            admin.set_tool_enabled(&tool.tool_id, enabled).await?;
        }
    }

    Ok(Json(graph))
}
