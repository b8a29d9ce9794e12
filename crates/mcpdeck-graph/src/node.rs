use mcpdeck_types::{AuthKind, McpServer, Tool};
use serde::{Deserialize, Serialize};

use crate::layout::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeType {
    Llm,
    Server,
    Tool,
    AuthProvider,
    ApiEndpoint,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Llm => "llm",
            NodeType::Server => "server",
            NodeType::Tool => "tool",
            NodeType::AuthProvider => "auth-provider",
            NodeType::ApiEndpoint => "api-endpoint",
        }
    }

    /// Stable node id for the entity `source_id`
    pub fn node_id(&self, source_id: &str) -> String {
        format!("{}-{}", self.as_str(), source_id)
    }
}

/// Id of the auth node attached to one specific tool
pub fn tool_auth_node_id(tool_id: &str, provider_id: &str) -> String {
    format!("{}-{}-{}", NodeType::AuthProvider.as_str(), tool_id, provider_id)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowNode {
    pub id: String,
    pub position: Position,
    #[serde(flatten)]
    pub data: NodeData,
}

impl WorkflowNode {
    pub fn new(id: impl Into<String>, position: Position, data: NodeData) -> Self {
        Self {
            id: id.into(),
            position,
            data,
        }
    }

    pub fn node_type(&self) -> NodeType {
        self.data.node_type()
    }

    pub fn as_tool(&self) -> Option<&ToolNodeData> {
        match &self.data {
            NodeData::Tool(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_auth_provider(&self) -> Option<&AuthProviderNodeData> {
        match &self.data {
            NodeData::AuthProvider(data) => Some(data),
            _ => None,
        }
    }
}

/// Kind-specific payload; serialized as `{"type": ..., "data": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum NodeData {
    Llm(LlmNodeData),
    Server(ServerNodeData),
    Tool(ToolNodeData),
    AuthProvider(AuthProviderNodeData),
    ApiEndpoint(ApiEndpointNodeData),
}

impl NodeData {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeData::Llm(_) => NodeType::Llm,
            NodeData::Server(_) => NodeType::Server,
            NodeData::Tool(_) => NodeType::Tool,
            NodeData::AuthProvider(_) => NodeType::AuthProvider,
            NodeData::ApiEndpoint(_) => NodeType::ApiEndpoint,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmNodeData {
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerNodeData {
    pub server_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<&McpServer> for ServerNodeData {
    fn from(server: &McpServer) -> Self {
        Self {
            server_id: server.id.clone(),
            name: server.name.clone(),
            description: server.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolNodeData {
    pub tool_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub method: String,
    pub url: String,
    pub enabled: bool,
    #[serde(default, rename = "oAuthProviderId")]
    pub oauth_provider_id: Option<String>,
    #[serde(default)]
    pub api_key_provider_id: Option<String>,
}

impl ToolNodeData {
    pub fn provider_for(&self, kind: AuthKind) -> Option<&str> {
        match kind {
            AuthKind::OAuth => self.oauth_provider_id.as_deref(),
            AuthKind::ApiKey => self.api_key_provider_id.as_deref(),
        }
    }
}

impl From<&Tool> for ToolNodeData {
    fn from(tool: &Tool) -> Self {
        Self {
            tool_id: tool.id.clone(),
            name: tool.name.clone(),
            description: tool.description.clone(),
            method: tool.method.clone(),
            url: tool.url.clone(),
            enabled: tool.enabled,
            oauth_provider_id: tool.oauth_provider_id.clone(),
            api_key_provider_id: tool.api_key_provider_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthProviderNodeData {
    pub provider_id: String,
    /// Tool this node is attached to; `None` for a node dropped from the palette
    #[serde(default)]
    pub tool_id: Option<String>,
    pub kind: AuthKind,
    pub name: String,
    pub has_client_id: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEndpointNodeData {
    pub tool_id: String,
    pub method: String,
    pub url: String,
}

impl From<&Tool> for ApiEndpointNodeData {
    fn from(tool: &Tool) -> Self {
        Self {
            tool_id: tool.id.clone(),
            method: tool.method.clone(),
            url: tool.url.clone(),
        }
    }
}
