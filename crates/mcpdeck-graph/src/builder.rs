use mcpdeck_types::{ApiKeyProvider, AuthKind, McpServer, OAuthProvider, Tool};
use tracing::debug;

use crate::edge::{EdgeData, EdgeStyle, EdgeType, WorkflowEdge, AUTH_STROKE};
use crate::graph::WorkflowGraph;
use crate::layout::LayoutConfig;
use crate::node::{
    tool_auth_node_id, ApiEndpointNodeData, AuthProviderNodeData, LlmNodeData, NodeData,
    NodeType, ServerNodeData, ToolNodeData, WorkflowNode,
};

const LLM_LABEL: &str = "LLM";
const LLM_EDGE_LABEL: &str = "calls a tool";

const LLM_COLUMN: usize = 0;
const SERVER_COLUMN: usize = 1;
const TOOL_COLUMN: usize = 2;

/// Builder for the workflow graph of one MCP server
///
/// The output depends only on the inputs: the same server, tools and providers
/// always produce the same node ids, edge ids and positions.
pub struct WorkflowGraphBuilder<'a> {
    server: &'a McpServer,
    tools: &'a [Tool],
    oauth_providers: &'a [OAuthProvider],
    api_key_providers: &'a [ApiKeyProvider],
    layout: LayoutConfig,
}

impl<'a> WorkflowGraphBuilder<'a> {
    pub fn new(server: &'a McpServer) -> Self {
        Self {
            server,
            tools: &[],
            oauth_providers: &[],
            api_key_providers: &[],
            layout: LayoutConfig::default(),
        }
    }

    /// Set the tools, in display order
    pub fn tools(mut self, tools: &'a [Tool]) -> Self {
        self.tools = tools;
        self
    }

    /// Set the OAuth providers used to resolve names and client ids
    pub fn oauth_providers(mut self, providers: &'a [OAuthProvider]) -> Self {
        self.oauth_providers = providers;
        self
    }

    /// Set the API key providers used to resolve names
    pub fn api_key_providers(mut self, providers: &'a [ApiKeyProvider]) -> Self {
        self.api_key_providers = providers;
        self
    }

    pub fn layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    pub fn build(self) -> WorkflowGraph {
        let layout = self.layout;
        let center_y = layout.center_y;
        let mut nodes = Vec::with_capacity(2 + self.tools.len() * 3);
        let mut edges = Vec::with_capacity(1 + self.tools.len() * 3);

        let llm_id = NodeType::Llm.node_id(&self.server.id);
        let server_id = NodeType::Server.node_id(&self.server.id);

        nodes.push(WorkflowNode::new(
            llm_id.clone(),
            layout.position(LLM_COLUMN, center_y),
            NodeData::Llm(LlmNodeData {
                label: LLM_LABEL.to_string(),
            }),
        ));
        nodes.push(WorkflowNode::new(
            server_id.clone(),
            layout.position(SERVER_COLUMN, center_y),
            NodeData::Server(ServerNodeData::from(self.server)),
        ));
        edges.push(
            WorkflowEdge::new(llm_id, server_id.clone())
                .animated(true)
                .with_label(LLM_EDGE_LABEL),
        );

        let count = self.tools.len();
        for (index, tool) in self.tools.iter().enumerate() {
            let y = layout.row_y(index, count);
            let tool_id = NodeType::Tool.node_id(&tool.id);
            let endpoint_id = NodeType::ApiEndpoint.node_id(&tool.id);

            nodes.push(WorkflowNode::new(
                tool_id.clone(),
                layout.position(TOOL_COLUMN, y),
                NodeData::Tool(ToolNodeData::from(tool)),
            ));
            edges.push(WorkflowEdge::new(server_id.clone(), tool_id.clone()).with_status(tool.enabled));

            match tool.auth_provider() {
                Some((kind, provider_id)) => {
                    let auth_id = tool_auth_node_id(&tool.id, provider_id);

                    nodes.push(WorkflowNode::new(
                        auth_id.clone(),
                        layout.position(TOOL_COLUMN + 1, y),
                        NodeData::AuthProvider(self.auth_node_data(tool, kind, provider_id)),
                    ));
                    nodes.push(WorkflowNode::new(
                        endpoint_id.clone(),
                        layout.position(TOOL_COLUMN + 2, y),
                        NodeData::ApiEndpoint(ApiEndpointNodeData::from(tool)),
                    ));

                    edges.push(
                        WorkflowEdge::new(tool_id, auth_id.clone())
                            .with_type(EdgeType::Deletable)
                            .with_label(kind.label())
                            .with_style(EdgeStyle::dashed(AUTH_STROKE)),
                    );
                    edges.push(WorkflowEdge::new(auth_id, endpoint_id));
                }
                None => {
                    nodes.push(WorkflowNode::new(
                        endpoint_id.clone(),
                        layout.position(TOOL_COLUMN + 1, y),
                        NodeData::ApiEndpoint(ApiEndpointNodeData::from(tool)),
                    ));
                    edges.push(
                        WorkflowEdge::new(tool_id, endpoint_id)
                            .with_type(EdgeType::ToolToApi)
                            .with_data(EdgeData::add_auth(&tool.id)),
                    );
                }
            }
        }

        debug!(
            server_id = %self.server.id,
            nodes = nodes.len(),
            edges = edges.len(),
            "Built workflow graph"
        );

        WorkflowGraph::new(nodes, edges)
    }

    fn auth_node_data(&self, tool: &Tool, kind: AuthKind, provider_id: &str) -> AuthProviderNodeData {
        let (name, has_client_id) = match kind {
            AuthKind::OAuth => match self.oauth_providers.iter().find(|p| p.id == provider_id) {
                Some(provider) => (provider.name.clone(), provider.has_client_id()),
                None => (provider_id.to_string(), false),
            },
            AuthKind::ApiKey => {
                let name = self
                    .api_key_providers
                    .iter()
                    .find(|p| p.id == provider_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| provider_id.to_string());
                (name, true)
            }
        };

        AuthProviderNodeData {
            provider_id: provider_id.to_string(),
            tool_id: Some(tool.id.clone()),
            kind,
            name,
            has_client_id,
        }
    }
}

/// Builds the workflow graph for `server` with the default layout
pub fn build_workflow(
    server: &McpServer,
    tools: &[Tool],
    oauth_providers: &[OAuthProvider],
) -> WorkflowGraph {
    WorkflowGraphBuilder::new(server)
        .tools(tools)
        .oauth_providers(oauth_providers)
        .build()
}
