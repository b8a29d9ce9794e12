pub mod builder;
pub mod connect;
pub mod edge;
pub mod error;
pub mod graph;
pub mod layout;
pub mod node;
pub mod session;

pub use builder::{build_workflow, WorkflowGraphBuilder};
pub use connect::{AuthLinkChange, AuthRemoval, Connection, DeletePlan};
pub use edge::{edge_id, EdgeData, EdgeStyle, EdgeType, WorkflowEdge};
pub use error::{ConnectError, GraphError};
pub use graph::{GraphDiff, WorkflowGraph};
pub use layout::{LayoutConfig, Position};
pub use node::{
    tool_auth_node_id, ApiEndpointNodeData, AuthProviderNodeData, LlmNodeData, NodeData,
    NodeType, ServerNodeData, ToolNodeData, WorkflowNode,
};
pub use session::{RefreshTicket, WorkflowSession};
