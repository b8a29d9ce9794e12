use mcpdeck_types::AuthKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Edge not found: {0}")]
    EdgeNotFound(String),

    #[error("Node already exists: {0}")]
    DuplicateNode(String),

    #[error("Invalid patch for node {node_id}: {reason}")]
    InvalidPatch { node_id: String, reason: String },
}

/// Reasons a user-drawn connection is rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConnectError {
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    #[error("Connections must start at a tool node, got {0}")]
    InvalidSource(String),

    #[error("Connections must end at an auth provider node, got {0}")]
    InvalidTarget(String),

    #[error("Invalid handle: {0}")]
    InvalidHandle(String),

    #[error("Tool {tool_id} already has an {} provider", kind.label())]
    SlotOccupied { tool_id: String, kind: AuthKind },
}

pub type Result<T> = std::result::Result<T, GraphError>;
