//! Prelude module for convenient imports
//!
//! Import everything you need with:
//! ```rust
//! use mcpdeck::prelude::*;
//! ```

pub use crate::{
    build_workflow, AuthKind, ChatClientConfig, ChatMessage, ChatRequest, Connection,
    CredentialProvider, McpServer, OAuthProvider, RenderEvent, StaticToken, StreamChunk, Tool,
    ToolChatClient, Transcript, WorkflowGraph, WorkflowGraphBuilder, WorkflowSession,
};
