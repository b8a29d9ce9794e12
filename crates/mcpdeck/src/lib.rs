//! # mcpdeck
//!
//! Core of an admin console for MCP (Model Context Protocol) tools: turns the
//! AI tool-creation chat stream into display-ready events and derives the
//! workflow graph that shows how a server's tools reach their APIs.
//!
//! ## Overview
//!
//! - **Interpret streams**: SSE / JSON-lines records (and the legacy `0:` / `1:`
//!   prefix format) become typed [`StreamChunk`]s
//! - **Render turns**: text produced during a web search is held back until
//!   the search result arrives
//! - **Build workflow graphs**: stable node and edge ids, a fixed column layout,
//!   one auth node per authenticated tool
//! - **Edit graphs**: patch node data, validate new auth links, plan deletions
//!   that need confirmation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mcpdeck::prelude::*;
//! use futures::StreamExt;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ToolChatClient::new(
//!         ChatClientConfig::new("http://localhost:4000/api"),
//!         Arc::new(StaticToken::new(std::env::var("ADMIN_TOKEN")?)),
//!     )?;
//!
//!     let request = ChatRequest::new(vec![ChatMessage::user("Create a weather tool")])
//!         .with_web_search(true);
//!
//!     let mut events = client.render_chat(&request).await?;
//!     while let Some(event) = events.next().await {
//!         match event {
//!             RenderEvent::Text { text } => print!("{}", text),
//!             RenderEvent::ToolCall { web_search: true, .. } => println!("[searching the web]"),
//!             RenderEvent::Error { error } => eprintln!("{}", error),
//!             _ => {}
//!         }
//!     }
//!
//!     let server = McpServer { id: "s1".into(), name: "Weather".into(), description: None };
//!     let tools = vec![Tool::new("t1", "get_forecast").with_oauth_provider("google")];
//!     let graph = build_workflow(&server, &tools, &[]);
//!     println!("{} nodes, {} edges", graph.nodes.len(), graph.edges.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`mcpdeck-types`**: shared records (tools, providers, stream chunks)
//! - **`mcpdeck-stream`**: stream decoder, turn renderer, chat client
//! - **`mcpdeck-graph`**: workflow graph builder and editing operations
//! - **`mcpdeck-api`**: axum service exposing both over HTTP (binary only)
//!
//! ## License
//!
//! MIT

pub mod prelude;

pub use mcpdeck_types::{
    is_web_search_tool, ApiKeyProvider, AuthKind, McpServer, OAuthProvider, StreamChunk, Tool,
    ToolCallInfo, ToolResultInfo, ToolResultKind,
};

pub use mcpdeck_stream::{
    decode_chunk_stream, decode_line, parse_chunk_stream, render_turn, ChatClientConfig,
    ChatMessage, ChatRequest, ChatRole, ChunkDecoder, ChunkStream, CredentialProvider,
    NoCredentials, RenderEvent, RenderMode, RenderStream, StaticToken, StreamError,
    ToolChatClient, Transcript, TurnRenderer,
};

pub use mcpdeck_graph::{
    build_workflow, AuthLinkChange, AuthRemoval, ConnectError, Connection, DeletePlan, EdgeType,
    GraphDiff, GraphError, LayoutConfig, NodeData, NodeType, Position, RefreshTicket,
    WorkflowEdge, WorkflowGraph, WorkflowGraphBuilder, WorkflowNode, WorkflowSession,
};
