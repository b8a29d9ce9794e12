pub mod buffer_utils;
pub mod client;
pub mod config;
pub mod error;
pub mod record;
pub mod render;
pub mod streaming;
pub mod traits;

pub use client::ToolChatClient;
pub use config::ChatClientConfig;
pub use error::StreamError;
pub use record::{classify_tool_output, decode_line, is_tool_creation_result};
pub use render::{render_turn, RenderEvent, RenderMode, RenderStream, Transcript, TurnRenderer};
pub use streaming::{decode_chunk_stream, parse_chunk_stream, ChunkDecoder, ChunkStream};
pub use traits::{ChatMessage, ChatRequest, ChatRole, CredentialProvider, NoCredentials, StaticToken};

pub use mcpdeck_types::{StreamChunk, ToolCallInfo, ToolResultInfo, ToolResultKind};
