pub mod chunk;
pub mod entities;

pub use chunk::{StreamChunk, ToolCallInfo, ToolResultInfo, ToolResultKind};
pub use entities::{ApiKeyProvider, AuthKind, McpServer, OAuthProvider, Tool};

/// Tool names the backend uses for its hosted web search.
pub const WEB_SEARCH_TOOL_NAMES: [&str; 2] = ["web_search", "web_search_preview"];

/// Returns true if `name` refers to the hosted web search tool.
pub fn is_web_search_tool(name: &str) -> bool {
    WEB_SEARCH_TOOL_NAMES.contains(&name)
}
