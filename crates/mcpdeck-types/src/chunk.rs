use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::is_web_search_tool;

/// Typed unit produced by the stream interpreter.
///
/// Exactly one variant per chunk; chunks are emitted in stream order and never
/// retracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StreamChunk {
    Text {
        text: String,
    },

    Reasoning {
        reasoning: String,
    },

    Error {
        error: String,
    },

    Finish {
        #[serde(rename = "finishReason", default, skip_serializing_if = "Option::is_none")]
        finish_reason: Option<String>,
    },

    ToolCall {
        #[serde(rename = "toolCall")]
        tool_call: ToolCallInfo,
    },

    ToolResult {
        #[serde(rename = "toolResult")]
        tool_result: ToolResultInfo,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallInfo {
    pub id: String,
    pub name: String,
    pub args: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResultInfo {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ToolResultKind>,
    pub result: Value,
}

/// Classification of a tool result payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolResultKind {
    ToolCreation,
    WebSearch,
    Unknown,
}

impl StreamChunk {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn reasoning(reasoning: impl Into<String>) -> Self {
        Self::Reasoning {
            reasoning: reasoning.into(),
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self::Error {
            error: error.into(),
        }
    }

    pub fn finish(finish_reason: Option<String>) -> Self {
        Self::Finish { finish_reason }
    }

    pub fn tool_call(id: impl Into<String>, name: impl Into<String>, args: Value) -> Self {
        Self::ToolCall {
            tool_call: ToolCallInfo {
                id: id.into(),
                name: name.into(),
                args,
            },
        }
    }

    pub fn tool_result(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: Option<ToolResultKind>,
        result: Value,
    ) -> Self {
        Self::ToolResult {
            tool_result: ToolResultInfo {
                id: id.into(),
                name: name.into(),
                kind,
                result,
            },
        }
    }

    /// Wire tag of this chunk
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Reasoning { .. } => "reasoning",
            Self::Error { .. } => "error",
            Self::Finish { .. } => "finish",
            Self::ToolCall { .. } => "tool-call",
            Self::ToolResult { .. } => "tool-result",
        }
    }

    pub fn is_web_search_call(&self) -> bool {
        matches!(self, Self::ToolCall { tool_call } if is_web_search_tool(&tool_call.name))
    }

    pub fn is_web_search_result(&self) -> bool {
        matches!(
            self,
            Self::ToolResult { tool_result } if tool_result.kind == Some(ToolResultKind::WebSearch)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_chunk_serialization() {
        let json = serde_json::to_value(StreamChunk::text("hi")).unwrap();
        assert_eq!(json, json!({"type": "text", "text": "hi"}));
    }

    #[test]
    fn test_tool_result_serialization() {
        let chunk = StreamChunk::tool_result(
            "call_1",
            "web_search",
            Some(ToolResultKind::WebSearch),
            json!({"hits": 3}),
        );

        let json = serde_json::to_value(&chunk).unwrap();
        assert_eq!(json["type"], "tool-result");
        assert_eq!(json["toolResult"]["type"], "web-search");
        assert_eq!(json["toolResult"]["result"]["hits"], 3);
    }

    #[test]
    fn test_finish_without_reason_omits_field() {
        let json = serde_json::to_string(&StreamChunk::finish(None)).unwrap();
        assert_eq!(json, r#"{"type":"finish"}"#);
    }

    #[test]
    fn test_web_search_predicates() {
        assert!(StreamChunk::tool_call("1", "web_search_preview", json!({})).is_web_search_call());
        assert!(!StreamChunk::tool_call("1", "createMCPTool", json!({})).is_web_search_call());
        assert!(
            !StreamChunk::tool_result("1", "web_search", Some(ToolResultKind::Unknown), json!(null))
                .is_web_search_result()
        );
    }
}
