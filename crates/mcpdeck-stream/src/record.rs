//! Decoding of single stream lines into chunks
//!
//! A line is either SSE framed (`data: <payload>`) or a bare payload. The
//! payload is a JSON record keyed by `type`; payloads that are not JSON fall
//! back to the legacy `0:`/`1:` prefix format. Nothing in here fails: an
//! unusable line simply produces no chunk.

use mcpdeck_types::{is_web_search_tool, StreamChunk, ToolResultKind};
use serde::Deserialize;
use serde_json::Value;

/// SSE sentinel that marks the end of the records on a line
pub const DONE_MARKER: &str = "[DONE]";

const SSE_DATA_PREFIX: &str = "data:";
const LEGACY_TEXT_PREFIX: &str = "0:";
const LEGACY_REASONING_PREFIX: &str = "1:";

/// Name given to tool results that carry a tool-creation outcome
pub const TOOL_CREATION_RESULT_NAME: &str = "createMCPTool";

const WEB_SEARCH_RESULT_TYPE: &str = "web_search_tool_result";
const UNKNOWN_ERROR: &str = "Unknown error";

/// Wire records of the event stream, dispatched on their `type` field
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum StreamRecord {
    Text {
        text: Option<String>,
    },
    TextDelta {
        delta: Option<String>,
    },
    TextStart {},
    TextEnd {},

    Reasoning {
        reasoning: Option<String>,
        text: Option<String>,
    },
    ReasoningDelta {
        delta: Option<String>,
    },
    ReasoningStart {},
    ReasoningEnd {},

    Error {
        error: Option<Value>,
        #[serde(rename = "errorText")]
        error_text: Option<Value>,
    },

    Finish {
        #[serde(rename = "finishReason")]
        finish_reason: Option<String>,
    },
    FinishStep {
        #[serde(rename = "finishReason")]
        finish_reason: Option<String>,
    },

    ToolCall {
        #[serde(rename = "toolCallId", default)]
        tool_call_id: String,
        #[serde(rename = "toolName", default)]
        tool_name: String,
        #[serde(default)]
        args: Value,
    },
    ToolInputStart {
        #[serde(rename = "toolCallId", default)]
        tool_call_id: String,
        #[serde(rename = "toolName", default)]
        tool_name: String,
    },
    ToolInputAvailable {
        #[serde(rename = "toolCallId", default)]
        tool_call_id: String,
        #[serde(rename = "toolName", default)]
        tool_name: String,
        #[serde(default)]
        input: Value,
    },
    ToolOutputAvailable {
        #[serde(rename = "toolCallId", default)]
        tool_call_id: String,
        #[serde(rename = "toolName")]
        tool_name: Option<String>,
        #[serde(default)]
        output: Value,
    },
    ToolResult {
        #[serde(rename = "toolCallId", default)]
        tool_call_id: String,
        #[serde(rename = "toolName")]
        tool_name: Option<String>,
        #[serde(default)]
        result: Value,
    },

    #[serde(other)]
    Unknown,
}

impl StreamRecord {
    fn into_chunk(self) -> Option<StreamChunk> {
        match self {
            StreamRecord::Text { text } => text.map(StreamChunk::text),
            StreamRecord::TextDelta { delta } => delta.map(StreamChunk::text),
            StreamRecord::TextStart {} | StreamRecord::TextEnd {} => None,

            StreamRecord::Reasoning { reasoning, text } => {
                reasoning.or(text).map(StreamChunk::reasoning)
            }
            StreamRecord::ReasoningDelta { delta } => delta.map(StreamChunk::reasoning),
            StreamRecord::ReasoningStart {} | StreamRecord::ReasoningEnd {} => None,

            StreamRecord::Error { error, error_text } => {
                Some(StreamChunk::error(error_message(error.or(error_text))))
            }

            StreamRecord::Finish { finish_reason } | StreamRecord::FinishStep { finish_reason } => {
                Some(StreamChunk::finish(finish_reason))
            }

            StreamRecord::ToolCall {
                tool_call_id,
                tool_name,
                args,
            } => Some(StreamChunk::tool_call(tool_call_id, tool_name, args)),

            // Only the hosted search is announced early, so the UI can show
            // its indicator before the query has been generated.
            StreamRecord::ToolInputStart {
                tool_call_id,
                tool_name,
            } => (tool_name == "web_search_preview").then(|| {
                StreamChunk::tool_call(tool_call_id, tool_name, Value::Object(Default::default()))
            }),

            StreamRecord::ToolInputAvailable {
                tool_call_id,
                tool_name,
                input,
            } => Some(StreamChunk::tool_call(tool_call_id, tool_name, input)),

            StreamRecord::ToolOutputAvailable {
                tool_call_id,
                tool_name,
                output,
            } => {
                let kind = classify_tool_output(&output, tool_name.as_deref());
                Some(StreamChunk::tool_result(
                    tool_call_id,
                    tool_name.unwrap_or_default(),
                    Some(kind),
                    output,
                ))
            }

            StreamRecord::ToolResult {
                tool_call_id,
                tool_name,
                result,
            } => {
                let kind = classify_tool_output(&result, tool_name.as_deref());
                let name = if kind == ToolResultKind::ToolCreation {
                    TOOL_CREATION_RESULT_NAME.to_string()
                } else {
                    tool_name.unwrap_or_default()
                };
                Some(StreamChunk::tool_result(tool_call_id, name, Some(kind), result))
            }

            StreamRecord::Unknown => None,
        }
    }
}

fn error_message(error: Option<Value>) -> String {
    match error {
        Some(Value::String(message)) => message,
        Some(Value::Object(map)) => map
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_ERROR)
            .to_string(),
        _ => UNKNOWN_ERROR.to_string(),
    }
}

/// True for a `{ success, toolId | toolName }` shaped payload
pub fn is_tool_creation_result(value: &Value) -> bool {
    value.as_object().is_some_and(|obj| {
        obj.contains_key("success") && (obj.contains_key("toolId") || obj.contains_key("toolName"))
    })
}

/// Classify a tool output payload
///
/// Tool-creation shape wins over web search; everything else is unknown.
pub fn classify_tool_output(output: &Value, tool_name: Option<&str>) -> ToolResultKind {
    if is_tool_creation_result(output) {
        return ToolResultKind::ToolCreation;
    }

    let search_payload = output.get("type").and_then(Value::as_str) == Some(WEB_SEARCH_RESULT_TYPE);
    if search_payload || tool_name.is_some_and(is_web_search_tool) {
        ToolResultKind::WebSearch
    } else {
        ToolResultKind::Unknown
    }
}

/// Decode one line of the stream into at most one chunk
pub fn decode_line(line: &str) -> Option<StreamChunk> {
    if line.trim().is_empty() {
        return None;
    }

    // Leading whitespace only matters for SSE framing; legacy payloads keep theirs.
    let payload = match line.trim_start().strip_prefix(SSE_DATA_PREFIX) {
        Some(data) => {
            let data = data.strip_prefix(' ').unwrap_or(data);
            if data.trim() == DONE_MARKER {
                return None;
            }
            data
        }
        None => line,
    };

    match serde_json::from_str::<Value>(payload) {
        Ok(value) => decode_record(value),
        Err(_) => decode_legacy(payload),
    }
}

fn decode_record(value: Value) -> Option<StreamChunk> {
    match serde_json::from_value::<StreamRecord>(value) {
        Ok(record) => record.into_chunk(),
        Err(e) => {
            tracing::debug!(error = %e, "Dropping unrecognized stream record");
            None
        }
    }
}

fn decode_legacy(payload: &str) -> Option<StreamChunk> {
    if let Some(text) = payload.strip_prefix(LEGACY_TEXT_PREFIX) {
        Some(StreamChunk::text(text))
    } else if let Some(reasoning) = payload.strip_prefix(LEGACY_REASONING_PREFIX) {
        Some(StreamChunk::reasoning(reasoning))
    } else {
        tracing::debug!(line = payload, "Dropping malformed stream line");
        None
    }
}
