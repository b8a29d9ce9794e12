use std::pin::Pin;

use futures::{Stream, StreamExt};
use mcpdeck_types::{is_web_search_tool, StreamChunk, ToolCallInfo, ToolResultInfo, ToolResultKind};
use serde::Serialize;

use crate::streaming::ChunkStream;

/// What the chat view should do next, in display order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RenderEvent {
    Text {
        text: String,
    },

    Reasoning {
        reasoning: String,
    },

    /// A tool call started; `webSearch` switches the view to its search indicator
    ToolCall {
        #[serde(rename = "toolCall")]
        tool_call: ToolCallInfo,
        #[serde(rename = "webSearch")]
        web_search: bool,
    },

    ToolResult {
        #[serde(rename = "toolResult")]
        tool_result: ToolResultInfo,
    },

    Error {
        error: String,
    },

    Finish {
        #[serde(rename = "finishReason", skip_serializing_if = "Option::is_none")]
        finish_reason: Option<String>,
    },
}

impl RenderEvent {
    /// SSE event name for this render event
    pub fn event_name(&self) -> &'static str {
        match self {
            RenderEvent::Text { .. } => "text",
            RenderEvent::Reasoning { .. } => "reasoning",
            RenderEvent::ToolCall { .. } => "tool-call",
            RenderEvent::ToolResult { .. } => "tool-result",
            RenderEvent::Error { .. } => "error",
            RenderEvent::Finish { .. } => "finish",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Streaming,
    Buffering,
}

/// Display state of one assistant turn
///
/// Text is held back in two places: `prelude` collects everything that
/// arrives before the first tool call, `buffer` collects everything that
/// arrives while a web search is running. Both are released as single units.
#[derive(Debug, Clone, Default)]
pub struct TurnRenderer {
    mode: RenderMode,
    buffer: String,
    prelude: String,
    classified: bool,
    stopped: bool,
}

impl TurnRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// True once an error chunk has ended the turn
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Advance the state machine by one chunk
    pub fn apply(&mut self, chunk: StreamChunk) -> Vec<RenderEvent> {
        if self.stopped {
            return Vec::new();
        }

        match chunk {
            StreamChunk::Text { text } => self.on_text(text),

            StreamChunk::Reasoning { reasoning } => vec![RenderEvent::Reasoning { reasoning }],

            StreamChunk::ToolCall { tool_call } => {
                let mut events = self.flush_prelude();
                self.classified = true;

                let web_search = is_web_search_tool(&tool_call.name);
                if web_search && self.mode == RenderMode::Streaming {
                    tracing::debug!(tool_call_id = %tool_call.id, "Holding text until web search completes");
                    self.mode = RenderMode::Buffering;
                }

                events.push(RenderEvent::ToolCall {
                    tool_call,
                    web_search,
                });
                events
            }

            StreamChunk::ToolResult { tool_result } => {
                let ends_search = tool_result.kind == Some(ToolResultKind::WebSearch)
                    && self.mode == RenderMode::Buffering;

                let mut events = vec![RenderEvent::ToolResult { tool_result }];
                if ends_search {
                    self.mode = RenderMode::Streaming;
                    events.extend(self.flush_buffer());
                }
                events
            }

            StreamChunk::Error { error } => {
                let mut events = self.flush_prelude();
                events.extend(self.flush_buffer());
                events.push(RenderEvent::Error { error });
                self.stopped = true;
                events
            }

            StreamChunk::Finish { finish_reason } => {
                // A step can finish while a web search is still open; its text
                // stays held until the search result or the end of the stream.
                let mut events = self.flush_prelude();
                if self.mode == RenderMode::Streaming {
                    events.extend(self.flush_buffer());
                }
                events.push(RenderEvent::Finish { finish_reason });
                events
            }
        }
    }

    /// Release whatever is still held once the stream has ended
    pub fn finish(&mut self) -> Vec<RenderEvent> {
        if self.stopped {
            return Vec::new();
        }

        let mut events = self.flush_prelude();
        events.extend(self.flush_buffer());
        self.mode = RenderMode::Streaming;
        events
    }

    fn on_text(&mut self, text: String) -> Vec<RenderEvent> {
        match self.mode {
            RenderMode::Buffering => {
                self.buffer.push_str(&text);
                Vec::new()
            }
            RenderMode::Streaming if !self.classified => {
                self.prelude.push_str(&text);
                Vec::new()
            }
            RenderMode::Streaming => vec![RenderEvent::Text { text }],
        }
    }

    fn flush_prelude(&mut self) -> Vec<RenderEvent> {
        take_text(&mut self.prelude)
    }

    fn flush_buffer(&mut self) -> Vec<RenderEvent> {
        take_text(&mut self.buffer)
    }
}

fn take_text(held: &mut String) -> Vec<RenderEvent> {
    if held.is_empty() {
        return Vec::new();
    }
    vec![RenderEvent::Text {
        text: std::mem::take(held),
    }]
}

pub type RenderStream = Pin<Box<dyn Stream<Item = RenderEvent> + Send>>;

/// Drive a [`TurnRenderer`] over a chunk stream
///
/// Stops pulling from `chunks` after an error chunk; the chunk stream (and
/// its reader) is dropped as soon as this stream ends or is dropped.
pub fn render_turn(chunks: ChunkStream) -> RenderStream {
    Box::pin(async_stream::stream! {
        let mut chunks = chunks;
        let mut renderer = TurnRenderer::new();

        while let Some(chunk) = chunks.next().await {
            for event in renderer.apply(chunk) {
                yield event;
            }
            if renderer.is_stopped() {
                break;
            }
        }

        for event in renderer.finish() {
            yield event;
        }
    })
}

/// Assistant message assembled from render events
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    pub content: String,
    pub reasoning: String,
    pub tool_calls: Vec<ToolCallInfo>,
    pub tool_results: Vec<ToolResultInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

impl Transcript {
    pub fn push(&mut self, event: RenderEvent) {
        match event {
            RenderEvent::Text { text } => self.content.push_str(&text),
            RenderEvent::Reasoning { reasoning } => self.reasoning.push_str(&reasoning),
            RenderEvent::ToolCall { tool_call, .. } => self.tool_calls.push(tool_call),
            RenderEvent::ToolResult { tool_result } => self.tool_results.push(tool_result),
            RenderEvent::Error { error } => self.error_note = Some(error),
            RenderEvent::Finish { finish_reason } => {
                if finish_reason.is_some() {
                    self.finish_reason = finish_reason;
                }
            }
        }
    }

    /// Consume a render stream to completion
    pub async fn collect(mut events: RenderStream) -> Self {
        let mut transcript = Self::default();
        while let Some(event) = events.next().await {
            transcript.push(event);
        }
        transcript
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn web_search_call() -> StreamChunk {
        StreamChunk::tool_call("s1", "web_search", json!({"query": "rust"}))
    }

    fn web_search_result() -> StreamChunk {
        StreamChunk::tool_result("s1", "web_search", Some(ToolResultKind::WebSearch), json!([]))
    }

    fn texts(events: &[RenderEvent]) -> Vec<&str> {
        events
            .iter()
            .filter_map(|e| match e {
                RenderEvent::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_prelude_held_until_stream_end() {
        let mut renderer = TurnRenderer::new();

        assert!(renderer.apply(StreamChunk::text("Hel")).is_empty());
        assert!(renderer.apply(StreamChunk::text("lo")).is_empty());
        assert_eq!(renderer.finish(), vec![RenderEvent::Text { text: "Hello".to_string() }]);
    }

    #[test]
    fn test_finish_follows_held_prelude() {
        let mut renderer = TurnRenderer::new();

        assert!(renderer.apply(StreamChunk::text("Hello")).is_empty());
        let events = renderer.apply(StreamChunk::finish(Some("stop".to_string())));

        assert_eq!(
            events,
            vec![
                RenderEvent::Text { text: "Hello".to_string() },
                RenderEvent::Finish { finish_reason: Some("stop".to_string()) },
            ]
        );
        assert!(renderer.finish().is_empty());
    }

    #[test]
    fn test_step_finish_keeps_open_search_buffered() {
        let mut renderer = TurnRenderer::new();

        renderer.apply(web_search_call());
        renderer.apply(StreamChunk::text("found it"));
        let events = renderer.apply(StreamChunk::finish(None));
        assert_eq!(events, vec![RenderEvent::Finish { finish_reason: None }]);

        let events = renderer.apply(web_search_result());
        assert_eq!(texts(&events), vec!["found it"]);
    }

    #[test]
    fn test_prelude_flushed_before_tool_creation_call() {
        let mut renderer = TurnRenderer::new();

        renderer.apply(StreamChunk::text("Creating "));
        let events = renderer.apply(StreamChunk::tool_call("c1", "createMCPTool", json!({})));

        assert_eq!(events.len(), 2);
        assert_eq!(texts(&events), vec!["Creating "]);
        assert!(matches!(events[1], RenderEvent::ToolCall { web_search: false, .. }));
        assert_eq!(renderer.mode(), RenderMode::Streaming);

        assert_eq!(
            renderer.apply(StreamChunk::text("done")),
            vec![RenderEvent::Text { text: "done".to_string() }]
        );
    }

    #[test]
    fn test_web_search_window_buffers_text() {
        let mut renderer = TurnRenderer::new();
        let mut events = Vec::new();

        events.extend(renderer.apply(StreamChunk::text("A")));
        events.extend(renderer.apply(web_search_call()));
        assert_eq!(renderer.mode(), RenderMode::Buffering);

        assert!(renderer.apply(StreamChunk::text("B1")).is_empty());
        assert!(renderer.apply(StreamChunk::text("B2")).is_empty());

        let on_result = renderer.apply(web_search_result());
        assert!(matches!(on_result[0], RenderEvent::ToolResult { .. }));
        assert_eq!(texts(&on_result), vec!["B1B2"]);
        assert_eq!(renderer.mode(), RenderMode::Streaming);

        events.extend(on_result);
        events.extend(renderer.apply(StreamChunk::text("C")));
        events.extend(renderer.finish());

        assert_eq!(texts(&events), vec!["A", "B1B2", "C"]);
    }

    #[test]
    fn test_non_search_result_keeps_buffering() {
        let mut renderer = TurnRenderer::new();

        renderer.apply(web_search_call());
        renderer.apply(StreamChunk::text("held"));

        let events = renderer.apply(StreamChunk::tool_result(
            "x",
            "lookup",
            Some(ToolResultKind::Unknown),
            json!(null),
        ));
        assert!(texts(&events).is_empty());
        assert_eq!(renderer.mode(), RenderMode::Buffering);

        assert_eq!(texts(&renderer.finish()), vec!["held"]);
    }

    #[test]
    fn test_error_flushes_and_stops() {
        let mut renderer = TurnRenderer::new();

        renderer.apply(StreamChunk::text("partial"));
        let events = renderer.apply(StreamChunk::error("boom"));

        assert_eq!(
            events,
            vec![
                RenderEvent::Text { text: "partial".to_string() },
                RenderEvent::Error { error: "boom".to_string() },
            ]
        );
        assert!(renderer.is_stopped());
        assert!(renderer.apply(StreamChunk::text("ignored")).is_empty());
        assert!(renderer.finish().is_empty());
    }

    #[test]
    fn test_reasoning_and_finish_pass_through() {
        let mut renderer = TurnRenderer::new();

        renderer.apply(web_search_call());
        assert_eq!(
            renderer.apply(StreamChunk::reasoning("hmm")),
            vec![RenderEvent::Reasoning { reasoning: "hmm".to_string() }]
        );
        assert_eq!(
            renderer.apply(StreamChunk::finish(Some("stop".to_string()))),
            vec![RenderEvent::Finish { finish_reason: Some("stop".to_string()) }]
        );
    }

    #[test]
    fn test_transcript_accumulates() {
        let mut transcript = Transcript::default();

        transcript.push(RenderEvent::Text { text: "a".to_string() });
        transcript.push(RenderEvent::Text { text: "b".to_string() });
        transcript.push(RenderEvent::Finish { finish_reason: Some("stop".to_string()) });
        transcript.push(RenderEvent::Finish { finish_reason: None });
        transcript.push(RenderEvent::Error { error: "late".to_string() });

        assert_eq!(transcript.content, "ab");
        assert_eq!(transcript.finish_reason.as_deref(), Some("stop"));
        assert_eq!(transcript.error_note.as_deref(), Some("late"));
    }

    #[test]
    fn test_render_event_serialization() {
        let event = RenderEvent::ToolCall {
            tool_call: ToolCallInfo {
                id: "c".to_string(),
                name: "web_search".to_string(),
                args: json!({}),
            },
            web_search: true,
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "tool-call");
        assert_eq!(value["webSearch"], true);
        assert_eq!(value["toolCall"]["name"], "web_search");
        assert_eq!(event.event_name(), "tool-call");
    }
}
