use axum::{
    extract::State,
    http::HeaderMap,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::{Stream, StreamExt};
use mcpdeck_stream::{ChatRequest, RenderEvent};
use std::convert::Infallible;
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Run a tool-creation chat turn and stream its render events as Server-Sent Events
///
/// Failures before the first byte (rejected credentials, upstream down, empty
/// body) become an error response; anything later arrives as an `error` event
/// and ends the stream.
pub async fn tool_creation_chat(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<ChatRequest>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    if req.messages.is_empty() {
        return Err(ApiError::BadRequest("messages must not be empty".to_string()));
    }

    let events = state.chat_for(&headers).render_chat(&req).await?;

    tracing::info!(
        server_id = req.server_id.as_deref().unwrap_or("-"),
        web_search = req.web_search,
        messages = req.messages.len(),
        "Chat stream started"
    );

    let sse_stream = events.map(|event| Ok::<Event, Infallible>(to_sse_event(&event)));

    Ok(Sse::new(sse_stream).keep_alive(KeepAlive::default()))
}

fn to_sse_event(event: &RenderEvent) -> Event {
    Event::default()
        .event(event.event_name())
        .json_data(event)
        .unwrap_or_else(|e| {
            tracing::error!("Failed to serialize render event: {}", e);
            Event::default()
                .event("error")
                .data(r#"{"type":"error","error":"Failed to serialize event"}"#)
        })
}
