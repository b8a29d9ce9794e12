use std::sync::Arc;

use futures::StreamExt;
use mcpdeck_stream::{
    ChatClientConfig, ChatMessage, ChatRequest, NoCredentials, StaticToken, StreamChunk,
    StreamError, ToolChatClient, Transcript,
};

const CHAT_PATH: &str = "/ai/tool-creation/chat";

fn request() -> ChatRequest {
    ChatRequest::new(vec![ChatMessage::user("Create a tool for the weather API")])
}

#[tokio::test]
async fn test_stream_chat_sends_bearer_token() {
    let mut server = mockito::Server::new_async().await;
    let body = concat!(
        "data: {\"type\":\"text-delta\",\"delta\":\"Hello\"}\n\n",
        "data: {\"type\":\"finish\",\"finishReason\":\"stop\"}\n\n",
        "data: [DONE]\n\n",
    );
    let mock = server
        .mock("POST", CHAT_PATH)
        .match_header("authorization", "Bearer secret-token")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await;

    let client = ToolChatClient::new(
        ChatClientConfig::new(server.url()),
        Arc::new(StaticToken::new("secret-token")),
    )
    .unwrap();

    let chunks: Vec<StreamChunk> = client.stream_chat(&request()).await.unwrap().collect().await;

    assert_eq!(
        chunks,
        vec![StreamChunk::text("Hello"), StreamChunk::finish(Some("stop".to_string()))]
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_non_success_status_fails_before_streaming() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", CHAT_PATH)
        .with_status(401)
        .with_body("token expired")
        .create_async()
        .await;

    let client =
        ToolChatClient::new(ChatClientConfig::new(server.url()), Arc::new(NoCredentials)).unwrap();

    match client.stream_chat(&request()).await {
        Err(StreamError::Status { status, body }) => {
            assert_eq!(status, 401);
            assert_eq!(body, "token expired");
        }
        Err(other) => panic!("Expected status error, got {}", other),
        Ok(_) => panic!("Expected status error, got a stream"),
    }
}

#[tokio::test]
async fn test_empty_body_is_fatal() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", CHAT_PATH)
        .with_status(200)
        .with_body("")
        .create_async()
        .await;

    let client =
        ToolChatClient::new(ChatClientConfig::new(server.url()), Arc::new(NoCredentials)).unwrap();

    assert!(matches!(
        client.stream_chat(&request()).await,
        Err(StreamError::EmptyBody)
    ));
}

#[tokio::test]
async fn test_render_chat_produces_transcript() {
    let mut server = mockito::Server::new_async().await;
    let body = concat!(
        "{\"type\":\"text-delta\",\"delta\":\"Looking that up. \"}\n",
        "{\"type\":\"tool-input-start\",\"toolCallId\":\"s1\",\"toolName\":\"web_search_preview\"}\n",
        "{\"type\":\"text-delta\",\"delta\":\"Found it.\"}\n",
        "{\"type\":\"tool-output-available\",\"toolCallId\":\"s1\",\"toolName\":\"web_search_preview\",\"output\":{}}\n",
    );
    server
        .mock("POST", CHAT_PATH)
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let client =
        ToolChatClient::new(ChatClientConfig::new(server.url()), Arc::new(NoCredentials)).unwrap();

    let transcript = Transcript::collect(client.render_chat(&request()).await.unwrap()).await;

    assert_eq!(transcript.content, "Looking that up. Found it.");
    assert_eq!(transcript.tool_calls[0].name, "web_search_preview");
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let client = ToolChatClient::new(
        ChatClientConfig::new("http://127.0.0.1:1"),
        Arc::new(NoCredentials),
    )
    .unwrap();

    assert!(matches!(
        client.stream_chat(&request()).await,
        Err(StreamError::Transport(_))
    ));
}
