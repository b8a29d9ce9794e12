// HTTP client for the tool-creation chat backend

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};

use crate::config::ChatClientConfig;
use crate::error::{Result, StreamError};
use crate::render::{render_turn, RenderStream};
use crate::streaming::{parse_chunk_stream, ChunkStream};
use crate::traits::{ChatRequest, CredentialProvider};

/// Streams chat turns from the backend
///
/// Every failure that happens before the first byte of the body (transport,
/// non-2xx, empty body) is returned as `Err`; once a stream exists, problems
/// arrive as chunks.
#[derive(Clone)]
pub struct ToolChatClient {
    http_client: reqwest::Client,
    config: ChatClientConfig,
    credentials: Arc<dyn CredentialProvider>,
}

impl ToolChatClient {
    pub fn new(config: ChatClientConfig, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("text/event-stream"));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.stream_timeout())
            .build()
            .map_err(|e| StreamError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
            credentials,
        })
    }

    /// Same connection pool, different credentials
    pub fn with_credentials(&self, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            http_client: self.http_client.clone(),
            config: self.config.clone(),
            credentials,
        }
    }

    pub fn config(&self) -> &ChatClientConfig {
        &self.config
    }

    /// Start a chat turn and return its decoded chunks
    pub async fn stream_chat(&self, request: &ChatRequest) -> Result<ChunkStream> {
        let mut builder = self.http_client.post(self.config.chat_url()).json(request);

        if let Some(token) = self.credentials.access_token().await {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Chat request rejected");
            return Err(StreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        if response.content_length() == Some(0) {
            return Err(StreamError::EmptyBody);
        }

        tracing::debug!(url = %response.url(), "Chat stream opened");
        Ok(parse_chunk_stream(response))
    }

    /// Start a chat turn and return display-ready render events
    pub async fn render_chat(&self, request: &ChatRequest) -> Result<RenderStream> {
        let chunks = self.stream_chat(request).await?;
        Ok(render_turn(chunks))
    }
}
