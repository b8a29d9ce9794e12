use std::sync::Arc;

use mcpdeck_graph::{AuthLinkChange, LayoutConfig, Position, WorkflowGraph, WorkflowGraphBuilder};
use mcpdeck_stream::CredentialProvider;
use mcpdeck_types::{ApiKeyProvider, AuthKind, McpServer, OAuthProvider, Tool};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::UpstreamConfig;
use crate::retry::{retry, RetryPolicy, Retryable};

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream returned {status}: {body}")]
    Status { status: u16, body: String },
}

impl UpstreamError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, UpstreamError::Status { status: 404, .. })
    }
}

impl Retryable for UpstreamError {
    fn is_transient(&self) -> bool {
        match self {
            UpstreamError::Transport(e) => e.is_timeout() || e.is_connect(),
            UpstreamError::Status { status, .. } => *status >= 500,
            UpstreamError::Client(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, UpstreamError>;

/// Client for the admin REST API that owns servers, tools and providers
#[derive(Clone)]
pub struct AdminApiClient {
    http_client: reqwest::Client,
    base_url: String,
    retry_policy: RetryPolicy,
    credentials: Arc<dyn CredentialProvider>,
}

impl AdminApiClient {
    pub fn new(config: &UpstreamConfig, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| UpstreamError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry_policy: config.retry_policy(),
            credentials,
        })
    }

    /// Same connection pool, different credentials
    pub fn with_credentials(&self, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            credentials,
            ..self.clone()
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.credentials.access_token().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get_once<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.authorize(self.http_client.get(url)).await.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let url = url.as_str();
        tracing::debug!(url, "GET upstream");

        retry(|| self.get_once(url), &self.retry_policy).await
    }

    pub async fn get_server(&self, server_id: &str) -> Result<McpServer> {
        self.get_json(&format!("/servers/{}", server_id)).await
    }

    pub async fn list_tools(&self, server_id: &str) -> Result<Vec<Tool>> {
        self.get_json(&format!("/servers/{}/tools", server_id)).await
    }

    pub async fn list_oauth_providers(&self) -> Result<Vec<OAuthProvider>> {
        self.get_json("/oauth-providers").await
    }

    pub async fn list_api_key_providers(&self) -> Result<Vec<ApiKeyProvider>> {
        self.get_json("/api-key-providers").await
    }

    /// Partially update a tool; never retried
    pub async fn update_tool(&self, tool_id: &str, patch: &Value) -> Result<()> {
        let url = self.url(&format!("/tools/{}", tool_id));
        let response = self
            .authorize(self.http_client.patch(&url).json(patch))
            .await
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(tool_id, status = %status, "Tool update rejected");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(tool_id, "Tool updated");
        Ok(())
    }

    pub async fn apply_link(&self, change: &AuthLinkChange) -> Result<()> {
        self.update_tool(&change.tool_id, &change.to_patch()).await
    }

    pub async fn set_tool_enabled(&self, tool_id: &str, enabled: bool) -> Result<()> {
        self.update_tool(tool_id, &json!({ "enabled": enabled })).await
    }

    /// Everything needed to draw one server's workflow, fetched concurrently
    pub async fn load_workflow(&self, server_id: &str) -> Result<WorkflowInputs> {
        let (server, tools, oauth_providers, api_key_providers) = tokio::try_join!(
            self.get_server(server_id),
            self.list_tools(server_id),
            self.list_oauth_providers(),
            self.list_api_key_providers(),
        )?;

        Ok(WorkflowInputs {
            server,
            tools,
            oauth_providers,
            api_key_providers,
        })
    }
}

#[derive(Debug, Clone)]
pub struct WorkflowInputs {
    pub server: McpServer,
    pub tools: Vec<Tool>,
    pub oauth_providers: Vec<OAuthProvider>,
    pub api_key_providers: Vec<ApiKeyProvider>,
}

impl WorkflowInputs {
    pub fn build(&self) -> WorkflowGraph {
        WorkflowGraphBuilder::new(&self.server)
            .tools(&self.tools)
            .oauth_providers(&self.oauth_providers)
            .api_key_providers(&self.api_key_providers)
            .build()
    }

    /// Add the palette node `node_id` refers to, if it names a known provider
    ///
    /// Palette nodes only live on the canvas, so a connection drawn from one
    /// has to be resolved against the provider lists.
    pub fn add_palette_node(&self, graph: &mut WorkflowGraph, node_id: &str) -> bool {
        if graph.node(node_id).is_some() {
            return false;
        }
        let Some(provider_id) = node_id.strip_prefix("auth-provider-") else {
            return false;
        };

        let resolved = self
            .oauth_providers
            .iter()
            .find(|p| p.id == provider_id)
            .map(|p| (AuthKind::OAuth, p.name.as_str(), p.has_client_id()))
            .or_else(|| {
                self.api_key_providers
                    .iter()
                    .find(|p| p.id == provider_id)
                    .map(|p| (AuthKind::ApiKey, p.name.as_str(), true))
            });

        match resolved {
            Some((kind, name, has_client_id)) => {
                let layout = LayoutConfig::default();
                let position = Position::new(layout.column_x(3), layout.center_y);
                graph
                    .add_auth_provider_node(kind, provider_id, name, has_client_id, position)
                    .is_ok()
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcpdeck_stream::StaticToken;

    fn inputs() -> WorkflowInputs {
        WorkflowInputs {
            server: McpServer {
                id: "s1".to_string(),
                name: "Billing".to_string(),
                description: None,
            },
            tools: vec![Tool::new("t1", "charge")],
            oauth_providers: vec![OAuthProvider::new("google", "Google", " ")],
            api_key_providers: vec![ApiKeyProvider::new("stripe", "Stripe")],
        }
    }

    #[test]
    fn test_transient_classification() {
        let server_error = UpstreamError::Status {
            status: 503,
            body: String::new(),
        };
        let not_found = UpstreamError::Status {
            status: 404,
            body: String::new(),
        };

        assert!(server_error.is_transient());
        assert!(!not_found.is_transient());
        assert!(not_found.is_not_found());
        assert!(!UpstreamError::Client("bad".to_string()).is_transient());
    }

    #[test]
    fn test_palette_node_resolution() {
        let inputs = inputs();
        let mut graph = inputs.build();

        assert!(inputs.add_palette_node(&mut graph, "auth-provider-stripe"));
        let node = graph.node("auth-provider-stripe").unwrap().as_auth_provider().unwrap();
        assert_eq!(node.kind, AuthKind::ApiKey);
        assert_eq!(node.name, "Stripe");

        assert!(inputs.add_palette_node(&mut graph, "auth-provider-google"));
        assert!(!graph.node("auth-provider-google").unwrap().as_auth_provider().unwrap().has_client_id);

        assert!(!inputs.add_palette_node(&mut graph, "auth-provider-unknown"));
        assert!(!inputs.add_palette_node(&mut graph, "tool-t1"));
    }

    #[test]
    fn test_base_url_is_normalized() {
        let config = UpstreamConfig {
            base_url: "http://localhost:4000/api/".to_string(),
            timeout_secs: 5,
            chat_path: None,
            stream_timeout_secs: 60,
            max_retries: 0,
            retry_base_delay_ms: 0,
        };
        let client = AdminApiClient::new(&config, Arc::new(StaticToken::new("t"))).unwrap();
        assert_eq!(client.url("/tools/t1"), "http://localhost:4000/api/tools/t1");
    }
}
