use std::sync::Arc;

use axum::http::HeaderMap;
use mcpdeck_stream::{CredentialProvider, ToolChatClient};

use crate::config::Config;
use crate::credentials::ForwardedToken;
use crate::error::{ApiError, ApiResult};
use crate::upstream::AdminApiClient;

/// Shared application state passed to all handlers
///
/// Both clients hold the service credentials; handlers swap in the caller's
/// token per request with [`AppState::credentials`].
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub admin: AdminApiClient,
    pub chat: ToolChatClient,
}

impl AppState {
    pub fn new(config: Config) -> ApiResult<Self> {
        let service: Arc<dyn CredentialProvider> =
            Arc::new(ForwardedToken::new(None, config.upstream_service_token.clone()));

        let admin = AdminApiClient::new(&config.upstream, service.clone())
            .map_err(|e| ApiError::Config(e.to_string()))?;
        let chat = ToolChatClient::new(config.upstream.chat_client_config(), service)
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self {
            config: Arc::new(config),
            admin,
            chat,
        })
    }

    pub fn credentials(&self, headers: &HeaderMap) -> Arc<dyn CredentialProvider> {
        Arc::new(ForwardedToken::from_headers(
            headers,
            self.config.upstream_service_token.clone(),
        ))
    }

    /// Admin client acting on behalf of the caller
    pub fn admin_for(&self, headers: &HeaderMap) -> AdminApiClient {
        self.admin.with_credentials(self.credentials(headers))
    }

    /// Chat client acting on behalf of the caller
    pub fn chat_for(&self, headers: &HeaderMap) -> ToolChatClient {
        self.chat.with_credentials(self.credentials(headers))
    }
}
