use serde::{Deserialize, Serialize};

/// Which credential slot an auth provider occupies on a tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthKind {
    #[serde(rename = "oauth")]
    OAuth,
    ApiKey,
}

impl AuthKind {
    /// Edge label shown between a tool and its auth provider
    pub fn label(&self) -> &'static str {
        match self {
            AuthKind::OAuth => "OAuth",
            AuthKind::ApiKey => "API Key",
        }
    }

    /// Wire field on `Tool` that holds the provider id for this kind
    pub fn tool_field(&self) -> &'static str {
        match self {
            AuthKind::OAuth => "oAuthProviderId",
            AuthKind::ApiKey => "apiKeyProviderId",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpServer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, rename = "oAuthProviderId")]
    pub oauth_provider_id: Option<String>,
    #[serde(default)]
    pub api_key_provider_id: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl Tool {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            method: "GET".to_string(),
            url: String::new(),
            enabled: true,
            oauth_provider_id: None,
            api_key_provider_id: None,
        }
    }

    pub fn with_endpoint(mut self, method: impl Into<String>, url: impl Into<String>) -> Self {
        self.method = method.into();
        self.url = url.into();
        self
    }

    pub fn with_oauth_provider(mut self, provider_id: impl Into<String>) -> Self {
        self.oauth_provider_id = Some(provider_id.into());
        self
    }

    pub fn with_api_key_provider(mut self, provider_id: impl Into<String>) -> Self {
        self.api_key_provider_id = Some(provider_id.into());
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn has_auth(&self) -> bool {
        self.oauth_provider_id.is_some() || self.api_key_provider_id.is_some()
    }

    /// The provider that drives the graph topology for this tool.
    ///
    /// OAuth wins when both slots are filled.
    pub fn auth_provider(&self) -> Option<(AuthKind, &str)> {
        self.oauth_provider_id
            .as_deref()
            .map(|id| (AuthKind::OAuth, id))
            .or_else(|| {
                self.api_key_provider_id
                    .as_deref()
                    .map(|id| (AuthKind::ApiKey, id))
            })
    }

    /// Provider id currently held in the slot for `kind`
    pub fn provider_for(&self, kind: AuthKind) -> Option<&str> {
        match kind {
            AuthKind::OAuth => self.oauth_provider_id.as_deref(),
            AuthKind::ApiKey => self.api_key_provider_id.as_deref(),
        }
    }

    pub fn set_provider(&mut self, kind: AuthKind, provider_id: Option<String>) {
        match kind {
            AuthKind::OAuth => self.oauth_provider_id = provider_id,
            AuthKind::ApiKey => self.api_key_provider_id = provider_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthProvider {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub client_id: String,
}

impl OAuthProvider {
    pub fn new(id: impl Into<String>, name: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            client_id: client_id.into(),
        }
    }

    /// A provider without a client id cannot complete an OAuth flow.
    pub fn has_client_id(&self) -> bool {
        !self.client_id.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyProvider {
    pub id: String,
    pub name: String,
}

impl ApiKeyProvider {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
