use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration of the tool-creation chat endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatClientConfig {
    pub base_url: String,
    #[serde(default = "default_chat_path")]
    pub chat_path: String,
    /// Generation requests run much longer than ordinary API calls
    #[serde(default = "default_stream_timeout_secs")]
    pub stream_timeout_secs: u64,
}

fn default_chat_path() -> String {
    "/ai/tool-creation/chat".to_string()
}

fn default_stream_timeout_secs() -> u64 {
    300
}

impl ChatClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            chat_path: default_chat_path(),
            stream_timeout_secs: default_stream_timeout_secs(),
        }
    }

    pub fn with_chat_path(mut self, path: impl Into<String>) -> Self {
        self.chat_path = path.into();
        self
    }

    pub fn with_stream_timeout(mut self, timeout: Duration) -> Self {
        self.stream_timeout_secs = timeout.as_secs();
        self
    }

    pub fn stream_timeout(&self) -> Duration {
        Duration::from_secs(self.stream_timeout_secs)
    }

    pub fn chat_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.chat_path.trim_start_matches('/')
        )
    }
}
