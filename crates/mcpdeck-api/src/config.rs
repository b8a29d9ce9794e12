use config::{Config as ConfigLoader, ConfigError, Environment, File};
use mcpdeck_stream::ChatClientConfig;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::retry::RetryPolicy;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub upstream: UpstreamConfig,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub upstream_service_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

/// The admin REST API that owns servers, tools and providers
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    #[serde(default)]
    pub chat_path: Option<String>,
    /// Chat turns can run for minutes, so they get their own timeout
    pub stream_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_millis(self.retry_base_delay_ms))
    }

    pub fn chat_client_config(&self) -> ChatClientConfig {
        let config = ChatClientConfig::new(self.base_url.clone())
            .with_stream_timeout(Duration::from_secs(self.stream_timeout_secs));
        match &self.chat_path {
            Some(path) => config.with_chat_path(path.clone()),
            None => config,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables such as `MCPDECK_SERVER__PORT` or `MCPDECK_UPSTREAM__BASE_URL`
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("MCPDECK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;

        let mut cfg: Config = config.try_deserialize()?;

        // Optional: without it, only callers that send their own token get through
        cfg.upstream_service_token = std::env::var("UPSTREAM_SERVICE_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOML: &str = r#"
        [server]
        host = "127.0.0.1"
        port = 3000

        [cors]
        enabled = true
        origins = ["http://localhost:3000"]

        [upstream]
        base_url = "http://localhost:4000/api"
        timeout_secs = 10
        stream_timeout_secs = 600
        max_retries = 2
        retry_base_delay_ms = 50

        [logging]
        level = "debug"
        format = "json"
    "#;

    #[test]
    fn test_config_structure() {
        let config: Config = toml::from_str(TOML).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.request_timeout_secs, 300);
        assert_eq!(config.upstream.timeout(), Duration::from_secs(10));
        assert_eq!(config.logging.format, "json");
        assert!(config.upstream_service_token.is_none());
    }

    #[test]
    fn test_chat_client_config() {
        let mut config: Config = toml::from_str(TOML).unwrap();

        let chat = config.upstream.chat_client_config();
        assert_eq!(chat.chat_url(), "http://localhost:4000/api/ai/tool-creation/chat");
        assert_eq!(chat.stream_timeout(), Duration::from_secs(600));

        config.upstream.chat_path = Some("/chat".to_string());
        assert_eq!(
            config.upstream.chat_client_config().chat_url(),
            "http://localhost:4000/api/chat"
        );
    }

    #[test]
    fn test_retry_policy_from_config() {
        let config: Config = toml::from_str(TOML).unwrap();
        let policy = config.upstream.retry_policy();
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(50));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(100));
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join("mcpdeck-api-config-test.toml");
        std::fs::write(&path, TOML).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.upstream.max_retries, 2);

        std::fs::remove_file(&path).ok();
    }
}
