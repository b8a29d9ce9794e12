use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use mcpdeck_stream::CredentialProvider;

/// Request-scoped credentials: the caller's bearer token, else the service token
#[derive(Clone, Default)]
pub struct ForwardedToken {
    caller: Option<String>,
    fallback: Option<String>,
}

impl ForwardedToken {
    pub fn new(caller: Option<String>, fallback: Option<String>) -> Self {
        Self { caller, fallback }
    }

    pub fn from_headers(headers: &HeaderMap, fallback: Option<String>) -> Self {
        let caller = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());

        Self::new(caller, fallback)
    }

    pub fn is_forwarded(&self) -> bool {
        self.caller.is_some()
    }
}

impl std::fmt::Debug for ForwardedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForwardedToken")
            .field("forwarded", &self.caller.is_some())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

#[async_trait]
impl CredentialProvider for ForwardedToken {
    async fn access_token(&self) -> Option<String> {
        self.caller.clone().or_else(|| self.fallback.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[tokio::test]
    async fn test_caller_token_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer user-token"));

        let creds = ForwardedToken::from_headers(&headers, Some("service".to_string()));
        assert!(creds.is_forwarded());
        assert_eq!(creds.access_token().await.as_deref(), Some("user-token"));
    }

    #[tokio::test]
    async fn test_falls_back_to_service_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));

        let creds = ForwardedToken::from_headers(&headers, Some("service".to_string()));
        assert!(!creds.is_forwarded());
        assert_eq!(creds.access_token().await.as_deref(), Some("service"));

        let none = ForwardedToken::from_headers(&HeaderMap::new(), None);
        assert_eq!(none.access_token().await, None);
    }

    #[test]
    fn test_debug_hides_tokens() {
        let creds = ForwardedToken::new(Some("secret".to_string()), None);
        assert!(!format!("{:?}", creds).contains("secret"));
    }
}
