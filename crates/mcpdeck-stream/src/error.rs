use thiserror::Error;

/// Failures that prevent a chat stream from starting
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Chat API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Chat API returned an empty response body")]
    EmptyBody,
}

pub type Result<T> = std::result::Result<T, StreamError>;
