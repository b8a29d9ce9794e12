use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mcpdeck_graph::{ConnectError, GraphError};
use mcpdeck_stream::StreamError;
use serde_json::json;
use thiserror::Error;

use crate::upstream::UpstreamError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Upstream(#[from] UpstreamError),

    #[error("Chat stream error: {0}")]
    Stream(#[from] StreamError),

    #[error("{0}")]
    Graph(#[from] GraphError),

    #[error("{0}")]
    Connect(#[from] ConnectError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            ApiError::Upstream(UpstreamError::Client(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Stream(StreamError::Client(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Stream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Graph(GraphError::NodeNotFound(_) | GraphError::EdgeNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Graph(GraphError::DuplicateNode(_)) => StatusCode::CONFLICT,
            ApiError::Graph(GraphError::InvalidPatch { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Connect(ConnectError::SlotOccupied { .. }) => StatusCode::CONFLICT,
            ApiError::Connect(_) => StatusCode::BAD_REQUEST,
            ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if status.is_server_error() {
            tracing::error!(status = %status, "{}", self);
            match &self {
                ApiError::Config(_) | ApiError::Upstream(UpstreamError::Client(_)) => {
                    "Configuration error".to_string()
                }
                ApiError::Stream(StreamError::Client(_)) => "Configuration error".to_string(),
                _ => self.to_string(),
            }
        } else {
            tracing::debug!(status = %status, "{}", self);
            self.to_string()
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
