use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::assistant::AssistantError;
use crate::graph::GraphError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Empty query")]
    EmptyQuery,

    #[error("graph query failed: {0}")]
    Graph(#[from] GraphError),

    #[error("invalid request body: {}", .0.body_text())]
    InvalidBody(#[from] JsonRejection),
}

impl From<AssistantError> for GatewayError {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::EmptyQuery => GatewayError::EmptyQuery,
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            GatewayError::EmptyQuery => StatusCode::BAD_REQUEST,
            GatewayError::Graph(e) if e.is_retryable() => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::Graph(_) => StatusCode::BAD_GATEWAY,
            GatewayError::InvalidBody(rejection) => rejection.status(),
        };

        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = %self, "Request failed");
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}
