//! Errors raised while talking to a client.
//!
//! The route guide operations themselves never fail; these cover request
//! bodies and WebSocket frames the service could not read or write.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tokio_util::codec::LinesCodecError;

use crate::handlers::ErrorResponse;

/// Transport-level failure for a single call.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request body could not be read or split into lines.
    #[error("Failed to read request body: {0}")]
    Body(#[from] LinesCodecError),

    /// A message was not valid JSON for the expected type.
    #[error("Invalid JSON message: {0}")]
    Json(#[from] serde_json::Error),

    /// The WebSocket connection failed.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] axum::Error),
}

impl ApiError {
    /// HTTP status reported for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Body(_) | ApiError::Json(_) => StatusCode::BAD_REQUEST,
            ApiError::WebSocket(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(error = %self, status = status.as_u16(), "Request failed");
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
