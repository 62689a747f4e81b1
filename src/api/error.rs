//! Error responses of the HTTP API.
//!
//! Every handler failure, malformed bodies and path ids included, is rendered as
//! `{"error": "<message>"}`. Storage faults carry
//! only a short public message; the full cause is logged where it happened.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed body or path parameter.
    #[error("{0}")]
    BadRequest(&'static str),

    /// Request conflicts with existing data (duplicate email).
    #[error("{0}")]
    Conflict(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    /// No `authorization` header on a protected route.
    #[error("No token provided")]
    MissingToken,

    /// Token present but bad signature, malformed or expired.
    #[error("Failed to authenticate token")]
    InvalidToken,

    /// Storage or other server-side fault. The message is safe to show.
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MissingToken => StatusCode::FORBIDDEN,
            Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

/// Log an internal error and turn it into a sanitized response.
///
/// `public` is what the client sees; the error chain only goes to the log.
pub fn internal_error<E>(public: &'static str) -> impl FnOnce(E) -> ApiError
where
    E: Into<anyhow::Error>,
{
    move |e| {
        let e: anyhow::Error = e.into();
        tracing::error!("{}: {:#}", public, e);
        ApiError::Internal(public)
    }
}
