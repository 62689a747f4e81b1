//! Token guard for note routes.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use super::error::ApiError;
use super::AppState;

/// Identity of the caller, inserted into request extensions by [`require_token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub i64);

/// Reject requests without a valid session token.
///
/// The token is the raw `authorization` header value, with no scheme prefix.
/// Validation is stateless: signature and expiry only.
pub async fn require_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .filter(|h| !h.is_empty());

    let Some(header) = header else {
        tracing::warn!("Missing authorization header");
        return Err(ApiError::MissingToken);
    };

    let token = header.to_str().map_err(|_| {
        tracing::warn!("Authorization header is not valid text");
        ApiError::InvalidToken
    })?;

    let claims = state.tokens.verify(token).map_err(|e| {
        tracing::warn!("Rejected token: {}", e);
        ApiError::InvalidToken
    })?;

    request.extensions_mut().insert(AuthUser(claims.id));
    Ok(next.run(request).await)
}
