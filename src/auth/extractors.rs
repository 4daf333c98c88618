use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use super::claims::Payload;
use crate::{error::ApiError, state::AppState};

pub const ERR_INVALID_AUTH_HEADER: &str = "auth header is empty or not supported by server";
pub const ERR_UNSUPPORTED_AUTH_HEADER: &str = "unsupported auth header by user";
pub const ERR_INVALID_TOKEN: &str = "invalid token";
pub const ERR_CREDENTIALS_NOT_FOUND: &str = "user info not found";

const SUPPORTED_SCHEME: &str = "bearer";

/// Verifies the bearer token and stores its payload in the request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default();
    let token = bearer_token(header)?;

    let payload = state.tokens.verify_token(token).map_err(|e| {
        warn!(error = %e, "token verification failed");
        ApiError::unauthorized(ERR_INVALID_TOKEN)
    })?;

    req.extensions_mut().insert(payload);
    Ok(next.run(req).await)
}

fn bearer_token(header: &str) -> Result<&str, ApiError> {
    if header.is_empty() {
        return Err(ApiError::unauthorized(ERR_INVALID_AUTH_HEADER));
    }

    let parts: Vec<&str> = header.split(' ').collect();
    if parts.len() != 2 || !parts[0].eq_ignore_ascii_case(SUPPORTED_SCHEME) {
        return Err(ApiError::unauthorized(ERR_UNSUPPORTED_AUTH_HEADER));
    }

    if parts[1].is_empty() {
        return Err(ApiError::unauthorized(ERR_INVALID_TOKEN));
    }
    Ok(parts[1])
}

/// Identity attached by `require_auth`.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Payload);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Payload>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| ApiError::unauthorized(ERR_CREDENTIALS_NOT_FOUND))
    }
}
