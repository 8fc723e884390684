/// Actor extraction from bearer tokens
use crate::{
    context::AppContext,
    error::{AppError, AppResult},
};
use axum::http::HeaderMap;

/// Extract bearer token from Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.to_string())
}

/// Require an authenticated actor, or fail with 401
pub fn require_actor(ctx: &AppContext, headers: &HeaderMap) -> AppResult<String> {
    let token = extract_bearer_token(headers)
        .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

    ctx.auth.verify(&token)
}

/// Resolve the current actor if a valid token is present
///
/// Endpoints with actor-dependent derived fields accept anonymous callers;
/// an absent or invalid token reads as "no actor", not an error.
pub fn current_actor(ctx: &AppContext, headers: &HeaderMap) -> Option<String> {
    extract_bearer_token(headers).and_then(|token| ctx.auth.verify(&token).ok())
}
