//! Axum extractor for the authenticated caller.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use clipshelf_core::AppError;
use uuid::Uuid;

use crate::error::HttpAppError;
use crate::state::AppState;

/// Authenticated user id, extracted from the `Authorization: Bearer` header.
/// Handlers that take this extractor reject unauthenticated requests with 401
/// before any of their own logic runs.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = HttpAppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| {
                HttpAppError(AppError::Unauthorized(
                    "Missing authorization header".to_string(),
                ))
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            HttpAppError(AppError::Unauthorized(
                "Invalid authorization header format".to_string(),
            ))
        })?;

        let user_id = state.jwt.validate_token(token)?;
        Ok(AuthUser(user_id))
    }
}
