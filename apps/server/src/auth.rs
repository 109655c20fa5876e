//! Authenticated-user extraction.
//!
//! Session validation happens upstream; the auth gateway injects the
//! `x-user-id` header after verifying the caller's token. This extractor is
//! the only code that reads that contract, so every handler takes an
//! [`AuthUser`] instead of touching headers itself.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated user id for the current request.
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| AuthUser(value.to_string()))
            .ok_or_else(|| ApiError::Unauthorized("Missing authenticated user context".to_string()))
    }
}
