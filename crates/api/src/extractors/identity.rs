//! Caller identity extractor.
//!
//! Authentication happens upstream; the gateway forwards the established
//! identity as trusted headers. This extractor only materializes them —
//! it never validates credentials itself.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::ApiError;

/// Header carrying the authenticated user's ID.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the caller's coarse role ("user" or "operator").
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// The caller's authenticated identity.
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    /// User ID established by upstream authentication.
    pub user_id: Uuid,
    /// System operators bypass per-city rank checks.
    pub operator: bool,
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing identity header".to_string()))?;

        let user_id = Uuid::parse_str(user_id)
            .map_err(|_| ApiError::Unauthorized("Malformed identity header".to_string()))?;

        let operator = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|role| role.eq_ignore_ascii_case("operator"))
            .unwrap_or(false);

        Ok(Identity { user_id, operator })
    }
}
