use axum::{extract::FromRequestParts, http::request::Parts};
use services::services::auth::{GuardDecision, Session};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

fn bearer_token(parts: &Parts) -> Option<Uuid> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .and_then(|t| Uuid::parse_str(t.trim()).ok())
}

/// Extractor that admits only a signed-in administrator. Routes that mutate
/// content take this as an argument; everything else stays public.
pub struct AdminUser(pub Session);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts);
        match state.auth().guard(token).await? {
            GuardDecision::Authorized => {
                // guard() only authorizes tokens it can resolve to a session.
                let session = token
                    .and_then(|t| state.auth().session(t))
                    .ok_or(ApiError::Unauthorized)?;
                Ok(AdminUser(session))
            }
            GuardDecision::RedirectLogin => Err(ApiError::Unauthorized),
            GuardDecision::RedirectHome => Err(ApiError::Forbidden),
        }
    }
}

/// Extractor for routes that report session state without requiring one.
pub struct MaybeSession(pub Option<Session>);

impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = bearer_token(parts).and_then(|t| state.auth().session(t));
        Ok(MaybeSession(session))
    }
}
