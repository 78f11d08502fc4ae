use axum::{
    Router,
    extract::{Json, Multipart, State},
    response::Json as ResponseJson,
    routing::{get, post, put},
};
use db::models::profile::{Profile, UpdateProfile};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    guard::{AdminUser, MaybeSession},
    routes::json_with_file,
};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct SessionResponse {
    pub token: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub is_admin: bool,
}

pub async fn sign_up(
    State(state): State<AppState>,
    Json(creds): Json<Credentials>,
) -> Result<ResponseJson<ApiResponse<Uuid>>, ApiError> {
    let user_id = state.auth().sign_up(&creds.email, &creds.password).await?;
    Ok(ResponseJson(ApiResponse::success(user_id)))
}

pub async fn sign_in(
    State(state): State<AppState>,
    Json(creds): Json<Credentials>,
) -> Result<ResponseJson<ApiResponse<SessionResponse>>, ApiError> {
    let session = state.auth().sign_in(&creds.email, &creds.password).await?;
    // sign_in only completes for the administrator.
    Ok(ResponseJson(ApiResponse::success(SessionResponse {
        token: session.token,
        user_id: session.user_id,
        email: session.email,
        is_admin: true,
    })))
}

/// Clears the session if one was presented. Always succeeds, matching the
/// local-first sign-out semantics of the auth service.
pub async fn sign_out(
    MaybeSession(session): MaybeSession,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    if let Some(session) = session {
        state.auth().sign_out(session.token);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn current_session(
    MaybeSession(session): MaybeSession,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Option<SessionResponse>>>, ApiError> {
    let response = match session {
        Some(session) => {
            let is_admin = state.auth().is_admin(session.token).await?;
            Some(SessionResponse {
                token: session.token,
                user_id: session.user_id,
                email: session.email,
                is_admin,
            })
        }
        None => None,
    };
    Ok(ResponseJson(ApiResponse::success(response)))
}

/// Updates the signed-in administrator's own profile: name plus an optional
/// new avatar image.
pub async fn update_profile(
    admin: AdminUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<ResponseJson<ApiResponse<Profile>>, ApiError> {
    let (data, avatar) = json_with_file::<UpdateProfile>(multipart).await?;
    let profile = state
        .content()
        .update_profile(admin.0.user_id, data, avatar)
        .await?;
    Ok(ResponseJson(ApiResponse::success(profile)))
}

pub fn router(_state: &AppState) -> Router<AppState> {
    Router::new().nest(
        "/auth",
        Router::new()
            .route("/sign-up", post(sign_up))
            .route("/sign-in", post(sign_in))
            .route("/sign-out", post(sign_out))
            .route("/session", get(current_session))
            .route("/profile", put(update_profile)),
    )
}
