use axum::{
    Router,
    extract::{Json, Path, State},
    response::Json as ResponseJson,
    routing::{get, put},
};
use db::models::site_setting::SiteSetting;
use services::services::error::StoreError;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError, guard::AdminUser};

pub async fn list_settings(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<SiteSetting>>>, ApiError> {
    let rows = SiteSetting::find_all(&state.db().pool)
        .await
        .map_err(StoreError::from)?;
    Ok(ResponseJson(ApiResponse::success(rows)))
}

/// Seeded keys only; an unknown key is rejected rather than created.
pub async fn update_setting(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(value): Json<serde_json::Value>,
) -> Result<ResponseJson<ApiResponse<SiteSetting>>, ApiError> {
    let setting = state.content().update_setting(&key, value).await?;
    Ok(ResponseJson(ApiResponse::success(setting)))
}

pub fn router(_state: &AppState) -> Router<AppState> {
    Router::new().nest(
        "/settings",
        Router::new()
            .route("/", get(list_settings))
            .route("/{key}", put(update_setting)),
    )
}
