use axum::{
    Router,
    extract::{Multipart, Path, State},
    response::Json as ResponseJson,
    routing::{get, put},
};
use db::models::software_logo::{CreateSoftwareLogo, SoftwareLogo, UpdateSoftwareLogo};
use services::services::{content::Confirm, error::StoreError};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, guard::AdminUser, routes::json_with_file};

pub async fn list_software_logos(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<SoftwareLogo>>>, ApiError> {
    let rows = SoftwareLogo::find_all(&state.db().pool)
        .await
        .map_err(StoreError::from)?;
    Ok(ResponseJson(ApiResponse::success(rows)))
}

pub async fn create_software_logo(
    _admin: AdminUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<ResponseJson<ApiResponse<SoftwareLogo>>, ApiError> {
    let (data, logo) = json_with_file::<CreateSoftwareLogo>(multipart).await?;
    let row = state.content().create_software_logo(data, logo).await?;
    Ok(ResponseJson(ApiResponse::success(row)))
}

pub async fn update_software_logo(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<ResponseJson<ApiResponse<SoftwareLogo>>, ApiError> {
    let (data, logo) = json_with_file::<UpdateSoftwareLogo>(multipart).await?;
    let row = state.content().update_software_logo(id, data, logo).await?;
    Ok(ResponseJson(ApiResponse::success(row)))
}

pub async fn delete_software_logo(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    state
        .content()
        .delete_software_logo(id, Confirm::Confirmed)
        .await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(_state: &AppState) -> Router<AppState> {
    Router::new().nest(
        "/software-logos",
        Router::new()
            .route("/", get(list_software_logos).post(create_software_logo))
            .route(
                "/{id}",
                put(update_software_logo).delete(delete_software_logo),
            ),
    )
}
