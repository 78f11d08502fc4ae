use axum::{
    Router,
    extract::{Multipart, Path, State},
    response::Json as ResponseJson,
    routing::{get, put},
};
use db::models::client_logo::{ClientLogo, CreateClientLogo, UpdateClientLogo};
use services::services::{content::Confirm, error::StoreError};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, guard::AdminUser, routes::json_with_file};

pub async fn list_client_logos(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<ClientLogo>>>, ApiError> {
    let rows = ClientLogo::find_all(&state.db().pool)
        .await
        .map_err(StoreError::from)?;
    Ok(ResponseJson(ApiResponse::success(rows)))
}

pub async fn create_client_logo(
    _admin: AdminUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<ResponseJson<ApiResponse<ClientLogo>>, ApiError> {
    let (data, logo) = json_with_file::<CreateClientLogo>(multipart).await?;
    let row = state.content().create_client_logo(data, logo).await?;
    Ok(ResponseJson(ApiResponse::success(row)))
}

pub async fn update_client_logo(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<ResponseJson<ApiResponse<ClientLogo>>, ApiError> {
    let (data, logo) = json_with_file::<UpdateClientLogo>(multipart).await?;
    let row = state.content().update_client_logo(id, data, logo).await?;
    Ok(ResponseJson(ApiResponse::success(row)))
}

pub async fn delete_client_logo(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    state
        .content()
        .delete_client_logo(id, Confirm::Confirmed)
        .await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(_state: &AppState) -> Router<AppState> {
    Router::new().nest(
        "/client-logos",
        Router::new()
            .route("/", get(list_client_logos).post(create_client_logo))
            .route("/{id}", put(update_client_logo).delete(delete_client_logo)),
    )
}
