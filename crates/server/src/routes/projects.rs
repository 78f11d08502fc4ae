use axum::{
    Router,
    extract::{Json, Multipart, Path, State},
    response::Json as ResponseJson,
    routing::{get, post, put},
};
use db::models::project::{CreateProject, Project, UpdateProject};
use serde::{Deserialize, Serialize};
use services::services::{content::Confirm, error::StoreError};
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, guard::AdminUser, routes::json_with_file};

/// Full replacement order for the portfolio grid, every current row id
/// exactly once.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct ReorderRequest {
    pub ordered_ids: Vec<Uuid>,
}

pub async fn list_projects(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Project>>>, ApiError> {
    let projects = Project::find_all(&state.db().pool)
        .await
        .map_err(StoreError::from)?;
    Ok(ResponseJson(ApiResponse::success(projects)))
}

pub async fn create_project(
    _admin: AdminUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    let (data, image) = json_with_file::<CreateProject>(multipart).await?;
    let project = state.content().create_project(data, image).await?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

pub async fn update_project(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    let (data, image) = json_with_file::<UpdateProject>(multipart).await?;
    let project = state.content().update_project(id, data, image).await?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

/// Deleting is confirmed client-side; the request itself is the confirmation.
pub async fn delete_project(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    state.content().delete_project(id, Confirm::Confirmed).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn reorder_projects(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<ReorderRequest>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    state.content().reorder_projects(&payload.ordered_ids).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(_state: &AppState) -> Router<AppState> {
    Router::new().nest(
        "/projects",
        Router::new()
            .route("/", get(list_projects).post(create_project))
            .route("/reorder", post(reorder_projects))
            .route("/{id}", put(update_project).delete(delete_project)),
    )
}
