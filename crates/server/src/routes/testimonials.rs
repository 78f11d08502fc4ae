use axum::{
    Router,
    extract::{Multipart, Path, State},
    response::Json as ResponseJson,
    routing::{get, put},
};
use db::models::testimonial::{CreateTestimonial, Testimonial, UpdateTestimonial};
use services::services::{content::Confirm, error::StoreError};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, guard::AdminUser, routes::json_with_file};

pub async fn list_testimonials(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Testimonial>>>, ApiError> {
    let rows = Testimonial::find_all(&state.db().pool)
        .await
        .map_err(StoreError::from)?;
    Ok(ResponseJson(ApiResponse::success(rows)))
}

pub async fn create_testimonial(
    _admin: AdminUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<ResponseJson<ApiResponse<Testimonial>>, ApiError> {
    let (data, image) = json_with_file::<CreateTestimonial>(multipart).await?;
    let row = state.content().create_testimonial(data, image).await?;
    Ok(ResponseJson(ApiResponse::success(row)))
}

pub async fn update_testimonial(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<ResponseJson<ApiResponse<Testimonial>>, ApiError> {
    let (data, image) = json_with_file::<UpdateTestimonial>(multipart).await?;
    let row = state.content().update_testimonial(id, data, image).await?;
    Ok(ResponseJson(ApiResponse::success(row)))
}

pub async fn delete_testimonial(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    state
        .content()
        .delete_testimonial(id, Confirm::Confirmed)
        .await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(_state: &AppState) -> Router<AppState> {
    Router::new().nest(
        "/testimonials",
        Router::new()
            .route("/", get(list_testimonials).post(create_testimonial))
            .route("/{id}", put(update_testimonial).delete(delete_testimonial)),
    )
}
