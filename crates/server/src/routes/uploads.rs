use axum::{
    Router,
    extract::{Multipart, Path, State},
    response::Json as ResponseJson,
    routing::post,
};
use serde::{Deserialize, Serialize};
use services::services::content::UploadedFile;
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError, guard::AdminUser};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UploadResponse {
    /// Path of the stored object relative to the asset root.
    pub path: String,
    /// URL to embed in records and serve back to visitors.
    pub url: String,
}

pub async fn upload(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(scope): Path<String>,
    mut multipart: Multipart,
) -> Result<ResponseJson<ApiResponse<UploadResponse>>, ApiError> {
    let mut file: Option<UploadedFile> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?
            .to_vec();
        file = Some(UploadedFile {
            file_name,
            content_type,
            bytes,
        });
    }
    let file = file.ok_or_else(|| ApiError::BadRequest("missing file part".to_string()))?;

    let (object, url) = state.content().upload_asset(&scope, file).await?;
    Ok(ResponseJson(ApiResponse::success(UploadResponse {
        path: object.path,
        url,
    })))
}

pub fn router(_state: &AppState) -> Router<AppState> {
    Router::new().route("/uploads/{scope}", post(upload))
}
