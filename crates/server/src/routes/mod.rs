pub mod auth;
pub mod client_logos;
pub mod events;
pub mod projects;
pub mod settings;
pub mod software_logos;
pub mod testimonials;
pub mod uploads;

use axum::{Router, extract::Multipart};
use serde::de::DeserializeOwned;
use services::services::content::UploadedFile;

use crate::{AppState, error::ApiError};

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(projects::router(state))
        .merge(testimonials::router(state))
        .merge(client_logos::router(state))
        .merge(software_logos::router(state))
        .merge(settings::router(state))
        .merge(auth::router(state))
        .merge(uploads::router(state))
        .merge(events::router(state))
}

/// Parses the admin form convention used by the mutation routes: a `data`
/// part holding the JSON payload plus an optional `file` part.
pub(crate) async fn json_with_file<T: DeserializeOwned>(
    mut multipart: Multipart,
) -> Result<(T, Option<UploadedFile>), ApiError> {
    let mut data: Option<T> = None;
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("data") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                data = Some(
                    serde_json::from_str(&text)
                        .map_err(|e| ApiError::BadRequest(format!("invalid data payload: {e}")))?,
                );
            }
            Some("file") => {
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
            _ => {}
        }
    }

    let data = data.ok_or_else(|| ApiError::BadRequest("missing data part".to_string()))?;
    Ok((data, file))
}
