use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::services::{
    auth::AuthError, content::ContentError, error::StoreError, storage::StorageError,
};
use utils::response::ApiResponse;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("{0}")]
    BadRequest(String),
    #[error("authentication required")]
    Unauthorized,
    #[error("administrator access required")]
    Forbidden,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::Unauthorized) => StatusCode::UNAUTHORIZED,
            ApiError::Store(StoreError::Conflict(_)) => StatusCode::CONFLICT,
            ApiError::Store(StoreError::Transient(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Content(ContentError::MissingField(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Content(ContentError::ReorderMismatch) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Content(ContentError::Store(e)) => ApiError::Store(e.clone()).status(),
            ApiError::Content(ContentError::Upload(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Auth(AuthError::NotAdministrator) => StatusCode::FORBIDDEN,
            ApiError::Auth(AuthError::AccessDenied) => StatusCode::FORBIDDEN,
            ApiError::Auth(AuthError::InvalidEmail) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Auth(AuthError::WeakPassword) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Auth(AuthError::AlreadyRegistered) => StatusCode::CONFLICT,
            ApiError::Auth(AuthError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            ApiError::Auth(AuthError::UnknownSession) => StatusCode::UNAUTHORIZED,
            ApiError::Auth(AuthError::Store(e)) => ApiError::Store(e.clone()).status(),
            ApiError::Storage(StorageError::InvalidScope(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Storage(StorageError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body: ApiResponse<()> = ApiResponse::error(&self.to_string());
        (status, Json(body)).into_response()
    }
}
