use axum::http::{StatusCode, Uri};

use crate::app::errors::ApiError;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound {
        message: format!("No route for {}", uri.path()),
    }
}
