use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use catalog_infra::store::StoreError;

/// Failures surfaced by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A request value could not be compared against a typed field.
    #[error("Invalid query parameter: {0}")]
    InvalidParameter(String),

    #[error("Not Found")]
    NotFound { message: String },

    #[error("Server Error")]
    Server { message: String },
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::TypeMismatch { path, .. } => ApiError::InvalidParameter(path),
            other => ApiError::Server {
                message: other.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self.to_string();
        match self {
            ApiError::InvalidParameter(_) => json_error(StatusCode::BAD_REQUEST, error, None),
            ApiError::NotFound { message } => {
                json_error(StatusCode::NOT_FOUND, error, Some(message))
            }
            ApiError::Server { message } => {
                tracing::error!(%message, "request failed");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, error, Some(message))
            }
        }
    }
}

/// `{ success: false, error, message? }` failure envelope.
pub fn json_error(status: StatusCode, error: impl Into<String>, message: Option<String>) -> Response {
    let mut body = json!({
        "success": false,
        "error": error.into(),
    });
    if let Some(message) = message {
        body["message"] = json!(message);
    }
    (status, axum::Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_mismatch_names_the_field() {
        let err = ApiError::from(StoreError::type_mismatch("price.value", "cast failed"));
        assert_eq!(err.to_string(), "Invalid query parameter: price.value");
    }

    #[test]
    fn other_store_errors_are_server_errors() {
        let err = ApiError::from(StoreError::backend("connection reset"));
        match err {
            ApiError::Server { message } => assert!(message.contains("connection reset")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn statuses_match_variants() {
        let cases = [
            (ApiError::InvalidParameter("capacity".into()), StatusCode::BAD_REQUEST),
            (
                ApiError::NotFound {
                    message: "x".into(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::Server {
                    message: "x".into(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
