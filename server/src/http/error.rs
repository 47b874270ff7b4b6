use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage_backend::StorageError;
use tracing::warn;

use super::dto::ErrorResponse;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Unavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not Found", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "Bad Request", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "Write Conflict", msg),
            ApiError::Unavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "Backend Unavailable", msg)
            }
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            details: Some(details),
        });

        (status, body).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::WriteConflict { .. } => ApiError::Conflict(err.to_string()),
            StorageError::ObjectNotFound(_) => ApiError::NotFound(err.to_string()),
            StorageError::StreamAborted { .. } => ApiError::BadRequest(err.to_string()),
            StorageError::BackendUnavailable { .. } => {
                warn!("Storage backend failure: {}", err);
                ApiError::Unavailable(err.to_string())
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn error_body(response: Response) -> ErrorResponse {
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_api_error_not_found() {
        let response = ApiError::NotFound("Object not found: a/b".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let error_response = error_body(response).await;
        assert_eq!(error_response.error, "Not Found");
        assert_eq!(
            error_response.details,
            Some("Object not found: a/b".to_string())
        );
    }

    #[tokio::test]
    async fn test_write_conflict_conversion() {
        let storage_err = StorageError::WriteConflict {
            address: "images/bad//key".to_string(),
            reason: "empty path segment".to_string(),
        };
        let response = ApiError::from(storage_err).into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);

        let error_response = error_body(response).await;
        assert_eq!(error_response.error, "Write Conflict");
        assert!(error_response.details.unwrap().contains("images/bad//key"));
    }

    #[tokio::test]
    async fn test_backend_unavailable_conversion() {
        let storage_err = StorageError::BackendUnavailable {
            address: "images/cat.png".to_string(),
            source: "connection refused".into(),
        };
        let response = ApiError::from(storage_err).into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_stream_aborted_is_a_bad_request() {
        let storage_err = StorageError::StreamAborted {
            address: "images/cat.png".to_string(),
            reason: "client went away".to_string(),
        };

        match ApiError::from(storage_err) {
            ApiError::BadRequest(msg) => assert!(msg.contains("client went away")),
            other => panic!("Expected BadRequest, got {other:?}"),
        }
    }
}
