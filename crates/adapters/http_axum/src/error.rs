//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use homewise_domain::error::{HomewiseError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`HomewiseError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(HomewiseError);

impl From<HomewiseError> for ApiError {
    fn from(err: HomewiseError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(HomewiseError::Validation(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            HomewiseError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            HomewiseError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            HomewiseError::Conflict(err) => (StatusCode::CONFLICT, err.to_string()),
            HomewiseError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
