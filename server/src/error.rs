//! API error type and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::dto::FieldErrors;

/// Fixed message returned when no intermediary can price the conversion.
pub const NO_PATH_MESSAGE: &str = "No conversion path found";

#[derive(Error, Debug)]
pub enum ApiError {
    /// One or more request fields failed validation.
    #[error("Invalid request fields")]
    Validation(FieldErrors),
    #[error("{0}")]
    BadRequest(String),
    #[error("{}", NO_PATH_MESSAGE)]
    NoConversionPath,
}

/// Body of non-validation error responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            ApiError::BadRequest(reason) => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody { error: reason })).into_response()
            }
            ApiError::NoConversionPath => (
                StatusCode::NOT_FOUND,
                Json(ErrorBody {
                    error: NO_PATH_MESSAGE.to_string(),
                }),
            )
                .into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
