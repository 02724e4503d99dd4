use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::{currencies::services::LifecycleError, rates::services::RatesError};

#[derive(Serialize)]
pub struct ErrorRep {
    pub message: String,
}

pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    BadGateway,
    InternalServerError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message),
            Self::Conflict(message) => (StatusCode::CONFLICT, message),
            Self::BadGateway => (
                StatusCode::BAD_GATEWAY,
                "Failed to fetch data from the upstream rate source.".to_owned(),
            ),
            // Internal details are logged, never serialized into the body.
            Self::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error.".to_owned(),
            ),
        };

        (status, Json(ErrorRep { message })).into_response()
    }
}

impl From<LifecycleError> for ApiError {
    fn from(error: LifecycleError) -> Self {
        match error {
            LifecycleError::InvalidArgument(message) => Self::BadRequest(message),
            LifecycleError::NotFound(message) => Self::NotFound(message),
            LifecycleError::AlreadyExists(message) => Self::Conflict(message),
            LifecycleError::Unexpected(error) => {
                error!(?error, "Unexpected error from the lifecycle service.");

                Self::InternalServerError
            }
        }
    }
}

impl From<RatesError> for ApiError {
    fn from(error: RatesError) -> Self {
        match error {
            RatesError::Upstream(error) => {
                error!(?error, "Rate source request failed.");

                Self::BadGateway
            }
            RatesError::Unexpected(error) => {
                error!(?error, "Unexpected error from the rates service.");

                Self::InternalServerError
            }
        }
    }
}

pub type ApiResponse<T> = Result<T, ApiError>;
