use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::{db::DbError, validation::ValidationError};

/// Domain failure kinds returned by every service.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),
    #[error("already exists")]
    AlreadyExists,
    #[error("not found")]
    NotFound,
    #[error("access to entity denied")]
    PermissionDenied,
    #[error("service not available")]
    ServiceUnavailable,
}

impl ServiceError {
    /// Reads: a missing row is `NotFound`, anything else is an outage.
    pub fn from_lookup(err: DbError) -> Self {
        match err {
            DbError::NotFound => ServiceError::NotFound,
            _ => ServiceError::ServiceUnavailable,
        }
    }

    /// Writes: a constraint conflict is `AlreadyExists`, anything else is an outage.
    pub fn from_write(err: DbError) -> Self {
        match err {
            DbError::Conflict => ServiceError::AlreadyExists,
            _ => ServiceError::ServiceUnavailable,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// Error returned by handlers and middleware; always renders `{"message": ...}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(reason) => Self::bad_request(reason.to_string()),
            ServiceError::AlreadyExists => Self::new(StatusCode::CONFLICT, "Already exists"),
            ServiceError::NotFound => Self::new(StatusCode::NOT_FOUND, "Not found"),
            ServiceError::PermissionDenied => Self::new(StatusCode::FORBIDDEN, "Access forbidden"),
            ServiceError::ServiceUnavailable => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "something wrong in server")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                message: self.message,
            }),
        )
            .into_response()
    }
}
