/*
 * Responsibility
 * - AppError: the single HTTP error type of the service
 * - IntoResponse (HTTP status / JSON error body)
 * - ResourceError / AuthError mapped in one place
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::resource::ResourceError;
use crate::services::auth::{AuthError, ResolveError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppError {
    #[error("{message}")]
    BadRequest { code: &'static str, message: String },
    #[error("unauthorized")]
    Unauthorized,
    #[error("{message}")]
    Forbidden { message: String },
    #[error("not found")]
    NotFound,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("conflict")]
    Conflict,
    #[error("precondition failed")]
    PreconditionFailed,
    #[error("{message}")]
    Internal { message: String },
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Conflict => StatusCode::CONFLICT,
            AppError::PreconditionFailed => StatusCode::PRECONDITION_FAILED,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::BadRequest { code, .. } => code,
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden { .. } => "FORBIDDEN",
            AppError::NotFound => "NOT_FOUND",
            AppError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            AppError::Conflict => "CONFLICT",
            AppError::PreconditionFailed => "PRECONDITION_FAILED",
            AppError::Internal { .. } => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ResourceError> for AppError {
    fn from(e: ResourceError) -> Self {
        match e {
            ResourceError::NotFound => AppError::NotFound,
            // authenticated (or anonymous) but not allowed on this item
            ResourceError::Unauthorized => AppError::forbidden("unauthorized"),
            ResourceError::Conflict => AppError::Conflict,
            ResourceError::PreconditionFailed => AppError::PreconditionFailed,
            ResourceError::MethodNotAllowed => AppError::MethodNotAllowed,
            ResourceError::Validation(message) => AppError::bad_request("VALIDATION", message),
            ResourceError::Storage(message) => AppError::internal(message),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Token(_) => AppError::Unauthorized,
            AuthError::Claim(err) => AppError::bad_request("MISSING_CLAIM", err.to_string()),
            AuthError::Resolve(ResolveError::NotFound) => {
                AppError::forbidden("principal not found")
            }
            AuthError::Resolve(ResolveError::Unauthorized) => AppError::forbidden("unauthorized"),
            AuthError::Resolve(ResolveError::Store(message)) => AppError::internal(message),
        }
    }
}
