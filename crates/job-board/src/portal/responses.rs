use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::access::SessionError;
use crate::applications::ApplicationServiceError;
use crate::backend::RepositoryError;
use crate::companies::CompanyServiceError;
use crate::jobs::JobServiceError;

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({ "error": message.into() });
    (status, Json(payload)).into_response()
}

/// Body extraction failures get the same `{ "error": ... }` shape as every other error.
pub(crate) fn json_rejection(rejection: JsonRejection) -> Response {
    error_response(rejection.status(), rejection.body_text())
}

impl IntoResponse for RepositoryError {
    fn into_response(self) -> Response {
        match self {
            RepositoryError::NotFound => error_response(StatusCode::NOT_FOUND, self.to_string()),
            RepositoryError::Conflict => error_response(StatusCode::CONFLICT, self.to_string()),
            RepositoryError::Unavailable(ref detail) => {
                error!(%detail, "backend call failed");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        }
    }
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        match self {
            SessionError::Directory(err) => err.into_response(),
            other => error_response(StatusCode::UNAUTHORIZED, other.to_string()),
        }
    }
}

impl IntoResponse for CompanyServiceError {
    fn into_response(self) -> Response {
        match self {
            CompanyServiceError::NotFound => {
                error_response(StatusCode::NOT_FOUND, self.to_string())
            }
            CompanyServiceError::Validation(message) => {
                error_response(StatusCode::UNPROCESSABLE_ENTITY, message)
            }
            CompanyServiceError::Repository(err) => err.into_response(),
        }
    }
}

impl IntoResponse for JobServiceError {
    fn into_response(self) -> Response {
        match self {
            JobServiceError::AccessDenied => {
                error_response(StatusCode::FORBIDDEN, self.to_string())
            }
            JobServiceError::Validation(message) => {
                error_response(StatusCode::UNPROCESSABLE_ENTITY, message)
            }
            JobServiceError::Repository(err) => err.into_response(),
        }
    }
}

impl IntoResponse for ApplicationServiceError {
    fn into_response(self) -> Response {
        match self {
            ApplicationServiceError::JobNotFound | ApplicationServiceError::NotFound => {
                error_response(StatusCode::NOT_FOUND, self.to_string())
            }
            ApplicationServiceError::JobClosed => {
                error_response(StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            ApplicationServiceError::Duplicate | ApplicationServiceError::Transition(_) => {
                error_response(StatusCode::CONFLICT, self.to_string())
            }
            ApplicationServiceError::Repository(err) => err.into_response(),
        }
    }
}
