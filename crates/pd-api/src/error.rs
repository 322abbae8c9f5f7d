//! API error handling
//!
//! Every failure leaves the API as a JSON body with a stable error code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pd_auth::AuthError;
use pd_core::error::{PdError, ValidationErrors};
use pd_timeline::TimelineError;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::store::StoreError;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    NotFound { resource: &'static str, id: String },
    Validation(ValidationErrors),
    Unauthorized { message: String, login_url: Option<String> },
    Forbidden(String),
    BadRequest(String),
    Conflict(String),
    BadGateway(String),
    Internal(String),
}

impl ApiError {
    pub fn not_found(resource: &'static str, id: impl std::fmt::Display) -> Self {
        ApiError::NotFound { resource, id: id.to_string() }
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        ApiError::Unauthorized { message: msg.into(), login_url: None }
    }

    /// Point an `Unauthorized` error at the sign-in page; other errors pass through
    pub fn with_login_url(self, url: String) -> Self {
        match self {
            ApiError::Unauthorized { message, .. } => ApiError::Unauthorized {
                message,
                login_url: Some(url),
            },
            other => other,
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } => "not_found",
            ApiError::Validation(_) => "validation_failed",
            ApiError::Unauthorized { .. } => "unauthenticated",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Conflict(_) => "conflict",
            ApiError::BadGateway(_) => "external_service_error",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    login_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<BTreeMap<String, Vec<String>>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = self.error_code();

        if status.is_server_error() {
            tracing::error!(%status, error, "Request failed: {:?}", self);
        }

        let body = match self {
            ApiError::NotFound { resource, id } => ErrorBody {
                error,
                message: format!("{} with id {} not found", resource, id),
                login_url: None,
                fields: None,
            },
            ApiError::Validation(errors) => ErrorBody {
                error,
                message: errors.full_messages().join(", "),
                login_url: None,
                fields: Some(errors.errors),
            },
            ApiError::Unauthorized { message, login_url } => ErrorBody {
                error,
                message,
                login_url,
                fields: None,
            },
            ApiError::Forbidden(message)
            | ApiError::BadRequest(message)
            | ApiError::Conflict(message)
            | ApiError::BadGateway(message)
            | ApiError::Internal(message) => ErrorBody {
                error,
                message,
                login_url: None,
                fields: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<TimelineError> for ApiError {
    fn from(err: TimelineError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Required | AuthError::Expired => ApiError::unauthorized(err.to_string()),
            AuthError::Forbidden { .. } => ApiError::Forbidden(err.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => ApiError::not_found(entity, id),
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            StoreError::Backend(msg) => ApiError::Internal(format!("Storage error: {}", msg)),
        }
    }
}

impl From<PdError> for ApiError {
    fn from(err: PdError) -> Self {
        match err {
            PdError::NotFound { entity, value, .. } => ApiError::not_found(entity, value),
            PdError::Conflict { message } => ApiError::Conflict(message),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
