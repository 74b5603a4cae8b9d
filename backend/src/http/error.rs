//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::db::RepositoryError;
use crate::error::ScheduleError;
use crate::services::HeatmapError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    /// The stored data cannot answer the request, e.g. too few events to
    /// infer a schedule.
    Unprocessable { code: &'static str, message: String },
    Internal(String),
    Repository(RepositoryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg)),
            AppError::Unprocessable { code, message } => {
                (StatusCode::UNPROCESSABLE_ENTITY, ApiError::new(code, message))
            }
            AppError::Internal(msg) => {
                error!(error = %msg, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, ApiError::new("INTERNAL_ERROR", msg))
            }
            AppError::Repository(e) => match e {
                RepositoryError::NotFound { ref message, ref context } => (
                    StatusCode::NOT_FOUND,
                    ApiError::new("NOT_FOUND", message.clone()).with_details(context.to_string()),
                ),
                RepositoryError::ValidationError { ref message, ref context } => (
                    StatusCode::BAD_REQUEST,
                    ApiError::new("VALIDATION_ERROR", message.clone()).with_details(context.to_string()),
                ),
                RepositoryError::ConnectionError { .. } => {
                    error!(error = %e, "repository unavailable");
                    (StatusCode::SERVICE_UNAVAILABLE, ApiError::new("REPOSITORY_UNAVAILABLE", e.to_string()))
                }
            },
        };

        (status, Json(error)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        match err {
            // A stored descriptor failed to parse: our data, not the caller's.
            ScheduleError::ScheduleExpansion { .. } => AppError::Internal(err.to_string()),
            _ => AppError::Unprocessable {
                code: err.code(),
                message: err.to_string(),
            },
        }
    }
}

impl From<HeatmapError> for AppError {
    fn from(err: HeatmapError) -> Self {
        match err {
            HeatmapError::Schedule(e) => e.into(),
            HeatmapError::Repository(e) => e.into(),
            HeatmapError::InvalidStyle(_) | HeatmapError::WeekOutOfRange { .. } => {
                AppError::BadRequest(err.to_string())
            }
            HeatmapError::ScheduleMissing(_) => AppError::Unprocessable {
                code: "SCHEDULE_MISSING",
                message: err.to_string(),
            },
            HeatmapError::Cache(e) => AppError::Internal(e.to_string()),
        }
    }
}
