//! Error types for the onboarding service.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Onboarding error: {0}")]
    Onboarding(#[from] OnboardingError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised while loading or validating the program catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid template {template}: {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("Duplicate {what} in catalog: {value}")]
    Duplicate { what: &'static str, value: String },

    #[error("Catalog contains no programs")]
    Empty,
}

/// Errors raised by onboarding operations.
///
/// Each variant carries a stable machine-readable kind (see [`OnboardingError::kind`])
/// which is what HTTP clients receive in the `error` field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OnboardingError {
    #[error("No onboarding program exists for role {role:?}")]
    UnknownRole { role: String },

    #[error("Employee {id} not found")]
    EmployeeNotFound { id: String },

    #[error("Task {task_id} is not part of the program for employee {employee_id}")]
    TaskNotFound { employee_id: Uuid, task_id: String },

    #[error("Validation failed: {reason}")]
    Validation { reason: String },

    #[error("Onboarding store unavailable: {reason}")]
    StoreUnavailable { reason: String },
}

impl OnboardingError {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Machine-readable kind, stable across releases.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownRole { .. } => "unknown_role",
            Self::EmployeeNotFound { .. } => "employee_not_found",
            Self::TaskNotFound { .. } => "task_not_found",
            Self::Validation { .. } => "validation_error",
            Self::StoreUnavailable { .. } => "store_unavailable",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::UnknownRole { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::EmployeeNotFound { .. } | Self::TaskNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for OnboardingError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(serde_json::json!({
                "error": self.kind(),
                "details": self.to_string(),
            })),
        )
            .into_response()
    }
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
