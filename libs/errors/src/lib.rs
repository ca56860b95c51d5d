//! Unified error handling for tracesrv
//!
//! Every layer of the service (gates, repositories, handlers) reports failures
//! through [`TraceError`], which knows its own HTTP status and stable error code.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// ErrorInfo - API error response type
// ============================================================================

/// Standard error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorInfo {
    /// HTTP status code
    pub code: u16,
    /// Stable machine-readable error code (e.g. `NOT_FOUND`)
    pub error_code: String,
    /// Human readable message
    pub message: String,
    /// Detailed error description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorInfo {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: 500,
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_code(mut self, code: u16) -> Self {
        self.code = code;
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

// ============================================================================
// TraceError - Main error type
// ============================================================================

/// Main error type for all tracesrv components
#[derive(Debug, Error)]
pub enum TraceError {
    // ======================================
    // Authentication & Authorization Errors
    // ======================================
    /// Missing, malformed, invalid or expired bearer token, or bad credentials
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Route declares required roles but the request carries no identity
    #[error("Login required")]
    LoginRequired,

    /// Identity present but none of its roles is accepted by the route
    #[error("Insufficient role: requires one of [{}]", .required.join(", "))]
    InsufficientRole { required: Vec<String> },

    // ======================================
    // Domain Errors
    // ======================================
    #[error("User '{0}' already exists")]
    DuplicateUser(String),

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Bad request: {0}")]
    BadRequest(String),

    // ======================================
    // Infrastructure Errors
    // ======================================
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using TraceError
pub type TraceResult<T> = Result<T, TraceError>;

impl TraceError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated(message.into())
    }

    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) | Self::DuplicateUser(_) => 400,
            Self::Unauthenticated(_) => 401,
            Self::LoginRequired | Self::InsufficientRole { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::Configuration(_)
            | Self::Database(_)
            | Self::Sqlite(_)
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Stable code carried in error bodies
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated(_) => "UNAUTHENTICATED",
            Self::LoginRequired => "LOGIN_REQUIRED",
            Self::InsufficientRole { .. } => "INSUFFICIENT_ROLE",
            Self::DuplicateUser(_) => "DUPLICATE_USER",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Database(_) | Self::Sqlite(_) => "DATABASE_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Server-side failures, as opposed to rejections of the caller's request
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Convert to API ErrorInfo for HTTP responses
    ///
    /// Server-side errors hide their internals from the caller.
    pub fn to_error_info(&self) -> ErrorInfo {
        let message = if self.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let info = ErrorInfo::new(self.error_code(), message).with_code(self.status_code());
        match self {
            Self::InsufficientRole { required } => info.with_details(required.join(",")),
            _ => info,
        }
    }
}

#[cfg(feature = "axum-support")]
mod http {
    use super::TraceError;
    use axum::{
        extract::rejection::{JsonRejection, PathRejection},
        http::StatusCode,
        response::{IntoResponse, Json, Response},
    };
    use serde_json::json;

    impl From<JsonRejection> for TraceError {
        fn from(rejection: JsonRejection) -> Self {
            Self::BadRequest(rejection.body_text())
        }
    }

    impl From<PathRejection> for TraceError {
        fn from(rejection: PathRejection) -> Self {
            Self::BadRequest(rejection.body_text())
        }
    }

    impl IntoResponse for TraceError {
        fn into_response(self) -> Response {
            if self.is_server_error() {
                tracing::error!("Request failed: {}", self);
            } else {
                tracing::debug!("Request rejected: {}", self);
            }

            let status =
                StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let body = json!({
                "success": false,
                "error": self.to_error_info(),
            });

            (status, Json(body)).into_response()
        }
    }
}
