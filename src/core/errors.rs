//! # Application Error Handling
//!
//! A single error type for every layer. Handlers return `Result<_, AppError>`
//! and actix turns the error into a JSON response:
//!
//! ```json
//! { "status": 404, "error": "not_found", "message": "Offender with CRN X1 not found" }
//! ```
//!
//! | Variant | Status |
//! |---------|--------|
//! | `ValidationError`, `BadRequest` | 400 |
//! | `AuthenticationError` | 401 |
//! | `AuthorizationError` | 403 |
//! | `NotFound` | 404 |
//! | `ConflictError` | 409 |
//! | everything else | 500 |
//!
//! ```rust,ignore
//! let offender = repo.find_by_crn(crn).await?
//!     .ok_or_else(|| AppError::NotFound(format!("Offender with CRN {} not found", crn)))?;
//! ```

use actix_web::http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Storage failure (500)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Cache failure (500)
    #[error("Redis error: {0}")]
    RedisError(String),

    /// Request body or parameters failed validation (400)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Request violates a business rule (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// (409)
    #[error("Conflict error: {0}")]
    ConflictError(String),

    /// Missing or invalid bearer token (401)
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// Token lacks the role a route requires (403)
    #[error("Authorization error: {0}")]
    AuthorizationError(String),

    /// Downstream HTTP service failure (500)
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// Human readable message without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            AppError::DatabaseError(m)
            | AppError::RedisError(m)
            | AppError::ValidationError(m)
            | AppError::BadRequest(m)
            | AppError::NotFound(m)
            | AppError::ConflictError(m)
            | AppError::AuthenticationError(m)
            | AppError::AuthorizationError(m)
            | AppError::ExternalServiceError(m)
            | AppError::InternalError(m) => m,
        }
    }

    /// Machine readable error kind used in the response body.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::DatabaseError(_) => "database_error",
            AppError::RedisError(_) => "cache_error",
            AppError::ValidationError(_) => "validation_error",
            AppError::BadRequest(_) => "bad_request",
            AppError::NotFound(_) => "not_found",
            AppError::ConflictError(_) => "conflict",
            AppError::AuthenticationError(_) => "authentication_required",
            AppError::AuthorizationError(_) => "insufficient_permissions",
            AppError::ExternalServiceError(_) => "external_service_error",
            AppError::InternalError(_) => "internal_error",
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) => StatusCode::CONFLICT,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        }

        actix_web::HttpResponse::build(status).json(serde_json::json!({
            "status": status.as_u16(),
            "error": self.kind(),
            "message": self.message(),
        }))
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        AppError::DatabaseError(e.to_string())
    }
}

impl From<redis::RedisError> for AppError {
    fn from(e: redis::RedisError) -> Self {
        AppError::RedisError(e.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::ExternalServiceError(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::ValidationError(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Converts foreign errors into `AppError::InternalError` with context.
pub trait ErrorContext<T> {
    fn context(self, msg: &str) -> AppResult<T>;

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}
