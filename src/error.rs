//!
//! # Error Handling
//!
//! `AppError` is the single error type handlers return. It implements
//! `actix_web::error::ResponseError`, so every failure leaves the service as a
//! `{"error": "..."}` JSON body with the matching status code.
//!
//! Component errors (`TokenError`, `AuthError`, `StoreError`) convert into
//! `AppError` through `From`, which is where their internal detail is dropped:
//! token failures collapse to one opaque 401, unknown-user and wrong-password
//! collapse to the same "invalid credentials" 401, and 500-class failures are
//! logged in full but reported to the client without detail.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::auth::service::AuthError;
use crate::auth::token::TokenError;
use crate::store::StoreError;

/// Message returned to clients for any 500-class failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Missing, malformed or expired session, or rejected credentials (HTTP 401).
    Unauthorized(String),
    /// Request could not be understood (HTTP 400).
    BadRequest(String),
    /// Resource is absent or not owned by the caller (HTTP 404).
    NotFound(String),
    /// Resource already exists (HTTP 409).
    Conflict(String),
    /// Unexpected server-side failure (HTTP 500).
    InternalServerError(String),
    /// Failure reported by the database (HTTP 500).
    DatabaseError(String),
    /// Input failed field validation (HTTP 422).
    ValidationError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                log::error!("{}", self);
                INTERNAL_ERROR_MESSAGE
            }
            AppError::Unauthorized(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::ValidationError(msg) => msg.as_str(),
        };

        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Verification failures never say why the token was refused.
impl From<TokenError> for AppError {
    fn from(error: TokenError) -> AppError {
        match error {
            TokenError::Encoding(msg) => {
                AppError::InternalServerError(format!("failed to issue token: {}", msg))
            }
            TokenError::Malformed | TokenError::InvalidSignature | TokenError::Expired => {
                AppError::Unauthorized("invalid token".into())
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(error: AuthError) -> AppError {
        match error {
            AuthError::DuplicateEmail => AppError::Conflict("email already registered".into()),
            AuthError::NotFound | AuthError::InvalidCredentials => {
                AppError::Unauthorized("invalid credentials".into())
            }
            AuthError::Hashing(msg) => AppError::InternalServerError(msg),
            AuthError::Store(msg) => AppError::DatabaseError(msg),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::NotFound => AppError::NotFound("resource not found".into()),
            StoreError::UniqueViolation => AppError::Conflict("resource already exists".into()),
            StoreError::Database(e) => AppError::DatabaseError(e.to_string()),
        }
    }
}
