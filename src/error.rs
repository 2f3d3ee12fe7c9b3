//! Error types for Maktabty server

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::i18n::{Lang, Message};

/// Numeric error codes returned in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthenticated = 2,
    DbFailure = 3,
    NoSuchData = 4,
    NotAvailable = 5,
    NotAllowed = 6,
    Duplicate = 7,
    BadCredentials = 8,
    BadValue = 9,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication required: {0}")]
    Unauthenticated(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unavailable: {0}")]
    Unavailable(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error kind without the payload, carried on error responses so the
/// localization middleware can re-render the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthenticated,
    NotFound,
    Unavailable,
    Forbidden,
    Conflict,
    InvalidCredentials,
    Validation,
    Database,
    Internal,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::Unauthenticated | ErrorKind::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Unavailable | ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Database | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(self) -> ErrorCode {
        match self {
            ErrorKind::Unauthenticated => ErrorCode::NotAuthenticated,
            ErrorKind::NotFound => ErrorCode::NoSuchData,
            ErrorKind::Unavailable => ErrorCode::NotAvailable,
            ErrorKind::Forbidden => ErrorCode::NotAllowed,
            ErrorKind::Conflict => ErrorCode::Duplicate,
            ErrorKind::InvalidCredentials => ErrorCode::BadCredentials,
            ErrorKind::Validation => ErrorCode::BadValue,
            ErrorKind::Database => ErrorCode::DbFailure,
            ErrorKind::Internal => ErrorCode::Failure,
        }
    }

    pub fn message(self) -> Message {
        match self {
            ErrorKind::Unauthenticated => Message::LoginRequired,
            ErrorKind::NotFound => Message::NotFound,
            ErrorKind::Unavailable => Message::NoCopiesAvailable,
            ErrorKind::Forbidden => Message::NotAllowed,
            ErrorKind::Conflict => Message::UsernameTaken,
            ErrorKind::InvalidCredentials => Message::WrongCredentials,
            ErrorKind::Validation => Message::InvalidInput,
            ErrorKind::Database | ErrorKind::Internal => Message::ServerError,
        }
    }

    /// Page the client should send the user to after showing the message
    pub fn redirect(self) -> Option<&'static str> {
        match self {
            ErrorKind::Unauthenticated | ErrorKind::InvalidCredentials => Some("/login"),
            ErrorKind::Unavailable => Some("/books"),
            ErrorKind::Forbidden => Some("/"),
            ErrorKind::Conflict => Some("/register"),
            _ => None,
        }
    }
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Unauthenticated(_) => ErrorKind::Unauthenticated,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Unavailable(_) => ErrorKind::Unavailable,
            AppError::Forbidden(_) => ErrorKind::Forbidden,
            AppError::Conflict(_) => ErrorKind::Conflict,
            AppError::InvalidCredentials => ErrorKind::InvalidCredentials,
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::Database(_) => ErrorKind::Database,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    /// Localized, user-facing message
    pub message: String,
    /// Untranslated details for logs and debugging
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl ErrorResponse {
    pub fn new(kind: ErrorKind, detail: &str, lang: Lang) -> Self {
        let code = kind.code();
        Self {
            code: code as u32,
            error: format!("{:?}", code),
            message: kind.message().text(lang).to_string(),
            detail: detail.to_string(),
            redirect: kind.redirect().map(str::to_string),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let detail = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::InvalidCredentials => "Invalid username or password".to_string(),
            AppError::Unauthenticated(msg)
            | AppError::NotFound(msg)
            | AppError::Unavailable(msg)
            | AppError::Forbidden(msg)
            | AppError::Conflict(msg)
            | AppError::Validation(msg) => msg.clone(),
        };

        let body = ErrorResponse::new(kind, &detail, Lang::En);
        let mut response = (kind.status(), Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response.extensions_mut().insert(kind);
        response
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
