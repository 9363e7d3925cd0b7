//! Application Errors
//! Mission: One typed failure per rule, one fixed status per taxonomy entry

use crate::auth::{jwt::TokenError, password::HashingError};
use crate::store::StoreError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub type AppResult<T> = Result<T, AppError>;

/// Taxonomy bucket an [`AppError`] is rendered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Authentication,
    Authorization,
    Conflict,
    Internal,
}

impl ErrorKind {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
            ErrorKind::Authorization => StatusCode::FORBIDDEN,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable reason string sent as the `error` field.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation_error",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Authentication => "unauthenticated",
            ErrorKind::Authorization => "forbidden",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Internal => "internal_error",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("cannot delete your own account")]
    CannotDeleteSelf,

    #[error("user not found")]
    UserNotFound,
    #[error("course not found")]
    CourseNotFound,
    #[error("material not found")]
    MaterialNotFound,
    #[error("instructor not found")]
    InstructorNotFound,

    #[error("missing authorization token")]
    MissingToken,
    #[error("invalid token")]
    TokenInvalid,
    #[error("token expired")]
    TokenExpired,
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("insufficient permissions")]
    Forbidden,
    #[error("you may not change your role")]
    RoleChangeForbidden,
    #[error("only the student role may self-register")]
    RegistrationRoleForbidden,

    #[error("user already enrolled in course")]
    AlreadyEnrolled,
    #[error("email already registered")]
    EmailTaken,
    #[error("course title already exists")]
    CourseTitleTaken,

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) | AppError::CannotDeleteSelf => ErrorKind::Validation,
            AppError::UserNotFound
            | AppError::CourseNotFound
            | AppError::MaterialNotFound
            | AppError::InstructorNotFound => ErrorKind::NotFound,
            AppError::MissingToken
            | AppError::TokenInvalid
            | AppError::TokenExpired
            | AppError::InvalidCredentials => ErrorKind::Authentication,
            AppError::Forbidden
            | AppError::RoleChangeForbidden
            | AppError::RegistrationRoleForbidden => ErrorKind::Authorization,
            AppError::AlreadyEnrolled | AppError::EmailTaken | AppError::CourseTitleTaken => {
                ErrorKind::Conflict
            }
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.kind().status()
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => AppError::TokenInvalid,
            TokenError::Expired => AppError::TokenExpired,
            TokenError::Signing(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

impl From<HashingError> for AppError {
    fn from(err: HashingError) -> Self {
        AppError::Internal(err.into())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Internal(err.into())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let message = match &self {
            AppError::Internal(err) => {
                error!("Internal error: {:#}", err);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": kind.code(),
            "message": message,
        }));

        (kind.status(), body).into_response()
    }
}
