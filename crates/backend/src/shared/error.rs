use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::shared::api_error::ApiError;
use contracts::shared::form_schema::FieldErrors;
use contracts::system::auth::LoginError;

use super::data::memory_store::StoreError;

/// Error returned by services and handlers, rendered as an [`ApiError`] body
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("permission denied")]
    Forbidden,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn unauthenticated() -> Self {
        Self::Unauthorized("กรุณาเข้าสู่ระบบ".to_string())
    }

    fn body(&self) -> ApiError {
        match self {
            Self::Validation(errors) => ApiError::invalid(errors.clone()),
            Self::BadRequest(m) | Self::Unauthorized(m) | Self::NotFound(m) | Self::Conflict(m) => {
                ApiError::new(m.clone())
            }
            Self::Forbidden => ApiError::new("ไม่มีสิทธิ์ดำเนินการ"),
            Self::Internal(_) => ApiError::new("เกิดข้อผิดพลาดภายในระบบ"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Internal(e) = &self {
            tracing::error!("Internal error: {:#}", e);
        }
        (self.status(), Json(self.body())).into_response()
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        Self::NotFound(e.to_string())
    }
}

impl From<LoginError> for AppError {
    fn from(e: LoginError) -> Self {
        match e {
            LoginError::Required => Self::BadRequest(e.to_string()),
            LoginError::InvalidCredential => Self::Unauthorized(e.to_string()),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
