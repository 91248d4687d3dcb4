use axum::http::StatusCode;
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Clone, Error, Debug)]
pub enum AppError {
    #[error("Storage unavailable")]
    StorageUnavailable,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("User not found: {0}")]
    UserNotFound(i64),

    #[error("Role not found: {0}")]
    RoleNotFound(i64),

    #[error("Permission not found: {0}")]
    PermissionNotFound(i64),

    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Relation not found")]
    RelationNotFound,

    #[error("Audit record not found: {0}")]
    AuditRecordNotFound(i64),

    // Deliberately does not say which of login name or password was wrong.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Token required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Audit write failed")]
    AuditWriteFailed,

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl AppError {
    fn get_error_msg(&self) -> (StatusCode, String) {
        let status = match self {
            AppError::StorageUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::UserNotFound(_) => StatusCode::NOT_FOUND,
            AppError::RoleNotFound(_) => StatusCode::NOT_FOUND,
            AppError::PermissionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::ModuleNotFound(_) => StatusCode::NOT_FOUND,
            AppError::RelationNotFound => StatusCode::NOT_FOUND,
            AppError::AuditRecordNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        if let Some(app_error) = e.downcast_ref::<AppError>() {
            return app_error.clone();
        }
        AppError::InternalServerError(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.get_error_msg();
        let body = serde_json::json!({ "error": true, "message": body });
        (status, Json(body)).into_response()
    }
}
