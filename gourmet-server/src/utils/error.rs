//! 统一错误处理
//!
//! 提供应用级错误类型和响应结构：
//! - [`AppError`] - 应用错误枚举
//!
//! # 状态码规范
//!
//! | 变体 | 状态码 | 说明 |
//! |------|--------|------|
//! | MissingIdentity | 400 | 请求头缺少 owner token |
//! | Unauthorized | 401 | 创建店铺时缺少 token |
//! | Validation / Conflict | 400 | 输入错误 / 重复资源 |
//! | NotFound / NotFoundOrUnauthorized | 404 | 资源不存在（或无权限，故意不区分） |
//! | Database / Internal | 500 | 内部错误，不向客户端泄露细节 |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::db::StorageError;

/// Error response body: `{"error": "..."}`
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Application-level error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Identity Errors ==========
    /// Owner token header absent on a gated operation (400)
    #[error("User token required")]
    MissingIdentity,

    /// Token header absent on listing creation (401)
    #[error("Authentication required")]
    Unauthorized,

    // ========== Business Logic Errors ==========
    /// Entity absent (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Entity absent OR ownership mismatch — deliberately conflated so the
    /// caller cannot probe for existence (404)
    #[error("{0}")]
    NotFoundOrUnauthorized(String),

    /// Duplicate restaurant / menu item / review (400, human-readable message)
    #[error("Resource already exists: {0}")]
    Conflict(String),

    /// Malformed input (400)
    #[error("Validation failed: {0}")]
    Validation(String),

    // ========== System Errors ==========
    /// Storage backend failure (500)
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::MissingIdentity => {
                (StatusCode::BAD_REQUEST, "User token required".to_string())
            }
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "User token required".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::NotFoundOrUnauthorized(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::Duplicate(msg) => AppError::Conflict(msg),
            StorageError::Validation(msg) => AppError::Validation(msg),
            StorageError::Database(msg) => AppError::Database(msg),
        }
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn not_found_or_unauthorized(msg: impl Into<String>) -> Self {
        Self::NotFoundOrUnauthorized(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
