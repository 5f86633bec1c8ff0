//! # Web API 错误类型
//!
//! 业务错误到 HTTP 响应的映射，响应体统一为 `{"error": "..."}`

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::error::StoreError;
use crate::models::BatchProgress;
use crate::orchestrator::BatchDeleteError;
use crate::workflow::OptimizeError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    BadRequest { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Internal { message: String },

    /// 批量任务失败，附带失败时的进度
    #[error("{message}")]
    BatchFailed {
        message: String,
        progress: BatchProgress,
    },
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } | ApiError::BatchFailed { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let body = match &self {
            ApiError::BatchFailed { message, progress } => json!({
                "error": message,
                "progress": progress,
            }),
            other => json!({ "error": other.to_string() }),
        };
        (status_code, Json(body)).into_response()
    }
}

impl From<OptimizeError> for ApiError {
    fn from(err: OptimizeError) -> Self {
        match err {
            OptimizeError::Validation(message) => ApiError::bad_request(message),
            OptimizeError::NotFound => ApiError::not_found(err.to_string()),
            OptimizeError::InvalidModelOutput
            | OptimizeError::Upstream(_)
            | OptimizeError::Store(_) => ApiError::internal(err.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => ApiError::not_found(err.to_string()),
            _ => ApiError::internal(err.to_string()),
        }
    }
}

impl From<BatchDeleteError> for ApiError {
    fn from(err: BatchDeleteError) -> Self {
        ApiError::BatchFailed {
            message: err.source.to_string(),
            progress: err.progress,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}
