use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::service::accounts::ValidationError;

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

/// Failures a request handler can end with.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Content-Type must be {expected}")]
    UnsupportedMediaType { expected: &'static str },
    #[error("Not Found")]
    NotFound,
    #[error("storage failure: {0}")]
    Storage(#[from] sea_orm::DbErr),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::UnsupportedMediaType { .. } => "unsupported_media_type",
            AppError::NotFound => "not_found",
            AppError::Storage(_) => "storage_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            // 404 bodies are plain text
            AppError::NotFound => return (status, "Not Found").into_response(),
            AppError::Storage(err) => tracing::error!(error = %err, "storage failure"),
            AppError::UnsupportedMediaType { .. } => {
                tracing::warn!(error = %self, "rejected request media type")
            }
            AppError::Validation(err) => tracing::info!(error = %err, "rejected account payload"),
        }

        (
            status,
            Json(ErrorResponse {
                code: self.code().to_string(),
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Startup failures that end the process before it serves traffic.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("database: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server: {0}")]
    Serve(#[source] std::io::Error),
}
