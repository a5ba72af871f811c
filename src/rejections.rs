use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Errors a handler can surface to the client. Everything is rendered as
/// `{"error": message}` JSON; internal detail never leaves the server log.
#[derive(Debug)]
pub enum AppError {
    /// Validation failure, message shown to the client.
    Input(String),
    Unauthorized,
    NotFound(&'static str),
    /// Unexpected failure; the message is log context only.
    Internal(&'static str),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message) = match self {
            AppError::Input(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "未登錄".to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.to_string()),
            AppError::Internal(msg) => {
                tracing::error!("responding 500: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "服務器內部錯誤，請稍後重試".to_string(),
                )
            }
        };

        (code, Json(json!({ "error": message }))).into_response()
    }
}

/// Converts service-layer `Result`s into `AppError`, logging the underlying
/// error before it is replaced with a client-safe message.
pub trait ResultExt<T> {
    fn reject(self, msg: &'static str) -> Result<T, AppError>;
    fn reject_input(self, msg: &str) -> Result<T, AppError>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn reject(self, msg: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::error!("{msg}: {e}");
            AppError::Internal(msg)
        })
    }

    fn reject_input(self, msg: &str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::warn!("{msg}: {e}");
            AppError::Input(msg.to_string())
        })
    }
}

pub trait OptionExt<T> {
    fn or_not_found(self, msg: &'static str) -> Result<T, AppError>;
}

impl<T> OptionExt<T> for Option<T> {
    fn or_not_found(self, msg: &'static str) -> Result<T, AppError> {
        self.ok_or(AppError::NotFound(msg))
    }
}
