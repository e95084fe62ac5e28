use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use thyrisk_classifiers::error::ModelError;

use super::pages;

/// Request-level failure rendered as an HTML error page.
#[derive(Debug)]
pub enum AppError {
    Model(ModelError),
    /// A handler panicked; carries the panic message.
    Panic(String),
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        AppError::Model(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Model(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            AppError::Panic(reason) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal error: {}", reason),
            ),
        };
        log::error!("Request failed: {}", message);
        (status, pages::error_page(&message)).into_response()
    }
}

/// Response for `CatchPanicLayer`: the same error page a model failure gets.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let reason = err
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| err.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    AppError::Panic(reason).into_response()
}
