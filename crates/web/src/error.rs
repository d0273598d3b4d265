//! Handler errors and their HTTP form.
//!
//! Clients get a 500 whose body is the error message as a JSON string.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tsvwatch_core::StoreError;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("store query failed: {0}")]
    Store(#[from] StoreError),
}

impl AppError {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_string())).into_response()
    }
}
