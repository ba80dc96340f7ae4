use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::error;

use crate::html;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Caller is not logged in or lacks the capability.
    #[error("Sorry, you are not allowed to access this page.")]
    Unauthorized,
    /// Anti-forgery token missing, expired or bound to another action.
    #[error("The link you followed has expired.")]
    InvalidToken,
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Unauthorized | ApiError::InvalidToken => {
                (StatusCode::FORBIDDEN, self.to_string())
            }
            ApiError::Storage(e) => {
                error!("Storage error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred.".to_string(),
                )
            }
            ApiError::Internal(e) => {
                error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong.".to_string(),
                )
            }
        };

        (status, Html(html::error_page(&message))).into_response()
    }
}

pub(crate) fn join_error(e: tokio::task::JoinError) -> ApiError {
    ApiError::Internal(format!("spawn_blocking join error: {}", e))
}
