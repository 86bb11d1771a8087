use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::application::usecases::{
    subscriptions::SubscriptionError, transactions::TransactionError,
};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(_) => {
                // Don't leak internal error detail to client
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<TransactionError> for AppError {
    fn from(err: TransactionError) -> Self {
        match err {
            err @ TransactionError::DuplicateTrxId => AppError::Conflict(err.to_string()),
            err @ (TransactionError::NotFound
            | TransactionError::NotPending
            | TransactionError::UserNotFound) => AppError::NotFound(err.to_string()),
            TransactionError::Internal(inner) => AppError::Internal(inner),
            err => AppError::BadRequest(err.to_string()),
        }
    }
}

impl From<SubscriptionError> for AppError {
    fn from(err: SubscriptionError) -> Self {
        match err {
            err @ SubscriptionError::UserNotFound => AppError::NotFound(err.to_string()),
            SubscriptionError::Internal(inner) => AppError::Internal(inner),
        }
    }
}
