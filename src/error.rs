use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

use crate::auth::password::WeakPassword;

/// Every failure a request can end in.
///
/// Domain validation and authentication failures all answer 401; this
/// conflation is part of the public contract. Malformed input answers 422.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("User not found")]
    UserNotFound,
    #[error("Incorrect password")]
    IncorrectPassword,
    #[error(transparent)]
    WeakPassword(#[from] WeakPassword),
    #[error("User must have at least one role")]
    EmptyRoles,
    #[error("Value is required for the specified criteria")]
    MissingValue,
    #[error("Invalid criteria: {0}")]
    InvalidCriteria(String),
    #[error("{0}")]
    InvalidPagination(String),
    #[error("{0}")]
    Unprocessable(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::IncorrectPassword
            | Self::WeakPassword(_)
            | Self::EmptyRoles
            | Self::MissingValue
            | Self::InvalidCriteria(_) => StatusCode::UNAUTHORIZED,
            Self::InvalidPagination(_) | Self::Unprocessable(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = ?self, "request failed");
        } else {
            debug!(%status, detail = %self, "request rejected");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
