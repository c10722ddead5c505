//! Authentication and authorization errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Authorization failure, mapped straight to an HTTP response.
///
/// Token verification failures are deliberately flattened to one generic
/// message so signature/expiry details never leak to the client.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization header required")]
    MissingAuthorization,
    #[error("Invalid authorization header format")]
    InvalidFormat,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Insufficient role for this operation")]
    InsufficientRole,
    #[error("Missing required permission: {0}")]
    MissingPermission(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthorization
            | AuthError::InvalidFormat
            | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientRole | AuthError::MissingPermission(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));

        (self.status_code(), body).into_response()
    }
}

impl From<AuthError> for worklane_common::Error {
    fn from(err: AuthError) -> Self {
        match err.status_code() {
            StatusCode::FORBIDDEN => worklane_common::Error::Authorization(err.to_string()),
            _ => worklane_common::Error::Authentication(err.to_string()),
        }
    }
}
