// Authentication error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::error::ApiError;

/// Authentication error types
///
/// The `Display` text of every variant is safe to send to clients.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("couldn't sign token")]
    SignTokenFailed(#[source] jsonwebtoken::errors::Error),

    #[error("couldn't parse token")]
    ParseTokenFailed(#[source] jsonwebtoken::errors::Error),

    /// Well-formed and correctly signed, but expired or not yet valid
    #[error("token is not valid")]
    InvalidToken,

    #[error("token not found")]
    MissingToken,

    #[error("malformed header")]
    MalformedHeader,

    #[error("invalid password")]
    InvalidCredentials,

    #[error("couldn't hash password")]
    HashPasswordFailed(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::ParseTokenFailed(_)
            | AuthError::InvalidToken
            | AuthError::MissingToken
            | AuthError::MalformedHeader
            | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::SignTokenFailed(_) | AuthError::HashPasswordFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
