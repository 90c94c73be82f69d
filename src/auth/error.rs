// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Coarse error category used by the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed input (bad provider name, bad credential shape, bad claims)
    Validation,
    /// Wrong secret, expired token, invalid refresh pairing
    Unauthorized,
    /// The resource already exists
    Conflict,
    /// Signing failure, remote fetch failure, malformed remote key material
    Internal,
}

/// Authentication error type.
///
/// `LoginFailed` is returned for both an unknown identity and a wrong
/// secret so callers cannot enumerate identities.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    /// No authorization header present
    #[error("Authorization header is required")]
    MissingAuthHeader,
    /// Invalid authorization header format
    #[error("Invalid authorization header format (expected 'Bearer <token>')")]
    InvalidAuthHeader,
    /// Identity provider name is not recognised
    #[error("Invalid identity provider: {0}")]
    InvalidProvider(String),
    /// Identity provider is known but not implemented
    #[error("Unsupported identity provider: {0}")]
    UnsupportedProvider(String),
    /// Credentials are missing a required part
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),
    /// Login was rejected
    #[error("Failed to login")]
    LoginFailed,
    /// Token is malformed or its signature is invalid
    #[error("Auth token is invalid")]
    InvalidToken,
    /// Token has expired
    #[error("Auth token is expired")]
    TokenExpired,
    /// Refresh token does not belong to the presented access token
    #[error("Refresh token is invalid")]
    RefreshTokenInvalid,
    /// Token is signed with an algorithm other than the expected one
    #[error("Unexpected signing algorithm: {0}")]
    UnsupportedAlgorithm(String),
    /// Token audience is invalid
    #[error("Token audience is invalid")]
    InvalidAudience,
    /// Token issuer is invalid
    #[error("Token issuer is invalid")]
    InvalidIssuer,
    /// No matching key in the provider's key set
    #[error("Public key not found: {0}")]
    KeyNotFound(String),
    /// Key set fetch failed
    #[error("Failed to fetch signing keys: {0}")]
    KeyFetch(String),
    /// Key set contained a key that could not be used
    #[error("Malformed signing key: {0}")]
    MalformedKey(String),
    /// Authorization code exchange failed
    #[error("Authorization code exchange failed: {0}")]
    CodeExchange(String),
    /// Code exchange response carried no identity token
    #[error("Identity token missing from provider response")]
    MissingIdToken,
    /// Signing or refresh-token hashing failed
    #[error("Auth token generation failed: {0}")]
    TokenGeneration(String),
    /// Secret hashing failed
    #[error("Hashing failed: {0}")]
    Hash(String),
}

impl AuthError {
    /// Get the category for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            AuthError::InvalidProvider(_)
            | AuthError::UnsupportedProvider(_)
            | AuthError::InvalidCredentials(_)
            | AuthError::InvalidAudience
            | AuthError::InvalidIssuer => ErrorCategory::Validation,
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::LoginFailed
            | AuthError::InvalidToken
            | AuthError::TokenExpired
            | AuthError::RefreshTokenInvalid
            | AuthError::UnsupportedAlgorithm(_)
            | AuthError::KeyNotFound(_)
            | AuthError::MissingIdToken => ErrorCategory::Unauthorized,
            AuthError::KeyFetch(_)
            | AuthError::MalformedKey(_)
            | AuthError::CodeExchange(_)
            | AuthError::TokenGeneration(_)
            | AuthError::Hash(_) => ErrorCategory::Internal,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::InvalidProvider(_) => "invalid_provider",
            AuthError::UnsupportedProvider(_) => "unsupported_provider",
            AuthError::InvalidCredentials(_) => "invalid_credentials",
            AuthError::LoginFailed => "login_failed",
            AuthError::InvalidToken => "invalid_token",
            AuthError::TokenExpired => "token_expired",
            AuthError::RefreshTokenInvalid => "refresh_token_invalid",
            AuthError::UnsupportedAlgorithm(_) => "unsupported_algorithm",
            AuthError::InvalidAudience => "invalid_audience",
            AuthError::InvalidIssuer => "invalid_issuer",
            AuthError::KeyNotFound(_) => "no_matching_key",
            AuthError::KeyFetch(_) => "jwks_fetch_error",
            AuthError::MalformedKey(_) => "malformed_key",
            AuthError::CodeExchange(_) => "code_exchange_failed",
            AuthError::MissingIdToken => "missing_id_token",
            AuthError::TokenGeneration(_) => "token_generation_failed",
            AuthError::Hash(_) => "hash_failed",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        category_status(self.category())
    }

    /// Message safe to return to a client.
    ///
    /// Internal failures carry provider or library detail and are replaced
    /// by a generic message.
    pub fn public_message(&self) -> String {
        match self.category() {
            ErrorCategory::Internal => "Authentication service error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Error response body for authentication errors.
#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if self.category() == ErrorCategory::Internal {
            tracing::error!(error = %self, "Authentication internal error");
        }
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.public_message(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}

/// Map an error category to its HTTP status.
pub fn category_status(category: ErrorCategory) -> StatusCode {
    match category {
        ErrorCategory::Validation => StatusCode::BAD_REQUEST,
        ErrorCategory::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCategory::Conflict => StatusCode::CONFLICT,
        ErrorCategory::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
