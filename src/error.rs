// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::auth::{category_status, AuthError, ErrorCategory};
use crate::people::{PeopleError, RepositoryError};

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error_code: &'static str,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    error_code: &'static str,
}

impl ApiError {
    pub fn new(status: StatusCode, error_code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            error_code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(category_status(ErrorCategory::Conflict), "already_exists", message)
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "Internal server error",
        )
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        if err.status_code().is_server_error() {
            error!(error = %err, "Authentication internal error");
        }
        Self::new(err.status_code(), err.error_code(), err.public_message())
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(what) => Self::not_found(format!("Not found: {what}")),
            RepositoryError::AlreadyExists(what) => {
                Self::conflict(format!("Already exists: {what}"))
            }
            RepositoryError::Backend(detail) => {
                error!(error = %detail, "Repository backend error");
                Self::internal()
            }
        }
    }
}

impl From<PeopleError> for ApiError {
    fn from(err: PeopleError) -> Self {
        match err {
            PeopleError::Auth(e) => e.into(),
            PeopleError::InvalidPerson(e) => Self::new(
                category_status(ErrorCategory::Validation),
                "invalid_person",
                e.to_string(),
            ),
            PeopleError::Repository(e) => e.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
            error_code: self.error_code,
        });
        (self.status, body).into_response()
    }
}
