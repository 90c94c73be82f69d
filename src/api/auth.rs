// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration, login and token refresh endpoints.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{AuthResponse, TokenRing};
use crate::error::ApiError;
use crate::people::{Credentials, RegisterCommand};
use crate::state::AppState;

/// Request body for POST /v1/auth/register
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Login name (LOCAL only, ignored for GOOGLE)
    #[serde(default)]
    pub login: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// `LOCAL`, `GOOGLE` or `FACEBOOK`
    pub identity_provider: String,
    /// Password (LOCAL) or authorization code (GOOGLE)
    pub token: String,
}

impl From<RegisterRequest> for RegisterCommand {
    fn from(req: RegisterRequest) -> Self {
        Self {
            login: req.login,
            first_name: req.first_name,
            last_name: req.last_name,
            display_name: req.display_name,
            identity_provider: req.identity_provider,
            token: req.token,
        }
    }
}

/// Response for POST /v1/auth/register
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    /// ID of the new person
    pub id: Uuid,
}

/// Request body for POST /v1/auth/login
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// `LOCAL`, `GOOGLE` or `FACEBOOK`
    pub identity_provider: String,
    /// Login name (LOCAL only)
    #[serde(default)]
    pub id: String,
    /// Password (LOCAL) or authorization code (GOOGLE)
    pub token: String,
}

/// Request body for POST /v1/auth/refresh
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RefreshRequest {
    /// Access token of the pair being rotated (may be expired)
    pub access_token: String,
    pub refresh_token: String,
}

/// Register a new person.
#[utoipa::path(
    post,
    path = "/v1/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Person registered", body = RegisterResponse),
        (status = 400, description = "Invalid registration data"),
        (status = 401, description = "Third-party authorization code rejected"),
        (status = 409, description = "Credentials already registered"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let id = state.people.register(req.into()).await?;
    Ok((StatusCode::CREATED, Json(RegisterResponse { id })))
}

/// Log in and receive a token pair.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair", body = AuthResponse),
        (status = 400, description = "Malformed credentials or provider"),
        (status = 401, description = "Login failed"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let credentials = Credentials::new(&req.identity_provider, &req.id, &req.token)?;
    Ok(Json(state.auth.login(&credentials).await?))
}

/// Exchange an access/refresh pair for a new pair.
#[utoipa::path(
    post,
    path = "/v1/auth/refresh",
    tag = "Auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New token pair", body = AuthResponse),
        (status = 400, description = "Missing token"),
        (status = 401, description = "Refresh token invalid"),
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let ring = TokenRing::new(req.access_token, req.refresh_token)?;
    Ok(Json(state.auth.refresh(&ring).await?))
}
