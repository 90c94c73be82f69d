// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always "ok" while the process serves requests.
    pub status: String,
    /// Whether Google signing keys are currently cached.
    ///
    /// Keys are fetched lazily on the first Google sign-in, so `false` is
    /// not a failure.
    pub jwks_cached: bool,
}

/// Health check endpoint handler.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let jwks_cached = match &state.keys {
        Some(keys) => keys.is_cached().await,
        None => false,
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        jwks_cached,
    })
}
