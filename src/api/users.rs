// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{Auth, AuthenticatedUser};
use crate::error::ApiError;
use crate::people::{IdentityProvider, Person};
use crate::state::AppState;

/// Response for GET /v1/users/me
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserMeResponse {
    /// Person ID (token subject)
    pub person_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    /// Roles carried by the access token
    pub roles: Vec<String>,
}

impl UserMeResponse {
    fn new(person: &Person, user: AuthenticatedUser) -> Self {
        Self {
            person_id: person.id(),
            first_name: person.first_name().to_string(),
            last_name: person.last_name().to_string(),
            display_name: person.display_name(),
            roles: user.roles,
        }
    }
}

/// Request body for POST /v1/users/me/identities
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LinkIdentityRequest {
    /// `LOCAL` or `GOOGLE`
    pub identity_provider: String,
    /// Login name (LOCAL only)
    #[serde(default)]
    pub id: String,
    /// Password (LOCAL) or authorization code (GOOGLE)
    pub token: String,
}

/// Get the current authenticated user's information.
///
/// The profile is read from the person store, so renamed persons see their
/// current names before the token is refreshed. Roles come from the token.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = UserMeResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "Person no longer exists"),
    )
)]
pub async fn get_current_user(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<UserMeResponse>, ApiError> {
    let person = state.people.find_by_id(user.person_id).await?;
    Ok(Json(UserMeResponse::new(&person, user)))
}

/// Link another sign-in method to the current person.
///
/// An existing credential for the same provider is replaced.
#[utoipa::path(
    post,
    path = "/v1/users/me/identities",
    tag = "Users",
    security(("bearer" = [])),
    request_body = LinkIdentityRequest,
    responses(
        (status = 204, description = "Identity linked"),
        (status = 400, description = "Invalid credentials"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Credentials belong to another person"),
    )
)]
pub async fn link_identity(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(req): Json<LinkIdentityRequest>,
) -> Result<StatusCode, ApiError> {
    let provider: IdentityProvider = req.identity_provider.parse()?;

    state
        .people
        .link_identity(user.person_id, provider, &req.id, &req.token)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
