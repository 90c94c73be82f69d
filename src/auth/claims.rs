// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims, token pairs and the authenticated user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::error::AuthError;

/// Data embedded into a freshly minted access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPayload {
    /// Person ID (string form)
    pub subject: String,
    pub display_name: String,
    /// `None` and an empty list are both left out of the token.
    pub roles: Option<Vec<String>>,
}

/// Claims as they appear on the wire.
///
/// Validated once here; the rest of the crate works with [`TokenClaims`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AccessTokenClaims {
    /// Token ID, correlates the access token with its refresh token
    pub jti: Uuid,
    /// Subject (person ID)
    pub sub: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Claims recovered from a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject: String,
    pub display_name: String,
    /// Never null; empty when the token carried no roles
    pub roles: Vec<String>,
    pub token_id: Uuid,
    pub issued_at: i64,
    pub expires_at: i64,
}

impl From<AccessTokenClaims> for TokenClaims {
    fn from(claims: AccessTokenClaims) -> Self {
        Self {
            subject: claims.sub,
            display_name: claims.display_name,
            roles: claims.roles.unwrap_or_default(),
            token_id: claims.jti,
            issued_at: claims.iat,
            expires_at: claims.exp,
        }
    }
}

/// Token pair returned by login and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    /// Signed access token (HS256 JWT)
    pub access_token: String,
    /// Opaque refresh token, the hash of the access token's ID
    pub refresh_token: String,
    /// Issued at (Unix seconds)
    pub issued_at: i64,
    /// Access token expiry (Unix seconds)
    pub expires_at: i64,
}

/// Access + refresh token presented for a refresh exchange.
#[derive(Debug, Clone)]
pub struct TokenRing {
    access_token: String,
    refresh_token: String,
}

impl TokenRing {
    /// Both members must be non-empty.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let access_token = access_token.into();
        let refresh_token = refresh_token.into();
        if access_token.trim().is_empty() || refresh_token.trim().is_empty() {
            return Err(AuthError::InvalidCredentials(
                "access token and refresh token are required".to_string(),
            ));
        }
        Ok(Self {
            access_token,
            refresh_token,
        })
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }
}

/// Identity asserted by a third-party provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentity {
    /// Provider-scoped subject ID, stored as the credential's registration ID
    pub subject: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

/// Authenticated user information extracted from an access token.
///
/// This is the type handlers receive for the person making a request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Person ID (`sub` claim)
    pub person_id: Uuid,

    pub display_name: String,

    /// Opaque role list carried by the token
    pub roles: Vec<String>,

    /// Token ID (not serialized)
    #[serde(skip)]
    pub token_id: Uuid,

    /// Token expiration (Unix timestamp, not serialized)
    #[serde(skip)]
    pub expires_at: i64,
}

impl AuthenticatedUser {
    /// Build from verified claims. The subject must be a person UUID.
    pub fn from_claims(claims: TokenClaims) -> Result<Self, AuthError> {
        let person_id = Uuid::parse_str(&claims.subject).map_err(|_| AuthError::InvalidToken)?;
        Ok(Self {
            person_id,
            display_name: claims.display_name,
            roles: claims.roles,
            token_id: claims.token_id,
            expires_at: claims.expires_at,
        })
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}
