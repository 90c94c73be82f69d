// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access token minting and verification.
//!
//! ## Token model
//!
//! - Access tokens are HS256 JWTs signed with the shared secret
//! - Each pair gets a fresh token ID (`jti`)
//! - The refresh token is `hash(jti)`, so no refresh-token store exists;
//!   a refresh needs the access token it was minted with
//! - A token whose `exp` equals the current second is still valid

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use super::claims::{AccessTokenClaims, AuthResponse, TokenClaims, TokenPayload};
use super::error::AuthError;
use super::hasher::Hasher;

/// Signing algorithm for this service's own tokens.
const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Mints and verifies access/refresh token pairs.
///
/// Holds only immutable configuration and is shared via `Arc`.
pub struct TokenProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
    refresh_hasher: Arc<dyn Hasher>,
}

impl TokenProvider {
    /// Create a provider.
    ///
    /// # Arguments
    /// - `secret`: shared HS256 signing secret (must not be empty)
    /// - `ttl_secs`: access token lifetime in seconds (must be positive)
    /// - `refresh_hasher`: hasher used to derive refresh tokens
    pub fn new(
        secret: &str,
        ttl_secs: i64,
        refresh_hasher: Arc<dyn Hasher>,
    ) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::TokenGeneration(
                "signing secret is empty".to_string(),
            ));
        }
        if ttl_secs <= 0 {
            return Err(AuthError::TokenGeneration(format!(
                "token TTL must be positive, got {ttl_secs}"
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
            refresh_hasher,
        })
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Mint a new token pair.
    pub fn issue(&self, payload: TokenPayload) -> Result<AuthResponse, AuthError> {
        self.issue_at(payload, Utc::now().timestamp())
    }

    /// Mint a new token pair as of `now` (Unix seconds).
    pub fn issue_at(&self, payload: TokenPayload, now: i64) -> Result<AuthResponse, AuthError> {
        let token_id = Uuid::new_v4();
        let expires_at = now + self.ttl_secs;

        let claims = AccessTokenClaims {
            jti: token_id,
            sub: payload.subject,
            display_name: payload.display_name,
            roles: payload.roles.filter(|roles| !roles.is_empty()),
            iat: now,
            exp: expires_at,
        };

        let access_token = encode(&Header::new(TOKEN_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGeneration(format!("jwt encode: {e}")))?;

        let refresh_token = self
            .refresh_hasher
            .hash(&token_id.to_string())
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))?;

        Ok(AuthResponse {
            access_token,
            refresh_token,
            issued_at: now,
            expires_at,
        })
    }

    /// Verify signature and expiry.
    ///
    /// Returns [`AuthError::TokenExpired`] for a correctly signed but stale
    /// token and [`AuthError::InvalidToken`] for anything else.
    pub fn validate(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.validate_at(token, Utc::now().timestamp())
    }

    /// [`validate`](Self::validate) as of `now` (Unix seconds).
    pub fn validate_at(&self, token: &str, now: i64) -> Result<TokenClaims, AuthError> {
        let claims = self.decode(token)?;
        if now > claims.expires_at {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims)
    }

    /// Verify the signature but not the expiry.
    ///
    /// Used to read the token ID out of a possibly stale access token that
    /// is presented together with its refresh token.
    pub fn decode(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        let data = decode::<AccessTokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|_| AuthError::InvalidToken)?;

        Ok(data.claims.into())
    }

    /// Check that `refresh_token` was minted for `token_id`.
    pub fn validate_refresh(&self, token_id: &Uuid, refresh_token: &str) -> bool {
        self.refresh_hasher
            .verify(&token_id.to_string(), refresh_token)
    }
}
