// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login and refresh orchestration.
//!
//! ## Login
//!
//! ```text
//! Unauthenticated -> CredentialsSubmitted -> IdentityVerified -> TokenIssued
//!                                         \-> Rejected
//! ```
//!
//! - LOCAL: credential row lookup + secret verification
//! - GOOGLE: code exchange + ID token verification, then credential row
//!   lookup by the asserted subject (login never registers)
//!
//! ## Refresh
//!
//! The access token is decoded (signature checked, expiry ignored), the
//! refresh token is verified against its token ID, and only then is a new
//! pair minted for the person the token names.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use super::claims::{AuthResponse, TokenPayload, TokenRing};
use super::error::AuthError;
use super::google::ThirdPartyAuth;
use super::hasher::Hasher;
use super::token::TokenProvider;
use crate::people::{Credentials, IdentityProvider, PeopleRepository};

/// Authentication service.
pub struct AuthService {
    repository: Arc<dyn PeopleRepository>,
    tokens: Arc<TokenProvider>,
    password_hasher: Arc<dyn Hasher>,
    third_party: Arc<dyn ThirdPartyAuth>,
}

impl AuthService {
    pub fn new(
        repository: Arc<dyn PeopleRepository>,
        tokens: Arc<TokenProvider>,
        password_hasher: Arc<dyn Hasher>,
        third_party: Arc<dyn ThirdPartyAuth>,
    ) -> Self {
        Self {
            repository,
            tokens,
            password_hasher,
            third_party,
        }
    }

    /// Authenticate and mint a token pair.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, AuthError> {
        let provider = credentials.provider();

        let person_id = match provider {
            IdentityProvider::Local => self.verify_local(credentials).await,
            IdentityProvider::Google => self.verify_google(credentials.identifier()).await,
            IdentityProvider::Facebook => Err(AuthError::UnsupportedProvider(provider.to_string())),
        }
        .inspect_err(|e| {
            warn!(provider = %provider, error = %e, state = "rejected", "Login rejected");
        })?;

        info!(
            provider = %provider,
            person_id = %person_id,
            state = "identity_verified",
            "Login identity verified"
        );

        self.authorize_person(person_id, AuthError::LoginFailed).await
    }

    /// Rotate a token pair.
    pub async fn refresh(&self, token_ring: &TokenRing) -> Result<AuthResponse, AuthError> {
        let claims = self
            .tokens
            .decode(token_ring.access_token())
            .map_err(|_| AuthError::RefreshTokenInvalid)?;

        if !self
            .tokens
            .validate_refresh(&claims.token_id, token_ring.refresh_token())
        {
            warn!(token_id = %claims.token_id, "Refresh token does not match access token");
            return Err(AuthError::RefreshTokenInvalid);
        }

        let person_id =
            Uuid::parse_str(&claims.subject).map_err(|_| AuthError::RefreshTokenInvalid)?;

        let pair = self
            .authorize_person(person_id, AuthError::RefreshTokenInvalid)
            .await?;

        info!(person_id = %person_id, previous_token_id = %claims.token_id, "Token pair rotated");
        Ok(pair)
    }

    async fn verify_local(&self, credentials: &Credentials) -> Result<Uuid, AuthError> {
        let (person_id, hash) = self
            .repository
            .find_credentials(IdentityProvider::Local, credentials.registration_id())
            .await
            .map_err(|_| AuthError::LoginFailed)?;

        if !self.password_hasher.verify(credentials.identifier(), &hash) {
            return Err(AuthError::LoginFailed);
        }

        Ok(person_id)
    }

    async fn verify_google(&self, authorization_code: &str) -> Result<Uuid, AuthError> {
        let identity = self.third_party.validate_token(authorization_code).await?;

        let (person_id, _) = self
            .repository
            .find_credentials(IdentityProvider::Google, &identity.subject)
            .await
            .map_err(|_| AuthError::LoginFailed)?;

        Ok(person_id)
    }

    /// Load the person and mint a pair. Lookup failures map to `rejection`.
    async fn authorize_person(
        &self,
        person_id: Uuid,
        rejection: AuthError,
    ) -> Result<AuthResponse, AuthError> {
        let person = self
            .repository
            .find_person(person_id)
            .await
            .map_err(|_| rejection)?;

        self.tokens.issue(TokenPayload {
            subject: person.id().to_string(),
            display_name: person.display_name(),
            roles: None,
        })
    }
}
