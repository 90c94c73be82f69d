// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Google sign-in.
//!
//! ## Flow
//!
//! 1. Frontend obtains an authorization code through Google's JS SDK
//! 2. Server exchanges the code at Google's token endpoint
//!    (`redirect_uri=postmessage`, the SDK popup flow marker)
//! 3. The returned ID token is verified:
//!    - signed with RS256 by a key from Google's published certs
//!    - not expired
//!    - `aud` equals our client ID
//!    - `iss` is `accounts.google.com`, with or without the `https://` prefix
//! 4. `sub` becomes the credential's registration ID

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;
use tracing::{debug, warn};

use super::claims::ExternalIdentity;
use super::error::AuthError;
use super::jwks::RemoteKeyCache;

/// Google's OAuth2 token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Google's published signing certificates (JWKS).
pub const DEFAULT_CERTS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

/// Redirect URI for codes obtained through the JS SDK popup flow.
const POSTMESSAGE_REDIRECT_URI: &str = "postmessage";

/// Issuer values Google uses interchangeably.
const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// Signing algorithm Google uses for ID tokens.
const ID_TOKEN_ALGORITHM: Algorithm = Algorithm::RS256;

/// Verifies an identity assertion from a third-party provider.
#[async_trait]
pub trait ThirdPartyAuth: Send + Sync {
    /// Exchange an authorization code and verify the resulting identity.
    async fn validate_token(&self, authorization_code: &str) -> Result<ExternalIdentity, AuthError>;
}

/// Token endpoint response (only the field we use).
#[derive(Debug, Deserialize)]
struct CodeExchangeResponse {
    #[serde(default)]
    id_token: Option<String>,
}

/// Claims from a Google ID token.
#[derive(Debug, Deserialize)]
struct GoogleIdClaims {
    sub: String,
    #[serde(default)]
    aud: String,
    #[serde(default)]
    iss: String,
    exp: i64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

/// Google OAuth2 client.
pub struct GoogleAuthClient {
    client_id: String,
    client_secret: String,
    token_url: String,
    keys: Arc<RemoteKeyCache>,
    http: reqwest::Client,
}

impl GoogleAuthClient {
    /// Create a client.
    ///
    /// # Arguments
    /// - `client_id` / `client_secret`: registered OAuth2 client (both required)
    /// - `token_url`: token endpoint, usually [`DEFAULT_TOKEN_URL`]
    /// - `keys`: cache of Google's signing keys
    /// - `http`: HTTP client; its timeout bounds the code exchange
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        token_url: impl Into<String>,
        keys: Arc<RemoteKeyCache>,
        http: reqwest::Client,
    ) -> Result<Self, AuthError> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();
        if client_id.is_empty() || client_secret.is_empty() {
            return Err(AuthError::InvalidCredentials(
                "google auth requires a client id and secret".to_string(),
            ));
        }

        Ok(Self {
            client_id,
            client_secret,
            token_url: token_url.into(),
            keys,
            http,
        })
    }

    /// Exchange an authorization code for an ID token.
    async fn exchange_code(&self, code: &str) -> Result<String, AuthError> {
        let params = [
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", POSTMESSAGE_REDIRECT_URI),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .http
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::CodeExchange(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::CodeExchange(format!(
                "HTTP {} from token endpoint",
                response.status()
            )));
        }

        let body: CodeExchangeResponse = response
            .json()
            .await
            .map_err(|e| AuthError::CodeExchange(e.to_string()))?;

        body.id_token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingIdToken)
    }

    /// Verify an ID token as of `now` (Unix seconds).
    pub(crate) async fn verify_id_token(
        &self,
        id_token: &str,
        now: i64,
    ) -> Result<ExternalIdentity, AuthError> {
        let header = decode_header(id_token).map_err(|_| AuthError::InvalidToken)?;

        if header.alg != ID_TOKEN_ALGORITHM {
            return Err(AuthError::UnsupportedAlgorithm(format!("{:?}", header.alg)));
        }

        let kid = header.kid.ok_or(AuthError::InvalidToken)?;
        let key = self.keys.get(&kid).await?;

        let mut validation = Validation::new(ID_TOKEN_ALGORITHM);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        let claims = decode::<GoogleIdClaims>(id_token, &key, &validation)
            .map_err(|e| {
                debug!(error = %e, "Google ID token rejected");
                AuthError::InvalidToken
            })?
            .claims;

        if now > claims.exp {
            return Err(AuthError::TokenExpired);
        }

        if claims.aud != self.client_id {
            return Err(AuthError::InvalidAudience);
        }

        if !GOOGLE_ISSUERS.contains(&claims.iss.as_str()) {
            return Err(AuthError::InvalidIssuer);
        }

        Ok(ExternalIdentity {
            subject: claims.sub,
            display_name: claims.name,
            email: claims.email,
        })
    }
}

#[async_trait]
impl ThirdPartyAuth for GoogleAuthClient {
    async fn validate_token(
        &self,
        authorization_code: &str,
    ) -> Result<ExternalIdentity, AuthError> {
        if authorization_code.is_empty() {
            return Err(AuthError::InvalidCredentials(
                "authorization code is required".to_string(),
            ));
        }

        let id_token = self.exchange_code(authorization_code).await.inspect_err(|e| {
            warn!(error = %e, "Google code exchange failed");
        })?;

        self.verify_id_token(&id_token, Utc::now().timestamp()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwks::tests::StaticKeySource;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::sync::atomic::Ordering;

    fn client(source: Arc<StaticKeySource>) -> GoogleAuthClient {
        let keys = Arc::new(RemoteKeyCache::new(
            source,
            crate::auth::jwks::DEFAULT_CACHE_TTL,
        ));
        GoogleAuthClient::new(
            "client-123.apps.googleusercontent.com",
            "client-secret",
            DEFAULT_TOKEN_URL,
            keys,
            reqwest::Client::new(),
        )
        .unwrap()
    }

    #[test]
    fn new_requires_client_id_and_secret() {
        let keys = Arc::new(RemoteKeyCache::new(
            Arc::new(StaticKeySource::new(&[])),
            crate::auth::jwks::DEFAULT_CACHE_TTL,
        ));
        let result = GoogleAuthClient::new(
            "",
            "secret",
            DEFAULT_TOKEN_URL,
            keys,
            reqwest::Client::new(),
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn symmetric_token_is_rejected_before_key_lookup() {
        let source = Arc::new(StaticKeySource::new(&["k1"]));
        let google = client(source.clone());

        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some("k1".to_string());
        let token = encode(
            &header,
            &serde_json::json!({
                "sub": "1234567890",
                "aud": "client-123.apps.googleusercontent.com",
                "iss": "accounts.google.com",
                "exp": 9_999_999_999i64
            }),
            &EncodingKey::from_secret(b"attacker-chosen"),
        )
        .unwrap();

        let result = google.verify_id_token(&token, 1_700_000_000).await;
        assert!(matches!(result, Err(AuthError::UnsupportedAlgorithm(_))));
        assert_eq!(source.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn garbage_token_is_invalid() {
        let google = client(Arc::new(StaticKeySource::new(&["k1"])));
        let result = google.verify_id_token("not.a.jwt", 1_700_000_000).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn empty_code_is_rejected_without_network() {
        let google = client(Arc::new(StaticKeySource::new(&["k1"])));
        assert!(matches!(
            google.validate_token("").await,
            Err(AuthError::InvalidCredentials(_))
        ));
    }
}
