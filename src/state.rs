// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{
    AuthError, AuthService, BcryptHasher, GoogleAuthClient, Hasher, HttpKeySource,
    RemoteKeyCache, ThirdPartyAuth, TokenProvider,
};
use crate::config::Config;
use crate::people::{InMemoryPeopleRepository, PeopleRepository, PeopleService};

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub people: Arc<PeopleService>,
    pub tokens: Arc<TokenProvider>,
    /// Google signing key cache, `None` when Google sign-in is not wired.
    pub keys: Option<Arc<RemoteKeyCache>>,
}

impl AppState {
    /// Wire services around a repository and a third-party client.
    pub fn new(
        repository: Arc<dyn PeopleRepository>,
        tokens: Arc<TokenProvider>,
        password_hasher: Arc<dyn Hasher>,
        third_party: Arc<dyn ThirdPartyAuth>,
    ) -> Self {
        let auth = AuthService::new(
            repository.clone(),
            tokens.clone(),
            password_hasher.clone(),
            third_party.clone(),
        );
        let people = PeopleService::new(repository, password_hasher, third_party);

        Self {
            auth: Arc::new(auth),
            people: Arc::new(people),
            tokens,
            keys: None,
        }
    }

    pub fn with_keys(mut self, keys: Arc<RemoteKeyCache>) -> Self {
        self.keys = Some(keys);
        self
    }

    /// Build the production wiring: in-memory repository, bcrypt hashers,
    /// Google client backed by a remote key cache.
    pub fn from_config(config: &Config) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| AuthError::KeyFetch(format!("HTTP client: {e}")))?;

        let key_source = Arc::new(HttpKeySource::new(&config.google_certs_url, http.clone()));
        let keys = Arc::new(RemoteKeyCache::new(key_source, config.google_cert_cache_ttl));

        let google = GoogleAuthClient::new(
            &config.google_client_id,
            &config.google_client_secret,
            &config.google_token_url,
            keys.clone(),
            http,
        )?;

        let refresh_hasher: Arc<dyn Hasher> = Arc::new(BcryptHasher::new(config.refresh_hash_cost));
        let tokens = Arc::new(TokenProvider::new(
            &config.jwt_secret,
            config.token_ttl_secs,
            refresh_hasher,
        )?);

        Ok(Self::new(
            Arc::new(InMemoryPeopleRepository::new()),
            tokens,
            Arc::new(BcryptHasher::new(config.password_hash_cost)),
            Arc::new(google),
        )
        .with_keys(keys))
    }
}
