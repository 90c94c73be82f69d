// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) fetching and caching.
//!
//! ## Cache model
//!
//! - All keys are fetched and replaced together; there is one expiry for
//!   the whole set
//! - A snapshot is immutable once built and swapped in under the writer
//!   lock, so readers never observe a half-updated map
//! - Refreshes are serialised: concurrent callers that see an expired cache
//!   wait for the single in-flight fetch instead of starting their own
//! - A failed fetch leaves the last good snapshot in place, and callers that
//!   were queued behind it receive its error instead of repeating it
//! - An unknown key ID does not trigger a refetch

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet};
use jsonwebtoken::DecodingKey;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::error::AuthError;

/// Default JWKS cache TTL (24 hours). Provider key rotation is rare.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Where published signing keys come from.
#[async_trait]
pub trait KeySource: Send + Sync {
    /// Fetch the full published key set.
    async fn fetch_keys(&self) -> Result<JwkSet, AuthError>;
}

/// Fetches a JWKS document over HTTPS.
#[derive(Clone)]
pub struct HttpKeySource {
    /// JWKS URL
    jwks_url: String,
    client: reqwest::Client,
}

impl HttpKeySource {
    /// Create a source for `jwks_url`.
    ///
    /// The client's timeout bounds every fetch.
    pub fn new(jwks_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            jwks_url: jwks_url.into(),
            client,
        }
    }
}

#[async_trait]
impl KeySource for HttpKeySource {
    async fn fetch_keys(&self) -> Result<JwkSet, AuthError> {
        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::KeyFetch(format!(
                "HTTP {} from JWKS endpoint",
                response.status()
            )));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))
    }
}

/// One fetched generation of keys.
struct KeySnapshot {
    keys: HashMap<String, DecodingKey>,
    expires_at: Instant,
}

impl KeySnapshot {
    fn is_fresh(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// The most recent fetch failure.
struct FailedFetch {
    at: Instant,
    error: AuthError,
}

/// Cache of a remote provider's public signing keys.
pub struct RemoteKeyCache {
    source: Arc<dyn KeySource>,
    /// Cache TTL
    ttl: Duration,
    /// Current snapshot
    snapshot: RwLock<Option<Arc<KeySnapshot>>>,
    /// Held for the duration of a fetch; remembers the last failure
    refresh_gate: Mutex<Option<FailedFetch>>,
}

impl RemoteKeyCache {
    /// Create an empty cache. Keys are fetched lazily on first use.
    pub fn new(source: Arc<dyn KeySource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            snapshot: RwLock::new(None),
            refresh_gate: Mutex::new(None),
        }
    }

    /// Get the decoding key for `kid`, refreshing the key set if expired.
    pub async fn get(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        let snapshot = self.current().await?;
        snapshot
            .keys
            .get(kid)
            .cloned()
            .ok_or_else(|| AuthError::KeyNotFound(kid.to_string()))
    }

    /// Force a refetch of the key set.
    pub async fn refresh(&self) -> Result<(), AuthError> {
        let mut gate = self.refresh_gate.lock().await;
        self.fetch_and_swap(&mut gate).await.map(|_| ())
    }

    /// Check if a key set is currently cached and unexpired.
    pub async fn is_cached(&self) -> bool {
        self.fresh_snapshot().await.is_some()
    }

    async fn fresh_snapshot(&self) -> Option<Arc<KeySnapshot>> {
        let cache = self.snapshot.read().await;
        cache.as_ref().filter(|s| s.is_fresh()).cloned()
    }

    async fn current(&self) -> Result<Arc<KeySnapshot>, AuthError> {
        if let Some(snapshot) = self.fresh_snapshot().await {
            return Ok(snapshot);
        }

        let queued_at = Instant::now();
        let mut gate = self.refresh_gate.lock().await;

        // Another caller may have refreshed while we waited for the gate.
        if let Some(snapshot) = self.fresh_snapshot().await {
            return Ok(snapshot);
        }

        // The fetch we waited on failed: share its outcome.
        if let Some(failed) = gate.as_ref().filter(|f| f.at >= queued_at) {
            debug!(error = %failed.error, "Reusing result of concurrent key fetch");
            return Err(failed.error.clone());
        }

        self.fetch_and_swap(&mut gate).await
    }

    /// `gate` is the guarded contents of `refresh_gate`.
    async fn fetch_and_swap(
        &self,
        gate: &mut Option<FailedFetch>,
    ) -> Result<Arc<KeySnapshot>, AuthError> {
        match self.fetch_snapshot().await {
            Ok(snapshot) => {
                *gate = None;
                *self.snapshot.write().await = Some(snapshot.clone());
                info!(
                    key_count = snapshot.keys.len(),
                    ttl_secs = self.ttl.as_secs(),
                    "Signing key set refreshed"
                );
                Ok(snapshot)
            }
            Err(e) => {
                warn!(error = %e, "Signing key refresh failed, keeping previous key set");
                *gate = Some(FailedFetch {
                    at: Instant::now(),
                    error: e.clone(),
                });
                Err(e)
            }
        }
    }

    async fn fetch_snapshot(&self) -> Result<Arc<KeySnapshot>, AuthError> {
        let jwks = self.source.fetch_keys().await?;

        let mut keys = HashMap::with_capacity(jwks.keys.len());
        for jwk in &jwks.keys {
            let Some(kid) = jwk.common.key_id.clone() else {
                debug!("Skipping published key without kid");
                continue;
            };
            keys.insert(kid, jwk_to_decoding_key(jwk)?);
        }

        Ok(Arc::new(KeySnapshot {
            keys,
            expires_at: Instant::now() + self.ttl,
        }))
    }
}

/// Convert a JWK to a DecodingKey. Only RSA keys are accepted.
fn jwk_to_decoding_key(jwk: &Jwk) -> Result<DecodingKey, AuthError> {
    match &jwk.algorithm {
        AlgorithmParameters::RSA(rsa) => DecodingKey::from_rsa_components(&rsa.n, &rsa.e)
            .map_err(|e| AuthError::MalformedKey(format!("failed to create RSA key: {e}"))),
        _ => Err(AuthError::MalformedKey(
            "unsupported key type in JWKS".to_string(),
        )),
    }
}
