// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity providers and credential values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::AuthError;

/// Party vouching for a person's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum IdentityProvider {
    /// This service (login + password)
    Local,
    /// Google sign-in
    Google,
    /// Reserved; parses but cannot be used to log in
    Facebook,
}

impl IdentityProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityProvider::Local => "LOCAL",
            IdentityProvider::Google => "GOOGLE",
            IdentityProvider::Facebook => "FACEBOOK",
        }
    }
}

impl FromStr for IdentityProvider {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOCAL" => Ok(IdentityProvider::Local),
            "GOOGLE" => Ok(IdentityProvider::Google),
            "FACEBOOK" => Ok(IdentityProvider::Facebook),
            other => Err(AuthError::InvalidProvider(other.to_string())),
        }
    }
}

impl fmt::Display for IdentityProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider-scoped credentials.
///
/// - `registration_id`: the provider-scoped external subject ID (the login
///   name for LOCAL)
/// - `identifier`: the secret or its hash for LOCAL, the asserted subject for
///   third-party providers
///
/// Equality compares provider and identifier only.
#[derive(Debug, Clone, Eq)]
pub struct Credentials {
    provider: IdentityProvider,
    registration_id: String,
    identifier: String,
}

impl Credentials {
    /// Parse and validate credentials.
    pub fn new(
        provider: &str,
        registration_id: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let provider = provider.parse::<IdentityProvider>()?;
        Self::with_provider(provider, registration_id, identifier)
    }

    /// Validate credentials for an already-parsed provider.
    ///
    /// LOCAL requires a registration ID; every provider requires an
    /// identifier.
    pub fn with_provider(
        provider: IdentityProvider,
        registration_id: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let registration_id = registration_id.into();
        let identifier = identifier.into();

        if provider == IdentityProvider::Local && registration_id.is_empty() {
            return Err(AuthError::InvalidCredentials(
                "login is required for local credentials".to_string(),
            ));
        }

        if identifier.is_empty() {
            return Err(AuthError::InvalidCredentials(
                "identifier is required".to_string(),
            ));
        }

        Ok(Self {
            provider,
            registration_id,
            identifier,
        })
    }

    pub fn provider(&self) -> IdentityProvider {
        self.provider
    }

    pub fn registration_id(&self) -> &str {
        &self.registration_id
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Copy with a different identifier (e.g. the hash of a submitted secret).
    pub fn with_identifier(&self, identifier: impl Into<String>) -> Self {
        Self {
            provider: self.provider,
            registration_id: self.registration_id.clone(),
            identifier: identifier.into(),
        }
    }
}

impl PartialEq for Credentials {
    fn eq(&self, other: &Self) -> bool {
        self.provider == other.provider && self.identifier == other.identifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parses_wire_names() {
        assert_eq!("LOCAL".parse::<IdentityProvider>().unwrap(), IdentityProvider::Local);
        assert_eq!("GOOGLE".parse::<IdentityProvider>().unwrap(), IdentityProvider::Google);
        assert_eq!(
            "FACEBOOK".parse::<IdentityProvider>().unwrap(),
            IdentityProvider::Facebook
        );
        assert!(matches!(
            "github".parse::<IdentityProvider>(),
            Err(AuthError::InvalidProvider(p)) if p == "github"
        ));
    }

    #[test]
    fn provider_serializes_uppercase() {
        let json = serde_json::to_string(&IdentityProvider::Google).unwrap();
        assert_eq!(json, r#""GOOGLE""#);
        assert_eq!(IdentityProvider::Local.to_string(), "LOCAL");
    }

    #[test]
    fn local_credentials_require_login() {
        assert!(matches!(
            Credentials::new("LOCAL", "", "s3cret!"),
            Err(AuthError::InvalidCredentials(_))
        ));
        assert!(Credentials::new("GOOGLE", "", "auth-code").is_ok());
    }

    #[test]
    fn credentials_require_identifier() {
        assert!(matches!(
            Credentials::new("LOCAL", "alice", ""),
            Err(AuthError::InvalidCredentials(_))
        ));
    }

    #[test]
    fn equality_ignores_registration_id() {
        let a = Credentials::new("GOOGLE", "sub-1", "same").unwrap();
        let b = Credentials::new("GOOGLE", "sub-2", "same").unwrap();
        let c = Credentials::new("LOCAL", "sub-1", "same").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn with_identifier_keeps_provider_and_registration() {
        let creds = Credentials::new("LOCAL", "alice", "plain").unwrap();
        let hashed = creds.with_identifier("$2b$04$hash");
        assert_eq!(hashed.provider(), IdentityProvider::Local);
        assert_eq!(hashed.registration_id(), "alice");
        assert_eq!(hashed.identifier(), "$2b$04$hash");
    }
}
