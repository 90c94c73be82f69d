// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration and identity linking.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::credentials::{Credentials, IdentityProvider};
use super::person::{InvalidPerson, Person};
use super::repository::{PeopleRepository, RepositoryError};
use crate::auth::{AuthError, Hasher, ThirdPartyAuth};

/// Error type for people operations.
#[derive(Debug, thiserror::Error)]
pub enum PeopleError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    InvalidPerson(#[from] InvalidPerson),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Input for [`PeopleService::register`].
#[derive(Debug, Clone)]
pub struct RegisterCommand {
    /// Login name (LOCAL only)
    pub login: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: Option<String>,
    /// Provider wire name (`LOCAL`, `GOOGLE`, ...)
    pub identity_provider: String,
    /// Password for LOCAL, authorization code for GOOGLE
    pub token: String,
}

/// Person registration and credential management.
pub struct PeopleService {
    repository: Arc<dyn PeopleRepository>,
    password_hasher: Arc<dyn Hasher>,
    third_party: Arc<dyn ThirdPartyAuth>,
}

impl PeopleService {
    pub fn new(
        repository: Arc<dyn PeopleRepository>,
        password_hasher: Arc<dyn Hasher>,
        third_party: Arc<dyn ThirdPartyAuth>,
    ) -> Self {
        Self {
            repository,
            password_hasher,
            third_party,
        }
    }

    /// Register a new person and return its ID.
    ///
    /// - LOCAL: the password is hashed before storage
    /// - GOOGLE: the authorization code is verified and the asserted subject
    ///   becomes the credential, so later Google logins can find it
    pub async fn register(&self, command: RegisterCommand) -> Result<Uuid, PeopleError> {
        let provider = command.identity_provider.parse::<IdentityProvider>()?;
        let credentials = self
            .resolve_credentials(provider, &command.login, &command.token)
            .await?;

        let person = Person::new(
            Uuid::nil(),
            command.first_name,
            command.last_name,
            command.display_name,
            vec![credentials],
        )?;

        self.repository.register(&person).await?;

        info!(person_id = %person.id(), provider = %provider, "Person registered");
        Ok(person.id())
    }

    pub async fn find_by_id(&self, person_id: Uuid) -> Result<Person, PeopleError> {
        Ok(self.repository.find_person(person_id).await?)
    }

    /// Link credentials to an existing person, replacing any credential of
    /// the same provider.
    ///
    /// `secret` is the password for LOCAL and the authorization code for
    /// GOOGLE, as in [`register`](Self::register).
    pub async fn link_identity(
        &self,
        person_id: Uuid,
        provider: IdentityProvider,
        login: &str,
        secret: &str,
    ) -> Result<(), PeopleError> {
        let credentials = self.resolve_credentials(provider, login, secret).await?;

        self.repository
            .update_person(
                person_id,
                Box::new(move |person: &mut Person| person.add_or_replace_identity(credentials)),
            )
            .await?;

        info!(person_id = %person_id, provider = %provider, "Identity linked");
        Ok(())
    }

    async fn resolve_credentials(
        &self,
        provider: IdentityProvider,
        login: &str,
        secret: &str,
    ) -> Result<Credentials, AuthError> {
        match provider {
            IdentityProvider::Local => {
                // Validate the shape before paying for the hash.
                let plain = Credentials::with_provider(provider, login, secret)?;
                let hash = self.password_hasher.hash(secret)?;
                Ok(plain.with_identifier(hash))
            }
            IdentityProvider::Google => {
                let identity = self.third_party.validate_token(secret).await?;
                Credentials::with_provider(provider, identity.subject.clone(), identity.subject)
            }
            IdentityProvider::Facebook => {
                Err(AuthError::UnsupportedProvider(provider.to_string()))
            }
        }
    }
}
