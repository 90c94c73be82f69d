// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Person persistence port and the in-memory adapter.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::credentials::IdentityProvider;
use super::person::Person;

/// Error type for person repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Repository backend error: {0}")]
    Backend(String),
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// In-place change applied to a stored person by
/// [`PeopleRepository::update_person`].
pub type PersonUpdate = Box<dyn FnOnce(&mut Person) + Send>;

/// Storage of persons and their provider-scoped credential rows.
#[async_trait]
pub trait PeopleRepository: Send + Sync {
    /// Look up a credential row.
    ///
    /// Returns the owning person's ID and the stored identifier (a password
    /// hash for LOCAL, the asserted subject otherwise).
    async fn find_credentials(
        &self,
        provider: IdentityProvider,
        registration_id: &str,
    ) -> RepositoryResult<(Uuid, String)>;

    async fn find_person(&self, person_id: Uuid) -> RepositoryResult<Person>;

    /// Store a new person. Fails if the person or any of its credential rows
    /// already exists.
    async fn register(&self, person: &Person) -> RepositoryResult<()>;

    /// Load a person, apply `update` and store the result, re-indexing its
    /// credential rows.
    ///
    /// The whole load-modify-store runs as one step: concurrent updates of
    /// the same person are applied one after the other and none is lost.
    /// Returns the stored person.
    async fn update_person(
        &self,
        person_id: Uuid,
        update: PersonUpdate,
    ) -> RepositoryResult<Person>;
}

type CredentialKey = (IdentityProvider, String);

#[derive(Default)]
struct Tables {
    people: HashMap<Uuid, Person>,
    credentials: HashMap<CredentialKey, (Uuid, String)>,
}

impl Tables {
    /// Credential keys of `person` that belong to someone else.
    fn foreign_credentials(&self, person: &Person) -> Vec<String> {
        person
            .identities()
            .iter()
            .filter_map(|c| {
                let key = (c.provider(), c.registration_id().to_string());
                match self.credentials.get(&key) {
                    Some((owner, _)) if *owner != person.id() => {
                        Some(format!("{} credentials {}", c.provider(), c.registration_id()))
                    }
                    _ => None,
                }
            })
            .collect()
    }

    fn index(&mut self, person: &Person) {
        self.credentials.retain(|_, (owner, _)| *owner != person.id());
        for c in person.identities() {
            self.credentials.insert(
                (c.provider(), c.registration_id().to_string()),
                (person.id(), c.identifier().to_string()),
            );
        }
    }
}

/// In-process repository.
///
/// Every operation takes the table lock once, so registration and its
/// credential-uniqueness check are atomic.
#[derive(Default)]
pub struct InMemoryPeopleRepository {
    tables: RwLock<Tables>,
}

impl InMemoryPeopleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.tables.read().await.people.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl PeopleRepository for InMemoryPeopleRepository {
    async fn find_credentials(
        &self,
        provider: IdentityProvider,
        registration_id: &str,
    ) -> RepositoryResult<(Uuid, String)> {
        let tables = self.tables.read().await;
        tables
            .credentials
            .get(&(provider, registration_id.to_string()))
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("{provider} credentials")))
    }

    async fn find_person(&self, person_id: Uuid) -> RepositoryResult<Person> {
        let tables = self.tables.read().await;
        tables
            .people
            .get(&person_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("Person {person_id}")))
    }

    async fn register(&self, person: &Person) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;

        if tables.people.contains_key(&person.id()) {
            return Err(RepositoryError::AlreadyExists(format!("Person {}", person.id())));
        }

        let taken = tables.foreign_credentials(person);
        if let Some(first) = taken.into_iter().next() {
            return Err(RepositoryError::AlreadyExists(first));
        }

        tables.index(person);
        tables.people.insert(person.id(), person.clone());
        Ok(())
    }

    async fn update_person(
        &self,
        person_id: Uuid,
        update: PersonUpdate,
    ) -> RepositoryResult<Person> {
        let mut tables = self.tables.write().await;

        let mut person = tables
            .people
            .get(&person_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("Person {person_id}")))?;
        update(&mut person);

        // The stored copy is untouched until every check has passed.
        let taken = tables.foreign_credentials(&person);
        if let Some(first) = taken.into_iter().next() {
            return Err(RepositoryError::AlreadyExists(first));
        }

        tables.index(&person);
        tables.people.insert(person_id, person.clone());
        Ok(person)
    }
}
