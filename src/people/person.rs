// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Person aggregate.

use uuid::Uuid;

use super::credentials::Credentials;

/// Allowed name length in bytes.
const NAME_LENGTH: std::ops::RangeInclusive<usize> = 2..=255;

/// A person failed validation.
#[derive(Debug, thiserror::Error)]
#[error("Invalid person: {0}")]
pub struct InvalidPerson(pub String);

/// A person and the credentials linked to them.
#[derive(Debug, Clone)]
pub struct Person {
    id: Uuid,
    first_name: String,
    last_name: String,
    display_name: Option<String>,
    identities: Vec<Credentials>,
}

impl Person {
    /// Create a person.
    ///
    /// A nil `id` is replaced with a fresh one. All validation problems are
    /// reported together.
    pub fn new(
        id: Uuid,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        display_name: Option<String>,
        identities: Vec<Credentials>,
    ) -> Result<Self, InvalidPerson> {
        let first_name = first_name.into();
        let last_name = last_name.into();

        let mut problems = Vec::new();
        if !NAME_LENGTH.contains(&first_name.len()) {
            problems.push("invalid person first name");
        }
        if !NAME_LENGTH.contains(&last_name.len()) {
            problems.push("invalid person last name");
        }
        if identities.is_empty() {
            problems.push("no identities provided");
        }
        if !problems.is_empty() {
            return Err(InvalidPerson(problems.join("; ")));
        }

        Ok(Self {
            id: if id.is_nil() { Uuid::new_v4() } else { id },
            first_name,
            last_name,
            display_name: display_name.filter(|d| !d.trim().is_empty()),
            identities,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Explicit display name, falling back to the full name.
    pub fn display_name(&self) -> String {
        self.display_name
            .clone()
            .unwrap_or_else(|| self.full_name())
    }

    pub fn identities(&self) -> &[Credentials] {
        &self.identities
    }

    /// Whether any linked credential equals `credentials`.
    pub fn identify(&self, credentials: &Credentials) -> bool {
        self.identities.iter().any(|c| c == credentials)
    }

    /// Replace the credential for the same provider, or append it.
    pub fn add_or_replace_identity(&mut self, credentials: Credentials) {
        match self
            .identities
            .iter_mut()
            .find(|c| c.provider() == credentials.provider())
        {
            Some(existing) => *existing = credentials,
            None => self.identities.push(credentials),
        }
    }
}
