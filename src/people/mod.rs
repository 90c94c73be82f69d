// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # People Module
//!
//! Persons, their provider-scoped credentials, and the repository port they
//! are stored through.

pub mod credentials;
pub mod person;
pub mod repository;
pub mod service;

pub use credentials::{Credentials, IdentityProvider};
pub use person::{InvalidPerson, Person};
pub use repository::{
    InMemoryPeopleRepository, PeopleRepository, PersonUpdate, RepositoryError, RepositoryResult,
};
pub use service::{PeopleError, PeopleService, RegisterCommand};
