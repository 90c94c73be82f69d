// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Projecta Identity - Authentication & Token Lifecycle Service
//!
//! Verifies who a caller is (local login/password or Google sign-in) and
//! manages the stateless access/refresh token pairs that prove it
//! afterwards.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Hashing, token minting, Google sign-in, login and refresh
//! - `config` - Environment configuration
//! - `people` - Persons, credentials and their repository

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod people;
pub mod state;
