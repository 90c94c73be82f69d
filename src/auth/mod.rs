// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Credential verification and the token lifecycle.
//!
//! ## Auth Flow
//!
//! 1. Client logs in with LOCAL credentials or a Google authorization code
//! 2. Server verifies the identity and mints a token pair:
//!    - access token: HS256 JWT carrying `sub` (person ID), `display_name`,
//!      optional `roles` and a fresh `jti`
//!    - refresh token: `hash(jti)`
//! 3. Client sends `Authorization: Bearer <access token>` on protected routes
//! 4. When the access token expires, the client presents both tokens to
//!    `/v1/auth/refresh` and receives a new pair
//!
//! ## Security
//!
//! - Unknown identities and wrong secrets fail identically
//! - Google ID tokens must be RS256, signed by a key from Google's JWKS
//! - Google signing keys are cached with a TTL and refetched once per expiry
//! - Access token expiry has no leeway

pub mod claims;
pub mod error;
pub mod extractor;
pub mod google;
pub mod hasher;
pub mod jwks;
pub mod service;
pub mod token;

pub use claims::{
    AuthResponse, AuthenticatedUser, ExternalIdentity, TokenClaims, TokenPayload, TokenRing,
};
pub use error::{category_status, AuthError, ErrorCategory};
pub use extractor::{Auth, OptionalAuth};
pub use google::{GoogleAuthClient, ThirdPartyAuth};
pub use hasher::{BcryptHasher, Hasher};
pub use jwks::{HttpKeySource, KeySource, RemoteKeyCache};
pub use service::AuthService;
pub use token::TokenProvider;
