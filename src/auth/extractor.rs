// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the authenticated account.
//!
//! Use the `CurrentAccount` extractor in handlers behind the authentication
//! middleware:
//!
//! ```rust,ignore
//! async fn my_handler(CurrentAccount(identity): CurrentAccount) -> impl IntoResponse {
//!     // identity.account is the caller's Account
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, RequestIdentity};

/// The identity attached by the authentication middleware.
///
/// Rejects with `MissingCredential` when used on a route the middleware
/// skipped.
pub struct CurrentAccount(pub RequestIdentity);

impl<S> FromRequestParts<S> for CurrentAccount
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestIdentity>()
            .cloned()
            .map(CurrentAccount)
            .ok_or(AuthError::MissingCredential)
    }
}
