// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles and the per-route access decision.

use serde::{Deserialize, Serialize};

use crate::storage::Account;

/// User roles for authorization.
///
/// ## Ordering
///
/// `Banned < User < Moderator < Admin`. The ordering is informational only:
/// route checks use exact membership, never a threshold.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Vetoed from every route
    Banned,
    /// Regular user, assigned on registration
    #[default]
    User,
    /// Moderates user submissions
    Moderator,
    /// Full administrative access
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Banned => write!(f, "banned"),
            Role::User => write!(f, "user"),
            Role::Moderator => write!(f, "moderator"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// Why [`allow`] refused an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    Banned,
    InsufficientRole,
}

/// Decide whether `account` may use a route requiring `required`.
///
/// A banned account is always refused, whatever the route declares. An empty
/// requirement admits everyone else; otherwise the account's role must be
/// listed explicitly.
pub fn check(account: &Account, required: &[Role]) -> Result<(), Denial> {
    if account.role == Role::Banned {
        return Err(Denial::Banned);
    }
    if required.is_empty() || required.contains(&account.role) {
        Ok(())
    } else {
        Err(Denial::InsufficientRole)
    }
}

/// Boolean form of [`check`].
pub fn allow(account: &Account, required: &[Role]) -> bool {
    check(account, required).is_ok()
}
