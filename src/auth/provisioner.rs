// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! First-contact account provisioning.

use std::sync::Arc;

use chrono::Utc;

use super::AuthError;
use crate::storage::{Account, AccountStore, Profile, StoreError};

/// Ensures exactly one account exists per external identity.
///
/// Creation goes through [`AccountStore::insert_if_absent`], which checks
/// and inserts inside one exclusive write transaction. Two first requests
/// for the same identity therefore produce a single row; the loser receives
/// the winner's account.
#[derive(Clone)]
pub struct AccountProvisioner {
    store: Arc<dyn AccountStore>,
}

impl AccountProvisioner {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Return the account for `external_id`, creating it (with an empty
    /// profile) on first contact.
    ///
    /// Store work runs on the blocking pool. A spawned blocking task is not
    /// cancelled when this future is dropped, so a commit that has started
    /// always finishes.
    pub async fn ensure(
        &self,
        external_id: u64,
        referral: Option<&str>,
    ) -> Result<Account, AuthError> {
        let store = Arc::clone(&self.store);
        let referral = referral.map(str::to_owned);

        let (account, created) = tokio::task::spawn_blocking(move || {
            ensure_blocking(store.as_ref(), external_id, referral.as_deref())
        })
        .await
        .map_err(|e| AuthError::Provisioning(format!("provisioning task failed: {e}")))?
        .map_err(|e| {
            tracing::error!(external_id, error = %e, "Account provisioning failed");
            AuthError::Provisioning(e.to_string())
        })?;

        if created {
            tracing::info!(external_id, referral = %account.referral, "Registered new account");
        }
        Ok(account)
    }
}

fn ensure_blocking(
    store: &dyn AccountStore,
    external_id: u64,
    referral: Option<&str>,
) -> Result<(Account, bool), StoreError> {
    if let Some(account) = store.find(external_id)? {
        return Ok((account, false));
    }

    let account = Account::new(external_id, referral, Utc::now());
    let outcome = store.insert_if_absent(&account, &Profile::default())?;
    Ok((outcome.account, outcome.created))
}
