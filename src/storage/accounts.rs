// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `accounts`: external_id → serialized Account
//! - `profiles`: external_id → serialized Profile
//!
//! redb admits a single write transaction at a time. Every read-then-write
//! in this module happens inside one write transaction, so concurrent
//! callers are serialized on the writer lock and never observe each other's
//! partial state.

use std::path::Path;

use chrono::{DateTime, Utc};
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use serde::{Deserialize, Serialize};

use crate::auth::Role;

// =============================================================================
// Table Definitions
// =============================================================================

const ACCOUNTS: TableDefinition<u64, &[u8]> = TableDefinition::new("accounts");
const PROFILES: TableDefinition<u64, &[u8]> = TableDefinition::new("profiles");

/// Referral tag stored when the launch payload carries none.
pub const DEFAULT_REFERRAL: &str = "other";

// =============================================================================
// Records
// =============================================================================

/// A platform user known to this service.
///
/// Keyed by the platform-assigned `external_id`, which is never regenerated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub external_id: u64,
    /// Accumulated points
    pub points: u64,
    pub role: Role,
    /// Referral tag from the first launch
    pub referral: String,
    pub registered_at: DateTime<Utc>,
    /// Entries submitted since `daily_submissions_reset`
    pub daily_submissions: u32,
    pub daily_submissions_reset: Option<DateTime<Utc>>,
}

impl Account {
    /// A freshly registered account with default role and zero points.
    pub fn new(external_id: u64, referral: Option<&str>, registered_at: DateTime<Utc>) -> Self {
        Self {
            external_id,
            points: 0,
            role: Role::User,
            referral: referral
                .filter(|r| !r.is_empty())
                .unwrap_or(DEFAULT_REFERRAL)
                .to_string(),
            registered_at,
            daily_submissions: 0,
            daily_submissions_reset: None,
        }
    }
}

/// Notification preferences attached to an account.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// Platform push notifications
    pub push: bool,
    /// Direct messages from the community
    pub im: bool,
}

/// Result of an insert-if-absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertOutcome {
    /// The stored account: the new row, or the one that already existed.
    pub account: Account,
    pub created: bool,
}

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Store Trait
// =============================================================================

/// Relational store for accounts and their profiles.
///
/// Methods are blocking; async callers run them on the blocking pool.
pub trait AccountStore: Send + Sync {
    /// Look up an account by its external identity.
    fn find(&self, external_id: u64) -> StoreResult<Option<Account>>;

    /// Insert `account` and `profile` as one unit unless an account with the
    /// same identity exists, in which case nothing is written and the
    /// existing account is returned.
    fn insert_if_absent(&self, account: &Account, profile: &Profile) -> StoreResult<InsertOutcome>;

    /// Profile of an account.
    fn profile(&self, external_id: u64) -> StoreResult<Option<Profile>>;

    /// Replace the profile of an existing account. Returns `false` when the
    /// account does not exist.
    fn update_profile(&self, external_id: u64, profile: &Profile) -> StoreResult<bool>;

    /// Change the role of an existing account.
    fn set_role(&self, external_id: u64, role: Role) -> StoreResult<Option<Account>>;
}

// =============================================================================
// AccountDatabase
// =============================================================================

/// redb-backed [`AccountStore`].
pub struct AccountDatabase {
    db: Database,
}

impl AccountDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ACCOUNTS)?;
            let _ = write_txn.open_table(PROFILES)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Number of stored accounts.
    pub fn count(&self) -> StoreResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ACCOUNTS)?;
        Ok(table.len()?)
    }
}

impl AccountStore for AccountDatabase {
    fn find(&self, external_id: u64) -> StoreResult<Option<Account>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ACCOUNTS)?;
        match table.get(external_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    fn insert_if_absent(&self, account: &Account, profile: &Profile) -> StoreResult<InsertOutcome> {
        let account_json = serde_json::to_vec(account)?;
        let profile_json = serde_json::to_vec(profile)?;

        let write_txn = self.db.begin_write()?;
        let outcome = {
            let mut accounts = write_txn.open_table(ACCOUNTS)?;
            let existing: Option<Account> = accounts
                .get(account.external_id)?
                .map(|value| serde_json::from_slice(value.value()))
                .transpose()?;

            match existing {
                Some(existing) => InsertOutcome {
                    account: existing,
                    created: false,
                },
                None => {
                    accounts.insert(account.external_id, account_json.as_slice())?;
                    let mut profiles = write_txn.open_table(PROFILES)?;
                    profiles.insert(account.external_id, profile_json.as_slice())?;
                    InsertOutcome {
                        account: account.clone(),
                        created: true,
                    }
                }
            }
        };

        if outcome.created {
            write_txn.commit()?;
        } else {
            write_txn.abort()?;
        }
        Ok(outcome)
    }

    fn profile(&self, external_id: u64) -> StoreResult<Option<Profile>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PROFILES)?;
        match table.get(external_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    fn update_profile(&self, external_id: u64, profile: &Profile) -> StoreResult<bool> {
        let json = serde_json::to_vec(profile)?;

        let write_txn = self.db.begin_write()?;
        let exists = {
            let accounts = write_txn.open_table(ACCOUNTS)?;
            let exists = accounts.get(external_id)?.is_some();
            if exists {
                let mut profiles = write_txn.open_table(PROFILES)?;
                profiles.insert(external_id, json.as_slice())?;
            }
            exists
        };
        write_txn.commit()?;
        Ok(exists)
    }

    fn set_role(&self, external_id: u64, role: Role) -> StoreResult<Option<Account>> {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut accounts = write_txn.open_table(ACCOUNTS)?;
            let current: Option<Account> = accounts
                .get(external_id)?
                .map(|value| serde_json::from_slice(value.value()))
                .transpose()?;

            match current {
                Some(mut account) => {
                    account.role = role;
                    let json = serde_json::to_vec(&account)?;
                    accounts.insert(external_id, json.as_slice())?;
                    Some(account)
                }
                None => None,
            }
        };
        write_txn.commit()?;
        Ok(updated)
    }
}
