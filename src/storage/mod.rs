// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! - `accounts` - redb database of accounts and their profiles
//! - `cache` - in-process key/value cache with per-entry TTL
//!
//! ## Storage Layout
//!
//! ```text
//! $DATA_DIR/
//!   accounts.redb   # accounts + profiles tables
//! ```

pub mod accounts;
pub mod cache;

pub use accounts::{
    Account, AccountDatabase, AccountStore, InsertOutcome, Profile, StoreError, StoreResult,
    DEFAULT_REFERRAL,
};
pub use cache::{CacheError, CacheResult, CacheStore, TtlCache};
