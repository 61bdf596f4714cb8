// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Short-circuit cache of verified signatures.
//!
//! After a full verification the signature is remembered per identity for
//! an hour. A later request is trusted without recomputing the HMAC only if
//! it presents exactly the remembered signature. The cache is not
//! authoritative: misses, mismatches and cache faults all fall back to full
//! verification.

use std::sync::Arc;
use std::time::Duration;

use crate::storage::CacheStore;

/// Lifetime of a remembered signature.
pub const SIGNATURE_TTL: Duration = Duration::from_secs(60 * 60);

const KEY_PREFIX: &str = "sign-";

#[derive(Clone)]
pub struct SignatureCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl SignatureCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            ttl: SIGNATURE_TTL,
        }
    }

    /// Create with custom TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    fn key(external_id: u64) -> String {
        format!("{KEY_PREFIX}{external_id}")
    }

    /// Last verified signature for an identity. Faults read as a miss.
    pub fn get(&self, external_id: u64) -> Option<String> {
        match self.store.get(&Self::key(external_id)) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(external_id, error = %e, "Signature cache read failed, verifying fully");
                None
            }
        }
    }

    /// Whether `signature` was verified for this identity within the TTL.
    pub fn is_verified(&self, external_id: u64, signature: &str) -> bool {
        !signature.is_empty() && self.get(external_id).as_deref() == Some(signature)
    }

    /// Remember a verified signature. Faults are logged and ignored.
    pub fn put(&self, external_id: u64, signature: &str) {
        if let Err(e) = self
            .store
            .set(&Self::key(external_id), signature.to_string(), self.ttl)
        {
            tracing::warn!(external_id, error = %e, "Signature cache write failed");
        }
    }
}
