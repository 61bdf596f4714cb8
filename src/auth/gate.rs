// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication gate.
//!
//! ## Flow
//!
//! ```text
//! no header ───────────────────────────────────────────────▶ MissingCredential
//! header ─▶ parse ─▶ cache hit (same signature) ───────────▶ provision
//!                 └▶ miss ─▶ verify HMAC ─▶ replay window ─▶ cache put ─▶ provision
//! ```
//!
//! Steps run strictly in this order for a request. The cache is written once
//! per full verification; the account store is written on first contact
//! only.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::cache::SignatureCache;
use super::payload::SignedPayload;
use super::provisioner::AccountProvisioner;
use super::replay::check_replay_window;
use super::signature::PayloadVerifier;
use super::AuthError;
use crate::storage::Account;

/// Identity resolved for the current request.
///
/// Attached to the request extensions by the authentication middleware and
/// read-only afterwards. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIdentity {
    pub external_id: u64,
    pub account: Account,
}

#[derive(Clone)]
pub struct AuthenticationGate {
    verifier: Arc<dyn PayloadVerifier>,
    cache: SignatureCache,
    provisioner: AccountProvisioner,
}

impl AuthenticationGate {
    pub fn new(
        verifier: Arc<dyn PayloadVerifier>,
        cache: SignatureCache,
        provisioner: AccountProvisioner,
    ) -> Self {
        Self {
            verifier,
            cache,
            provisioner,
        }
    }

    /// Authenticate the raw launch parameters of a request.
    pub async fn authenticate(
        &self,
        raw: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<RequestIdentity, AuthError> {
        let raw = raw
            .filter(|r| !r.is_empty())
            .ok_or(AuthError::MissingCredential)?;
        let payload = SignedPayload::parse(raw)?;
        let external_id = payload.external_id();

        if self.cache.is_verified(external_id, payload.signature()) {
            tracing::trace!(external_id, "Signature cache hit");
        } else {
            self.verifier.verify(&payload)?;
            check_replay_window(payload.issued_at(), now)?;
            self.cache.put(external_id, payload.signature());
        }

        let account = self
            .provisioner
            .ensure(external_id, payload.referral())
            .await?;

        Ok(RequestIdentity {
            external_id,
            account,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::auth::signature::HmacVerifier;
    use crate::auth::Role;
    use crate::storage::{AccountDatabase, AccountStore, TtlCache};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::TempDir;

    pub(crate) const SECRET: &str = "test-app-secret";

    /// Counts full verifications.
    pub(crate) struct CountingVerifier {
        inner: HmacVerifier,
        pub calls: AtomicUsize,
    }

    impl CountingVerifier {
        pub(crate) fn new(secret: &str) -> Self {
            Self {
                inner: HmacVerifier::new(secret),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl PayloadVerifier for CountingVerifier {
        fn verify(&self, payload: &SignedPayload) -> Result<(), AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.verify(payload)
        }
    }

    /// Build a correctly signed launch query for `external_id` issued at `ts`.
    pub(crate) fn signed_query(secret: &str, external_id: u64, ts: i64) -> String {
        let unsigned = format!(
            "vk_access_token_settings=&vk_app_id=51234567&vk_language=ru&vk_platform=mobile_web\
             &vk_ts={ts}&vk_user_id={external_id}"
        );
        let payload = SignedPayload::parse(&format!("{unsigned}&sign=placeholder")).unwrap();
        let sign = HmacVerifier::new(secret).sign(&payload);
        format!("{unsigned}&sign={sign}")
    }

    struct Fixture {
        gate: AuthenticationGate,
        verifier: Arc<CountingVerifier>,
        db: Arc<AccountDatabase>,
        _dir: TempDir,
    }

    fn fixture(ttl: Duration) -> Fixture {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db = Arc::new(AccountDatabase::open(&dir.path().join("accounts.redb")).unwrap());
        let verifier = Arc::new(CountingVerifier::new(SECRET));
        let cache = SignatureCache::new(Arc::new(TtlCache::new(100))).with_ttl(ttl);
        let gate = AuthenticationGate::new(
            verifier.clone(),
            cache,
            AccountProvisioner::new(db.clone()),
        );
        Fixture {
            gate,
            verifier,
            db,
            _dir: dir,
        }
    }

    fn at(ts: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(ts, 0).unwrap()
    }

    const NOW: i64 = 1_700_000_000;

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let f = fixture(Duration::from_secs(3600));
        let result = f.gate.authenticate(None, at(NOW)).await;
        assert!(matches!(result, Err(AuthError::MissingCredential)));

        let result = f.gate.authenticate(Some(""), at(NOW)).await;
        assert!(matches!(result, Err(AuthError::MissingCredential)));
        assert_eq!(f.verifier.calls(), 0);
    }

    #[tokio::test]
    async fn valid_payload_provisions_account() {
        let f = fixture(Duration::from_secs(3600));
        let query = signed_query(SECRET, 42, NOW);

        let identity = f.gate.authenticate(Some(&query), at(NOW)).await.unwrap();
        assert_eq!(identity.external_id, 42);
        assert_eq!(identity.account.external_id, 42);
        assert_eq!(identity.account.role, Role::User);
        assert_eq!(f.db.count().unwrap(), 1);
    }

    #[tokio::test]
    async fn bad_signature_is_rejected_without_provisioning() {
        let f = fixture(Duration::from_secs(3600));
        let query = signed_query("wrong-secret", 42, NOW);

        let result = f.gate.authenticate(Some(&query), at(NOW)).await;
        assert!(matches!(result, Err(AuthError::InvalidSignature)));
        assert_eq!(f.db.count().unwrap(), 0);
        assert!(f.db.find(42).unwrap().is_none());
    }

    #[tokio::test]
    async fn stale_payload_is_rejected_even_if_signed() {
        let f = fixture(Duration::from_secs(3600));
        let query = signed_query(SECRET, 42, NOW - 13 * 3600);

        let result = f.gate.authenticate(Some(&query), at(NOW)).await;
        assert!(matches!(result, Err(AuthError::ExpiredCredential)));
        assert_eq!(f.db.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn cache_hit_skips_verification() {
        let f = fixture(Duration::from_secs(3600));
        let query = signed_query(SECRET, 42, NOW);

        f.gate.authenticate(Some(&query), at(NOW)).await.unwrap();
        f.gate.authenticate(Some(&query), at(NOW + 60)).await.unwrap();
        f.gate.authenticate(Some(&query), at(NOW + 120)).await.unwrap();

        assert_eq!(f.verifier.calls(), 1);
        assert_eq!(f.db.count().unwrap(), 1);
    }

    #[tokio::test]
    async fn different_signature_always_verifies() {
        let f = fixture(Duration::from_secs(3600));
        let first = signed_query(SECRET, 42, NOW);
        let second = signed_query(SECRET, 42, NOW + 5);

        f.gate.authenticate(Some(&first), at(NOW)).await.unwrap();
        f.gate.authenticate(Some(&second), at(NOW + 5)).await.unwrap();
        assert_eq!(f.verifier.calls(), 2);

        // A forged signature for a cached identity is not trusted.
        let forged = first.replace("vk_language=ru", "vk_language=en");
        let result = f.gate.authenticate(Some(&forged), at(NOW + 10)).await;
        // Same `sign` value as the cached one, but the cache holds the second
        // signature now, so this goes through full verification and fails.
        assert!(matches!(result, Err(AuthError::InvalidSignature)));
        assert_eq!(f.verifier.calls(), 3);
    }

    #[tokio::test]
    async fn expired_cache_entry_reverifies() {
        let f = fixture(Duration::from_millis(1));
        let query = signed_query(SECRET, 42, NOW);

        f.gate.authenticate(Some(&query), at(NOW)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        // Past the cache TTL but inside the replay window.
        f.gate
            .authenticate(Some(&query), at(NOW + 2 * 3600))
            .await
            .unwrap();
        assert_eq!(f.verifier.calls(), 2);
        assert_eq!(f.db.count().unwrap(), 1);

        tokio::time::sleep(Duration::from_millis(5)).await;

        // Replay window is independent of the cache.
        let result = f.gate.authenticate(Some(&query), at(NOW + 13 * 3600)).await;
        assert!(matches!(result, Err(AuthError::ExpiredCredential)));
    }

    #[tokio::test]
    async fn malformed_payload_is_rejected() {
        let f = fixture(Duration::from_secs(3600));
        let result = f
            .gate
            .authenticate(Some("vk_user_id=abc&sign=x"), at(NOW))
            .await;
        assert!(matches!(result, Err(AuthError::MalformedCredential)));
        assert_eq!(f.verifier.calls(), 0);
    }
}
