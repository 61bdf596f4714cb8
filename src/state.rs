// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::api::route_table;
use crate::auth::{
    AccountProvisioner, AuthenticationGate, HmacVerifier, PayloadVerifier, RouteTable,
    SignatureCache,
};
use crate::config::AppConfig;
use crate::storage::{AccountStore, CacheStore};

/// Platform webhook settings.
#[derive(Clone, Default)]
pub struct CallbackConfig {
    /// Shared secret expected in every webhook body
    pub secret: String,
    /// Returned verbatim for `type = "confirmation"`
    pub confirm: String,
}

#[derive(Clone)]
pub struct AppState {
    pub gate: AuthenticationGate,
    pub accounts: Arc<dyn AccountStore>,
    pub routes: Arc<RouteTable>,
    pub callback: CallbackConfig,
}

impl AppState {
    pub fn new(
        config: &AppConfig,
        accounts: Arc<dyn AccountStore>,
        cache: Arc<dyn CacheStore>,
    ) -> Self {
        let verifier: Arc<dyn PayloadVerifier> = Arc::new(HmacVerifier::new(&config.app_secret));
        Self::with_verifier(config, accounts, SignatureCache::new(cache), verifier)
    }

    /// Build state around a specific verifier and signature cache.
    pub fn with_verifier(
        config: &AppConfig,
        accounts: Arc<dyn AccountStore>,
        cache: SignatureCache,
        verifier: Arc<dyn PayloadVerifier>,
    ) -> Self {
        let provisioner = AccountProvisioner::new(Arc::clone(&accounts));
        Self {
            gate: AuthenticationGate::new(verifier, cache, provisioner),
            accounts,
            routes: Arc::new(route_table()),
            callback: CallbackConfig {
                secret: config.callback_secret.clone(),
                confirm: config.callback_confirm.clone(),
            },
        }
    }
}
