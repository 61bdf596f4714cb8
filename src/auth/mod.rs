// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Every request is authenticated with the launch parameters the platform
//! signed when it opened the mini-app.
//!
//! ## Auth Flow
//!
//! 1. The platform launches the app with `vk_*` query parameters and `sign`
//! 2. The client forwards that query string in the `x-vk` header
//! 3. The server:
//!    - Short-circuits on a cached signature for the same identity
//!    - Otherwise verifies the HMAC over the sorted `vk_*` parameters
//!    - Rejects payloads older than 12 hours
//!    - Provisions the account on first contact
//! 4. The route table decides which roles may call each route
//!
//! ## Security
//!
//! - Signatures are compared in constant time
//! - A cached signature is trusted only when it equals the presented one
//! - Banned accounts are refused on every authenticated route
//! - Only the health probe and the platform webhook are exempt; the webhook
//!   checks its own shared secret

pub mod cache;
pub mod error;
pub mod extractor;
pub mod gate;
pub mod middleware;
pub mod payload;
pub mod provisioner;
pub mod replay;
pub mod roles;
pub mod routes;
pub mod signature;

pub use cache::SignatureCache;
pub use error::AuthError;
pub use extractor::CurrentAccount;
pub use gate::{AuthenticationGate, RequestIdentity};
pub use payload::SignedPayload;
pub use provisioner::AccountProvisioner;
pub use roles::Role;
pub use routes::{RouteAccess, RouteTable};
pub use signature::{HmacVerifier, PayloadVerifier};
