// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Slanger server - signed launch parameter gate for a mini-app backend
//!
//! Every request carries the launch parameters the platform handed to the
//! client, signed with the application secret. The server verifies them,
//! provisions an account on first contact and applies per-route role rules
//! before any handler runs.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers and route table (Axum)
//! - `auth` - Launch parameter verification, provisioning and role checks
//! - `config` - Environment configuration
//! - `storage` - Account database (redb) and TTL cache

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod state;
pub mod storage;
