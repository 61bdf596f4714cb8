// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Platform webhook.
//!
//! Exempt from launch-parameter authentication. The platform proves itself
//! with the shared `secret` field in each event body instead.

use axum::{extract::State, Json};
use subtle::ConstantTimeEq;

use crate::{models::CallbackEvent, state::AppState};

const CONFIRMATION: &str = "confirmation";

/// `POST /v1/utils/callback`
///
/// Events with a wrong secret get an empty 200 so the sender learns
/// nothing. `confirmation` events receive the configured confirmation
/// string; everything else is acknowledged with `ok`.
pub async fn callback(State(state): State<AppState>, Json(event): Json<CallbackEvent>) -> String {
    let expected = state.callback.secret.as_bytes();
    let presented = event.secret.as_deref().unwrap_or_default().as_bytes();

    // An unset secret rejects everything.
    if expected.is_empty() || !bool::from(presented.ct_eq(expected)) {
        tracing::warn!(kind = %event.kind, "Webhook event with invalid secret");
        return String::new();
    }

    if event.kind == CONFIRMATION {
        return state.callback.confirm.clone();
    }

    tracing::debug!(kind = %event.kind, group_id = ?event.group_id, "Webhook event accepted");
    "ok".to_string()
}
