// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Replay window for launch parameters.

use std::time::Duration;

use chrono::{DateTime, Utc};

use super::AuthError;

/// Maximum accepted age of a launch payload.
pub const REPLAY_WINDOW: Duration = Duration::from_secs(12 * 60 * 60);

/// Reject payloads issued more than [`REPLAY_WINDOW`] before `now`.
///
/// Timestamps in the future are accepted as-is.
pub fn check_replay_window(issued_at: i64, now: DateTime<Utc>) -> Result<(), AuthError> {
    let age_secs = now.timestamp().saturating_sub(issued_at);
    if age_secs > REPLAY_WINDOW.as_secs() as i64 {
        Err(AuthError::ExpiredCredential)
    } else {
        Ok(())
    }
}
