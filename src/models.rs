// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::Role;
use crate::storage::{Account, Profile};

/// Public view of an account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountResponse {
    pub id: u64,
    pub points: u64,
    pub role: Role,
    pub referral: String,
    pub registered_at: DateTime<Utc>,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.external_id,
            points: account.points,
            role: account.role,
            referral: account.referral.clone(),
            registered_at: account.registered_at,
        }
    }
}

/// The caller's own account, including private fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentAccountResponse {
    #[serde(flatten)]
    pub account: AccountResponse,
    pub daily_submissions: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_submissions_reset: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Profile>,
}

impl CurrentAccountResponse {
    pub fn new(account: &Account, settings: Option<Profile>) -> Self {
        Self {
            account: account.into(),
            daily_submissions: account.daily_submissions,
            daily_submissions_reset: account.daily_submissions_reset,
            settings,
        }
    }
}

/// Body of `POST /v1/users/settings`.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct SetSettingsRequest {
    pub push: bool,
    pub im: bool,
}

impl From<SetSettingsRequest> for Profile {
    fn from(request: SetSettingsRequest) -> Self {
        Profile {
            push: request.push,
            im: request.im,
        }
    }
}

/// Body of `POST /v1/admin/user-rights`.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct SetUserRoleRequest {
    pub id: u64,
    pub role: Role,
}

/// Event delivered by the platform webhook.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CallbackEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default)]
    pub group_id: Option<u64>,
}
