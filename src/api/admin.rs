// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin-only API endpoints.
//!
//! Access is declared in the route table; handlers here assume the caller
//! already passed the role check.

use axum::{extract::State, Json};

use super::with_store;
use crate::{
    auth::CurrentAccount,
    error::ApiError,
    models::{AccountResponse, SetUserRoleRequest},
    state::AppState,
};

/// `POST /v1/admin/user-rights`: Change another account's role.
///
/// Takes effect on the target's next request: roles are read from the store
/// on every request and the signature cache is left alone.
pub async fn set_user_role(
    State(state): State<AppState>,
    CurrentAccount(admin): CurrentAccount,
    Json(request): Json<SetUserRoleRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    let SetUserRoleRequest { id, role } = request;

    let account = with_store(&state.accounts, move |store| store.set_role(id, role))
        .await?
        .ok_or_else(|| ApiError::not_found("Not found"))?;

    tracing::info!(
        admin_id = admin.external_id,
        target_id = id,
        role = %role,
        "Account role changed"
    );
    Ok(Json((&account).into()))
}
