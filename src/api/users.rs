// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::with_store;
use crate::{
    auth::CurrentAccount,
    error::ApiError,
    models::{AccountResponse, CurrentAccountResponse, SetSettingsRequest},
    state::AppState,
    storage::Profile,
};

/// `GET /v1/users/me`: The caller's account with private fields.
pub async fn me(
    State(state): State<AppState>,
    CurrentAccount(identity): CurrentAccount,
) -> Result<Json<CurrentAccountResponse>, ApiError> {
    let id = identity.external_id;
    let settings = with_store(&state.accounts, move |store| store.profile(id)).await?;
    Ok(Json(CurrentAccountResponse::new(&identity.account, settings)))
}

/// `GET /v1/users/{id}`: Public view of any account.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = with_store(&state.accounts, move |store| store.find(id))
        .await?
        .ok_or_else(|| ApiError::not_found("Not found"))?;
    Ok(Json((&account).into()))
}

/// `POST /v1/users/settings`: Replace the caller's notification settings.
pub async fn set_settings(
    State(state): State<AppState>,
    CurrentAccount(identity): CurrentAccount,
    Json(request): Json<SetSettingsRequest>,
) -> Result<Json<CurrentAccountResponse>, ApiError> {
    let id = identity.external_id;
    let settings: Profile = request.into();

    let updated = with_store(&state.accounts, move |store| {
        store.update_profile(id, &settings)
    })
    .await?;
    if !updated {
        return Err(ApiError::not_found("Not found"));
    }

    tracing::info!(external_id = id, push = settings.push, im = settings.im, "Settings updated");
    Ok(Json(CurrentAccountResponse::new(
        &identity.account,
        Some(settings),
    )))
}
