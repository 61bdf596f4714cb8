// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use axum::{
    http::Method,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    auth::{
        middleware::{authenticate, authorize},
        Role, RouteAccess, RouteTable,
    },
    error::ApiError,
    state::AppState,
    storage::{AccountStore, StoreResult},
};

pub mod admin;
pub mod callback;
pub mod health;
pub mod users;

/// Access rules for every route served by [`router`].
pub fn route_table() -> RouteTable {
    RouteTable::new()
        .route(Method::GET, "/health", RouteAccess::exempt())
        .route(Method::POST, "/v1/utils/callback", RouteAccess::exempt())
        .route(Method::GET, "/v1/users/me", RouteAccess::authenticated())
        .route(Method::GET, "/v1/users/{id}", RouteAccess::authenticated())
        .route(
            Method::POST,
            "/v1/users/settings",
            RouteAccess::authenticated(),
        )
        .route(
            Method::POST,
            "/v1/admin/user-rights",
            RouteAccess::roles(&[Role::Admin]),
        )
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::liveness))
        .route("/v1/users/me", get(users::me))
        .route("/v1/users/{id}", get(users::get_by_id))
        .route("/v1/users/settings", post(users::set_settings))
        .route("/v1/admin/user-rights", post(admin::set_user_role))
        .route("/v1/utils/callback", post(callback::callback))
        .route_layer(middleware::from_fn_with_state(state.clone(), authorize))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate,
        ))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Run a blocking account store call off the async runtime.
pub(crate) async fn with_store<T, F>(store: &Arc<dyn AccountStore>, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&dyn AccountStore) -> StoreResult<T> + Send + 'static,
{
    let store = Arc::clone(store);
    let result = tokio::task::spawn_blocking(move || f(store.as_ref()))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Account store task failed");
            ApiError::internal("Internal error")
        })?;
    Ok(result?)
}
