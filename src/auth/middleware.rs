// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization middleware for Axum.
//!
//! Both layers are installed with `route_layer`, so `MatchedPath` is
//! available for the route table lookup. Order on the wire:
//!
//! ```text
//! request ─▶ authenticate ─▶ authorize ─▶ handler
//! ```
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/v1/users/me", get(users::me))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), authorize))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
//!     .with_state(state);
//! ```

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use super::payload::LAUNCH_PARAMS_HEADER;
use super::roles::{self, Denial};
use super::{AuthError, RequestIdentity, RouteAccess};
use crate::state::AppState;

fn route_access<'a>(state: &'a AppState, request: &Request) -> &'a RouteAccess {
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(MatchedPath::as_str);
    state.routes.access(request.method(), path)
}

/// Resolve the caller's identity and attach it to the request.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if route_access(&state, &request).exempt {
        return next.run(request).await;
    }

    // Non-UTF-8 header values count as absent.
    let raw = request
        .headers()
        .get(LAUNCH_PARAMS_HEADER)
        .and_then(|v| v.to_str().ok());

    let outcome = state.gate.authenticate(raw, Utc::now()).await;
    match outcome {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(
                path = %request.uri().path(),
                error_code = e.error_code(),
                "Authentication rejected"
            );
            e.into_response()
        }
    }
}

/// Apply the route's role requirement to the attached identity.
pub async fn authorize(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let access = route_access(&state, &request);
    if access.exempt {
        return next.run(request).await;
    }

    let Some(identity) = request.extensions().get::<RequestIdentity>() else {
        return AuthError::MissingCredential.into_response();
    };

    match roles::check(&identity.account, &access.required_roles) {
        Ok(()) => next.run(request).await,
        Err(denial) => {
            tracing::debug!(
                external_id = identity.external_id,
                role = %identity.account.role,
                path = %request.uri().path(),
                "Authorization denied"
            );
            match denial {
                Denial::Banned => AuthError::Banned.into_response(),
                Denial::InsufficientRole => AuthError::InsufficientRole.into_response(),
            }
        }
    }
}
