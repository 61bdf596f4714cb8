// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Declarative per-route access table.
//!
//! Routes are identified by method and axum path template (as reported by
//! `MatchedPath`). A route absent from the table requires authentication
//! and no particular role.

use std::collections::HashMap;

use axum::http::Method;

use super::Role;

/// Access requirements of a single route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteAccess {
    /// Roles admitted to the route; empty admits any non-banned account.
    pub required_roles: Vec<Role>,
    /// Skip authentication and role checks entirely.
    pub exempt: bool,
}

impl RouteAccess {
    pub fn authenticated() -> Self {
        Self::default()
    }

    pub fn roles(roles: &[Role]) -> Self {
        Self {
            required_roles: roles.to_vec(),
            exempt: false,
        }
    }

    pub fn exempt() -> Self {
        Self {
            required_roles: Vec::new(),
            exempt: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<(Method, String), RouteAccess>,
    fallback: RouteAccess,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the access rule of a route.
    pub fn route(mut self, method: Method, path: &str, access: RouteAccess) -> Self {
        self.routes.insert((method, path.to_string()), access);
        self
    }

    /// Access rule for a matched route. Unknown or unmatched routes get the
    /// fallback (authenticated, no role requirement).
    pub fn access(&self, method: &Method, path: Option<&str>) -> &RouteAccess {
        path.and_then(|p| self.routes.get(&(method.clone(), p.to_string())))
            .unwrap_or(&self.fallback)
    }
}
