// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error type.
///
/// Credential failures are final for the presented payload: the client has
/// to obtain a fresh launch payload from the platform instead of retrying.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No launch payload header present
    #[error("Access denied")]
    MissingCredential,
    /// Payload lacks a parseable identity, timestamp or signature
    #[error("Malformed launch parameters")]
    MalformedCredential,
    /// Signature does not match the payload
    #[error("Access denied")]
    InvalidSignature,
    /// Payload issued outside the replay window
    #[error("Launch parameters have expired")]
    ExpiredCredential,
    /// Account carries the banned role
    #[error("You are banned")]
    Banned,
    /// Account role not listed for this route
    #[error("Insufficient permissions for this operation")]
    InsufficientRole,
    /// The identity could not be resolved in the account store
    #[error("Account provisioning failed: {0}")]
    Provisioning(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "missing_credential",
            AuthError::MalformedCredential => "malformed_credential",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::ExpiredCredential => "expired_credential",
            AuthError::Banned => "banned",
            AuthError::InsufficientRole => "insufficient_role",
            AuthError::Provisioning(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredential
            | AuthError::MalformedCredential
            | AuthError::InvalidSignature
            | AuthError::ExpiredCredential
            | AuthError::Banned
            | AuthError::InsufficientRole => StatusCode::FORBIDDEN,
            AuthError::Provisioning(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Store details stay in the logs.
        let error = match &self {
            AuthError::Provisioning(_) => "Internal error".to_string(),
            other => other.to_string(),
        };
        let body = Json(AuthErrorBody {
            error,
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
