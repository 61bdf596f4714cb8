// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Launch parameters issued by the platform.
//!
//! The client forwards the query string it was launched with, verbatim, in
//! the `x-vk` header:
//!
//! ```text
//! vk_app_id=6736218&vk_ts=1700000000&vk_user_id=42&sign=exTIBPYTrAKDTHLLm2AwJkCcNbI...
//! ```

use super::AuthError;

/// Request header carrying the launch parameters.
pub const LAUNCH_PARAMS_HEADER: &str = "x-vk";

/// Prefix of the parameters covered by the signature.
pub const SIGNED_PREFIX: &str = "vk_";

const USER_ID_KEY: &str = "vk_user_id";
const ISSUED_AT_KEY: &str = "vk_ts";
const REFERRAL_KEY: &str = "vk_ref";
const SIGNATURE_KEY: &str = "sign";

/// Parsed launch parameters.
///
/// Holds every decoded pair in the order received, plus the fields the
/// gate needs. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPayload {
    params: Vec<(String, String)>,
    external_id: u64,
    issued_at: i64,
    signature: String,
}

impl SignedPayload {
    /// Parse a query-encoded parameter string.
    ///
    /// Duplicate keys keep their first occurrence for the named fields.
    pub fn parse(raw: &str) -> Result<Self, AuthError> {
        let params: Vec<(String, String)> = url::form_urlencoded::parse(raw.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        let external_id = first(&params, USER_ID_KEY)
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|id| *id > 0)
            .ok_or(AuthError::MalformedCredential)?;

        let issued_at = first(&params, ISSUED_AT_KEY)
            .and_then(|v| v.parse::<i64>().ok())
            .ok_or(AuthError::MalformedCredential)?;

        let signature = first(&params, SIGNATURE_KEY)
            .filter(|s| !s.is_empty())
            .ok_or(AuthError::MalformedCredential)?
            .to_string();

        Ok(Self {
            params,
            external_id,
            issued_at,
            signature,
        })
    }

    /// Platform-assigned user identity.
    pub fn external_id(&self) -> u64 {
        self.external_id
    }

    /// Issue time, Unix seconds.
    pub fn issued_at(&self) -> i64 {
        self.issued_at
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Referral tag the app was launched with, if any.
    pub fn referral(&self) -> Option<&str> {
        first(&self.params, REFERRAL_KEY)
    }

    /// All pairs in received order.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

fn first<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_required_fields() {
        let payload =
            SignedPayload::parse("vk_app_id=1&vk_user_id=42&vk_ts=1700000000&sign=abc").unwrap();
        assert_eq!(payload.external_id(), 42);
        assert_eq!(payload.issued_at(), 1_700_000_000);
        assert_eq!(payload.signature(), "abc");
        assert_eq!(payload.referral(), None);
        assert_eq!(payload.params().len(), 4);
    }

    #[test]
    fn decodes_values() {
        let payload = SignedPayload::parse(
            "vk_user_id=42&vk_ts=1&vk_ref=other%20place&vk_access_token_settings=notify%2Cfriends&sign=x",
        )
        .unwrap();
        assert_eq!(payload.referral(), Some("other place"));
        assert!(payload
            .params()
            .contains(&("vk_access_token_settings".into(), "notify,friends".into())));
    }

    #[test]
    fn rejects_missing_fields() {
        for raw in [
            "",
            "vk_ts=1&sign=abc",
            "vk_user_id=42&sign=abc",
            "vk_user_id=42&vk_ts=1",
            "vk_user_id=42&vk_ts=1&sign=",
        ] {
            assert!(
                matches!(SignedPayload::parse(raw), Err(AuthError::MalformedCredential)),
                "{raw}"
            );
        }
    }

    #[test]
    fn rejects_non_numeric_identity_and_timestamp() {
        assert!(SignedPayload::parse("vk_user_id=abc&vk_ts=1&sign=x").is_err());
        assert!(SignedPayload::parse("vk_user_id=0&vk_ts=1&sign=x").is_err());
        assert!(SignedPayload::parse("vk_user_id=-5&vk_ts=1&sign=x").is_err());
        assert!(SignedPayload::parse("vk_user_id=5&vk_ts=soon&sign=x").is_err());
    }

    #[test]
    fn first_occurrence_wins() {
        let payload = SignedPayload::parse("vk_user_id=1&vk_user_id=2&vk_ts=1&sign=x").unwrap();
        assert_eq!(payload.external_id(), 1);
    }
}
