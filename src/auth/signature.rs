// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Launch parameter signature verification.
//!
//! The platform signs the `vk_*` parameters:
//!
//! ```text
//! canonical = sorted vk_* pairs, percent-encoded, joined as k=v&k=v
//! sign      = base64url_nopad(HMAC-SHA256(app_secret, canonical))
//! ```
//!
//! The encoding must match the platform client byte for byte: RFC 3986
//! component escaping that leaves `!`, `'`, `(`, `)`, `*` unescaped.

use std::collections::BTreeMap;

use base64ct::{Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::payload::{SignedPayload, SIGNED_PREFIX};
use super::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// Characters escaped in keys and values of the canonical string.
const COMPONENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Checks a payload's signature.
pub trait PayloadVerifier: Send + Sync {
    fn verify(&self, payload: &SignedPayload) -> Result<(), AuthError>;
}

/// HMAC-SHA256 verifier keyed with the application secret.
#[derive(Clone)]
pub struct HmacVerifier {
    secret: String,
}

impl HmacVerifier {
    /// An empty secret is valid input; it just never matches a real signature.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Compute the expected signature for a payload.
    pub fn sign(&self, payload: &SignedPayload) -> String {
        sign_canonical(&self.secret, &canonical_string(payload))
    }
}

impl std::fmt::Debug for HmacVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacVerifier").finish_non_exhaustive()
    }
}

impl PayloadVerifier for HmacVerifier {
    fn verify(&self, payload: &SignedPayload) -> Result<(), AuthError> {
        let expected = self.sign(payload);
        if expected
            .as_bytes()
            .ct_eq(payload.signature().as_bytes())
            .into()
        {
            Ok(())
        } else {
            Err(AuthError::InvalidSignature)
        }
    }
}

/// Build the string the platform signed.
pub fn canonical_string(payload: &SignedPayload) -> String {
    let mut signed: BTreeMap<&str, &str> = BTreeMap::new();
    for (key, value) in payload.params() {
        if key.starts_with(SIGNED_PREFIX) {
            signed.entry(key.as_str()).or_insert(value.as_str());
        }
    }

    signed
        .into_iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, COMPONENT_ENCODE_SET),
                utf8_percent_encode(value, COMPONENT_ENCODE_SET)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn sign_canonical(secret: &str, canonical: &str) -> String {
    // HMAC accepts keys of any length, including empty.
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
    mac.update(canonical.as_bytes());
    Base64UrlUnpadded::encode_string(&mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine};

    const PLATFORM_SAMPLE: &str = "vk_user_id=494075&vk_app_id=6736218&vk_is_app_user=1\
        &vk_are_notifications_enabled=1&vk_language=ru&vk_access_token_settings=\
        &vk_platform=android&vk_ts=1700000000";

    fn with_sign(raw: &str, sign: &str) -> SignedPayload {
        SignedPayload::parse(&format!("{raw}&sign={sign}")).unwrap()
    }

    /// Reference encoding: standard base64, then `+`→`-`, `/`→`_`, drop one `=`.
    fn reference_sign(secret: &str, canonical: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(canonical.as_bytes());
        let b64 = STANDARD.encode(mac.finalize().into_bytes());
        let replaced = b64.replace('+', "-").replace('/', "_");
        replaced.strip_suffix('=').unwrap_or(&replaced).to_string()
    }

    #[test]
    fn canonical_string_sorts_and_filters() {
        let payload = with_sign(&format!("{PLATFORM_SAMPLE}&utm_source=feed"), "x");
        assert_eq!(
            canonical_string(&payload),
            "vk_access_token_settings=&vk_app_id=6736218&vk_are_notifications_enabled=1\
             &vk_is_app_user=1&vk_language=ru&vk_platform=android&vk_ts=1700000000\
             &vk_user_id=494075"
        );
    }

    #[test]
    fn canonical_string_uses_client_escaping() {
        let payload = with_sign(
            "vk_user_id=42&vk_ts=1700000000&vk_ref=feed%20(new)&vk_access_token_settings=notify%2Cfriends&vk_language=ru",
            "x",
        );
        assert_eq!(
            canonical_string(&payload),
            "vk_access_token_settings=notify%2Cfriends&vk_language=ru&vk_ref=feed%20(new)\
             &vk_ts=1700000000&vk_user_id=42"
        );
    }

    #[test]
    fn accepts_known_signatures() {
        let verifier = HmacVerifier::new("wvl68m4dR1UpLrVRli");
        let payload = with_sign(PLATFORM_SAMPLE, "GC5oJiHTXXoTRSq9-Dz2hvYcntxE90bfXFzuHx0PFXw");
        assert!(verifier.verify(&payload).is_ok());

        let verifier = HmacVerifier::new("secret");
        let payload = with_sign(
            "vk_user_id=42&vk_ts=1700000000&vk_ref=feed%20(new)&vk_access_token_settings=notify%2Cfriends&vk_language=ru",
            "FaHGhHusvv0gCyTux-6hD8aKQTjx_QHLtS7QTqwxQFc",
        );
        assert!(verifier.verify(&payload).is_ok());
    }

    #[test]
    fn empty_secret_still_verifies() {
        let verifier = HmacVerifier::new("");
        let payload = with_sign(
            "vk_user_id=42&vk_ts=1700000000",
            "x2z8I753L-bj7VYVAl84fQBgg63pQ4a7g5_yU9I2Rao",
        );
        assert!(verifier.verify(&payload).is_ok());

        let other = HmacVerifier::new("real-secret");
        assert!(matches!(other.verify(&payload), Err(AuthError::InvalidSignature)));
    }

    #[test]
    fn matches_reference_encoding() {
        let verifier = HmacVerifier::new("s3cret");
        for ts in 1_700_000_000..1_700_000_040 {
            let payload = with_sign(&format!("vk_user_id=7&vk_ts={ts}&vk_platform=web"), "x");
            assert_eq!(
                verifier.sign(&payload),
                reference_sign("s3cret", &canonical_string(&payload))
            );
        }
    }

    #[test]
    fn any_altered_character_is_rejected() {
        let verifier = HmacVerifier::new("wvl68m4dR1UpLrVRli");
        let good = "GC5oJiHTXXoTRSq9-Dz2hvYcntxE90bfXFzuHx0PFXw";

        for i in 0..good.len() {
            let mut altered: Vec<u8> = good.as_bytes().to_vec();
            altered[i] = if altered[i] == b'A' { b'B' } else { b'A' };
            let altered = String::from_utf8(altered).unwrap();

            let payload = with_sign(PLATFORM_SAMPLE, &altered);
            assert!(
                matches!(verifier.verify(&payload), Err(AuthError::InvalidSignature)),
                "position {i}"
            );
        }
    }

    #[test]
    fn padded_or_truncated_signatures_are_rejected() {
        let verifier = HmacVerifier::new("wvl68m4dR1UpLrVRli");
        for sign in [
            "GC5oJiHTXXoTRSq9-Dz2hvYcntxE90bfXFzuHx0PFXw%3D",
            "GC5oJiHTXXoTRSq9-Dz2hvYcntxE90bfXFzuHx0PFX",
        ] {
            let payload = with_sign(PLATFORM_SAMPLE, sign);
            assert!(verifier.verify(&payload).is_err(), "{sign}");
        }
    }

    #[test]
    fn unsigned_parameters_do_not_affect_signature() {
        let verifier = HmacVerifier::new("wvl68m4dR1UpLrVRli");
        let payload = with_sign(
            &format!("{PLATFORM_SAMPLE}&utm_campaign=spring"),
            "GC5oJiHTXXoTRSq9-Dz2hvYcntxE90bfXFzuHx0PFXw",
        );
        assert!(verifier.verify(&payload).is_ok());
    }

    #[test]
    fn signed_parameter_tampering_is_rejected() {
        let verifier = HmacVerifier::new("wvl68m4dR1UpLrVRli");
        let tampered = PLATFORM_SAMPLE.replace("vk_user_id=494075", "vk_user_id=1");
        let payload = with_sign(&tampered, "GC5oJiHTXXoTRSq9-Dz2hvYcntxE90bfXFzuHx0PFXw");
        assert!(verifier.verify(&payload).is_err());
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let verifier = HmacVerifier::new("hunter2");
        assert!(!format!("{verifier:?}").contains("hunter2"));
    }
}
