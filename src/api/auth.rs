// src/api/auth.rs — Webhook subscription handshake

use crate::api::types::VerifyQuery;

/// The only `hub.mode` the platform uses for subscription checks.
pub const SUBSCRIBE_MODE: &str = "subscribe";

/// Returns the challenge to echo back if the handshake is valid.
pub fn verify_subscription<'q>(query: &'q VerifyQuery, expected_token: &str) -> Option<&'q str> {
    if query.mode.as_deref() != Some(SUBSCRIBE_MODE) {
        return None;
    }
    let token = query.verify_token.as_deref()?;
    if !constant_time_eq(token.as_bytes(), expected_token.as_bytes()) {
        return None;
    }
    Some(query.challenge.as_deref().unwrap_or_default())
}

/// Constant-time byte comparison to prevent timing attacks on token checks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(mode: &str, token: &str, challenge: &str) -> VerifyQuery {
        VerifyQuery {
            mode: Some(mode.into()),
            verify_token: Some(token.into()),
            challenge: Some(challenge.into()),
        }
    }

    #[test]
    fn test_valid_handshake_returns_challenge() {
        let q = query("subscribe", "tok", "abc");
        assert_eq!(verify_subscription(&q, "tok"), Some("abc"));
    }

    #[test]
    fn test_wrong_token_rejected() {
        let q = query("subscribe", "nope", "abc");
        assert_eq!(verify_subscription(&q, "tok"), None);
    }

    #[test]
    fn test_wrong_mode_rejected() {
        let q = query("unsubscribe", "tok", "abc");
        assert_eq!(verify_subscription(&q, "tok"), None);
    }

    #[test]
    fn test_missing_params_rejected() {
        assert_eq!(verify_subscription(&VerifyQuery::default(), "tok"), None);
    }

    #[test]
    fn test_missing_challenge_is_empty() {
        let q = VerifyQuery {
            challenge: None,
            ..query("subscribe", "tok", "")
        };
        assert_eq!(verify_subscription(&q, "tok"), Some(""));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"secret", b"secret"));
        assert!(!constant_time_eq(b"secret", b"secreT"));
        assert!(!constant_time_eq(b"secret", b"secret1"));
    }
}
