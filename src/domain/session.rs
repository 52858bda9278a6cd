//! Session types: the client-held proof of authentication and the identity
//! derived from it.
//!
//! The bearer token is a three-segment JWT, but the client never holds a
//! verification key - it only reads claims (identity, expiry, display
//! fields). Signature validation is therefore disabled on decode; the server
//! remains the authority on whether a token is actually accepted. Any decode
//! failure is treated as "no valid data" and never propagates.

use jsonwebtoken::{DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

use super::foundation::{Timestamp, UserId};

/// Claims the storefront cares about, extracted from the token payload.
///
/// Backends differ on where the numeric user id lives, so all candidate
/// fields are captured and resolved in a fixed priority order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    exp: Option<f64>,
    #[serde(default, rename = "userId")]
    user_id_camel: Option<serde_json::Value>,
    #[serde(default)]
    user_id: Option<serde_json::Value>,
    #[serde(default)]
    sub: Option<serde_json::Value>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl TokenClaims {
    /// Decodes the claims from a bearer token, or `None` if the token is
    /// missing segments, carries a malformed header, or the payload is not
    /// valid base64url JSON. Padding-free base64url is accepted.
    pub fn decode(token: &str) -> Option<Self> {
        let header = jsonwebtoken::decode_header(token).ok()?;

        let mut validation = Validation::new(header.alg);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        match jsonwebtoken::decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(&[]),
            &validation,
        ) {
            Ok(data) => Some(data.claims),
            Err(err) => {
                tracing::debug!(error = %err, "failed to decode token payload");
                None
            }
        }
    }

    /// Resolves the numeric user id: `userId`, then `user_id`, then a
    /// numeric `sub`. A zero or non-numeric candidate falls through to the
    /// next field; `None` when nothing resolves.
    pub fn user_id(&self) -> Option<UserId> {
        claim_as_user_id(self.user_id_camel.as_ref())
            .or_else(|| claim_as_user_id(self.user_id.as_ref()))
            .or_else(|| claim_as_user_id(self.sub.as_ref()))
    }

    /// Expiry instant from the `exp` claim (unix seconds), if present.
    pub fn expires_at(&self) -> Option<Timestamp> {
        self.exp.map(|secs| Timestamp::from_unix_secs(secs as i64))
    }

    /// Best display name: `name`, then a string `sub`, then `email`.
    pub fn display_name(&self) -> Option<String> {
        self.name
            .clone()
            .or_else(|| match self.sub.as_ref() {
                Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
                _ => None,
            })
            .or_else(|| self.email.clone())
    }
}

fn claim_as_user_id(value: Option<&serde_json::Value>) -> Option<UserId> {
    let id = match value? {
        serde_json::Value::Number(n) => n.as_i64()?,
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    (id != 0).then(|| UserId::new(id))
}

/// A decoded, client-held session.
///
/// Exists only while the stored token is decodable; an undecodable token is
/// equivalent to no session at all.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub token_type: String,
    pub user_id: Option<UserId>,
    pub display_name: Option<String>,
    pub expires_at: Option<Timestamp>,
}

impl Session {
    /// Derives a session from a stored token, or `None` if it cannot be
    /// decoded.
    pub fn from_token(token: impl Into<String>, token_type: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let claims = TokenClaims::decode(&token)?;
        Some(Self {
            user_id: claims.user_id(),
            display_name: claims.display_name(),
            expires_at: claims.expires_at(),
            token,
            token_type: token_type.into(),
        })
    }

    /// True when the expiry claim exists and has passed. A session without
    /// an expiry claim never expires on the client.
    pub fn is_expired(&self) -> bool {
        self.expires_at.map(|at| at.is_past()).unwrap_or(false)
    }
}

/// The cart owner an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerRef {
    /// An identified account.
    User(UserId),
    /// The anonymous visitor; cart lives in the local store.
    Guest,
}

impl OwnerRef {
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            OwnerRef::User(id) => Some(*id),
            OwnerRef::Guest => None,
        }
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, OwnerRef::Guest)
    }
}

/// Resolves the effective cart owner for one operation.
///
/// An explicit id always wins over the session-derived one, which wins over
/// the guest fallback. Computed fresh on every call - never cached - so a
/// login or logout between two operations is always observed. Passing the
/// guest sentinel explicitly forces the guest cart regardless of session.
pub fn resolve_owner(explicit: Option<UserId>, session_user: Option<UserId>) -> OwnerRef {
    match explicit {
        Some(id) if id.is_guest() => OwnerRef::Guest,
        Some(id) => OwnerRef::User(id),
        None => match session_user {
            Some(id) if !id.is_guest() => OwnerRef::User(id),
            _ => OwnerRef::Guest,
        },
    }
}

/// Authentication failures surfaced to callers of login/register.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The backend rejected the credentials.
    #[error("{0}")]
    InvalidCredentials(String),

    /// Registration rejected because the address is already taken.
    #[error("{0}")]
    EmailInUse(String),

    /// Missing or malformed input, rejected before any network call.
    #[error("{0}")]
    Validation(String),

    /// Backend unreachable or returned an unexpected failure.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    fn make_token(claims: serde_json::Value) -> String {
        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap()
    }

    #[test]
    fn decode_reads_claims_without_a_key() {
        let token = make_token(json!({ "userId": 101, "exp": 2_000_000_000 }));
        let claims = TokenClaims::decode(&token).unwrap();

        assert_eq!(claims.user_id(), Some(UserId::new(101)));
        assert_eq!(
            claims.expires_at().unwrap(),
            Timestamp::from_unix_secs(2_000_000_000)
        );
    }

    #[test]
    fn decode_ignores_the_signature_segment() {
        let token = make_token(json!({ "userId": 7 }));
        let mut parts: Vec<&str> = token.split('.').collect();
        parts[2] = "definitely-not-a-signature";
        let tampered = parts.join(".");

        let claims = TokenClaims::decode(&tampered).unwrap();
        assert_eq!(claims.user_id(), Some(UserId::new(7)));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(TokenClaims::decode("").is_none());
        assert!(TokenClaims::decode("only-one-segment").is_none());
        assert!(TokenClaims::decode("a.b").is_none());
        assert!(TokenClaims::decode("!!!.###.$$$").is_none());
    }

    #[test]
    fn user_id_prefers_camel_case_claim() {
        let token = make_token(json!({ "userId": 1, "user_id": 2, "sub": 3 }));
        let claims = TokenClaims::decode(&token).unwrap();
        assert_eq!(claims.user_id(), Some(UserId::new(1)));
    }

    #[test]
    fn user_id_falls_back_to_snake_case_then_sub() {
        let snake = make_token(json!({ "user_id": 2, "sub": 3 }));
        assert_eq!(
            TokenClaims::decode(&snake).unwrap().user_id(),
            Some(UserId::new(2))
        );

        let sub_only = make_token(json!({ "sub": 3 }));
        assert_eq!(
            TokenClaims::decode(&sub_only).unwrap().user_id(),
            Some(UserId::new(3))
        );
    }

    #[test]
    fn numeric_string_claims_resolve() {
        let token = make_token(json!({ "sub": "101" }));
        assert_eq!(
            TokenClaims::decode(&token).unwrap().user_id(),
            Some(UserId::new(101))
        );
    }

    #[test]
    fn email_sub_does_not_resolve_to_an_id() {
        let token = make_token(json!({ "sub": "john@example.com" }));
        assert_eq!(TokenClaims::decode(&token).unwrap().user_id(), None);
    }

    #[test]
    fn zero_claim_falls_through_to_next_field() {
        let token = make_token(json!({ "userId": 0, "user_id": 55 }));
        assert_eq!(
            TokenClaims::decode(&token).unwrap().user_id(),
            Some(UserId::new(55))
        );
    }

    #[test]
    fn missing_exp_means_no_expiry() {
        let token = make_token(json!({ "userId": 1 }));
        let session = Session::from_token(token, "Bearer").unwrap();
        assert!(session.expires_at.is_none());
        assert!(!session.is_expired());
    }

    #[test]
    fn past_exp_marks_session_expired() {
        let past = Timestamp::now().minus_secs(3600).as_unix_secs();
        let token = make_token(json!({ "userId": 1, "exp": past }));
        let session = Session::from_token(token, "Bearer").unwrap();
        assert!(session.is_expired());
    }

    #[test]
    fn session_from_undecodable_token_is_none() {
        assert!(Session::from_token("nope", "Bearer").is_none());
    }

    #[test]
    fn display_name_priority_is_name_then_sub_then_email() {
        let token = make_token(json!({ "name": "Alice", "sub": "a@x.com", "email": "b@x.com" }));
        let claims = TokenClaims::decode(&token).unwrap();
        assert_eq!(claims.display_name().as_deref(), Some("Alice"));

        let token = make_token(json!({ "sub": "a@x.com", "email": "b@x.com" }));
        let claims = TokenClaims::decode(&token).unwrap();
        assert_eq!(claims.display_name().as_deref(), Some("a@x.com"));

        let token = make_token(json!({ "email": "b@x.com" }));
        let claims = TokenClaims::decode(&token).unwrap();
        assert_eq!(claims.display_name().as_deref(), Some("b@x.com"));
    }

    #[test]
    fn explicit_owner_wins_over_session() {
        let owner = resolve_owner(Some(UserId::new(7)), Some(UserId::new(101)));
        assert_eq!(owner, OwnerRef::User(UserId::new(7)));
    }

    #[test]
    fn session_owner_wins_over_guest() {
        let owner = resolve_owner(None, Some(UserId::new(101)));
        assert_eq!(owner, OwnerRef::User(UserId::new(101)));
    }

    #[test]
    fn no_ids_resolves_to_guest() {
        assert_eq!(resolve_owner(None, None), OwnerRef::Guest);
    }

    #[test]
    fn explicit_guest_sentinel_forces_guest_cart() {
        let owner = resolve_owner(Some(UserId::GUEST), Some(UserId::new(101)));
        assert!(owner.is_guest());
    }
}
