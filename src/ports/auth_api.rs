//! Authentication backend port.

use async_trait::async_trait;
use secrecy::SecretString;
use serde::Deserialize;

use super::ApiError;

/// Successful login payload from `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Advisory lifetime from the backend. The token's own `exp` claim is
    /// what the expiry watcher acts on.
    #[serde(default)]
    pub expires_in_ms: Option<u64>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Registration reply from `POST /api/auth/register`.
///
/// The backend is not strict about this shape: sometimes a bare string
/// ("User registered", "Email already in use"), sometimes an object with a
/// `message` or `msg` field. Both parse; `message()` flattens them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RegistrationReply {
    Text(String),
    Object {
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        msg: Option<String>,
    },
}

impl RegistrationReply {
    /// Parses a raw response body: JSON if it is JSON, otherwise the plain
    /// text itself is the message.
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str(body)
            .unwrap_or_else(|_| RegistrationReply::Text(body.trim().to_string()))
    }

    /// The human-readable message, whichever field carried it.
    pub fn message(&self) -> Option<&str> {
        match self {
            RegistrationReply::Text(s) => Some(s.as_str()),
            RegistrationReply::Object { message, msg } => {
                message.as_deref().or(msg.as_deref())
            }
        }
    }
}

/// Calls the authentication endpoints.
///
/// Implementations report transport and non-2xx outcomes as `ApiError`;
/// classifying a reply (e.g. duplicate email) is the session manager's job.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchanges credentials for a token.
    async fn login(&self, email: &str, password: &SecretString) -> Result<LoginResponse, ApiError>;

    /// Creates an account. Does not sign the user in.
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<RegistrationReply, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_defaults_token_type_to_bearer() {
        let resp: LoginResponse =
            serde_json::from_str(r#"{ "accessToken": "abc" }"#).unwrap();
        assert_eq!(resp.token_type, "Bearer");
        assert_eq!(resp.expires_in_ms, None);
    }

    #[test]
    fn login_response_reads_camel_case_fields() {
        let resp: LoginResponse = serde_json::from_str(
            r#"{ "accessToken": "abc", "tokenType": "Bearer", "expiresInMs": 3600000 }"#,
        )
        .unwrap();
        assert_eq!(resp.access_token, "abc");
        assert_eq!(resp.expires_in_ms, Some(3_600_000));
    }

    #[test]
    fn registration_reply_parses_bare_string() {
        let reply: RegistrationReply = serde_json::from_str(r#""User registered""#).unwrap();
        assert_eq!(reply.message(), Some("User registered"));
    }

    #[test]
    fn registration_reply_parses_message_object() {
        let reply: RegistrationReply =
            serde_json::from_str(r#"{ "message": "Email already in use" }"#).unwrap();
        assert_eq!(reply.message(), Some("Email already in use"));
    }

    #[test]
    fn registration_reply_falls_back_to_msg_field() {
        let reply: RegistrationReply =
            serde_json::from_str(r#"{ "msg": "Account created" }"#).unwrap();
        assert_eq!(reply.message(), Some("Account created"));
    }

    #[test]
    fn registration_reply_with_no_message_fields() {
        let reply: RegistrationReply = serde_json::from_str(r#"{ "ok": true }"#).unwrap();
        assert_eq!(reply.message(), None);
    }

    #[test]
    fn from_body_accepts_non_json_plain_text() {
        let reply = RegistrationReply::from_body("User registered\n");
        assert_eq!(reply.message(), Some("User registered"));
    }

    #[test]
    fn from_body_prefers_json_when_body_is_json() {
        let reply = RegistrationReply::from_body(r#"{ "message": "Email already in use" }"#);
        assert_eq!(reply.message(), Some("Email already in use"));
    }
}
