//! Session manager - owns the credential, derives identity, detects expiry,
//! and notifies observers of every transition.
//!
//! The token lives in the durable store so a session survives restarts.
//! Reads never trust it blindly: `is_logged_in` removes an expired or
//! unreadable token on sight, and a deferred removal is scheduled against
//! the `exp` claim whenever a token is set, so at most one expiry callback
//! is ever pending.

use std::sync::{Arc, Mutex};

use secrecy::{ExposeSecret, SecretString};
use tokio::task::JoinHandle;

use crate::domain::foundation::UserId;
use crate::domain::session::{AuthError, Session, TokenClaims};
use crate::ports::{
    store_keys, ApiError, AuthApi, LocalStore, SessionChanged, SessionEventBus,
};

/// Owns the authentication state of the client.
pub struct SessionManager {
    auth_api: Arc<dyn AuthApi>,
    store: Arc<dyn LocalStore>,
    events: Arc<dyn SessionEventBus>,
    expiry_timer: Mutex<Option<JoinHandle<()>>>,
}

impl SessionManager {
    pub fn new(
        auth_api: Arc<dyn AuthApi>,
        store: Arc<dyn LocalStore>,
        events: Arc<dyn SessionEventBus>,
    ) -> Self {
        Self {
            auth_api,
            store,
            events,
            expiry_timer: Mutex::new(None),
        }
    }

    /// Exchanges credentials for a session.
    ///
    /// On success the token is persisted, the expiry watch starts, and a
    /// session-changed notification goes out. On failure nothing changes.
    pub async fn login(&self, email: &str, password: SecretString) -> Result<Session, AuthError> {
        let email = email.trim();
        if email.is_empty() || password.expose_secret().is_empty() {
            return Err(AuthError::validation("Email and password required"));
        }

        let response = self
            .auth_api
            .login(email, &password)
            .await
            .map_err(|err| match err {
                ApiError::Status { message, .. } => AuthError::InvalidCredentials(message),
                other => AuthError::service_unavailable(other.message().to_string()),
            })?;

        self.set_token(&response.access_token, &response.token_type)
            .await?;

        match Session::from_token(&response.access_token, &response.token_type) {
            Some(session) => Ok(session),
            None => {
                // A token we cannot read is a session we cannot keep.
                self.remove_token().await;
                Err(AuthError::service_unavailable(
                    "Login returned an unreadable token",
                ))
            }
        }
    }

    /// Creates an account; does not sign the user in.
    ///
    /// The backend reports duplicate emails in whatever shape and status it
    /// pleases, so the reply message is classified here: anything matching
    /// "email already" (case-insensitive) is a failure even on a 2xx.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: SecretString,
    ) -> Result<String, AuthError> {
        if name.trim().is_empty() || email.trim().is_empty() || password.expose_secret().is_empty()
        {
            return Err(AuthError::validation("All fields required"));
        }

        let message = match self
            .auth_api
            .register(name.trim(), email.trim(), &password)
            .await
        {
            Ok(reply) => reply
                .message()
                .unwrap_or("Account created. Please login.")
                .to_string(),
            Err(ApiError::Status { message, .. }) => {
                if is_email_in_use(&message) {
                    return Err(AuthError::EmailInUse(message));
                }
                return Err(AuthError::service_unavailable(message));
            }
            Err(other) => {
                return Err(AuthError::service_unavailable(other.message().to_string()))
            }
        };

        if is_email_in_use(&message) {
            return Err(AuthError::EmailInUse(message));
        }
        Ok(message)
    }

    /// The stored credential, valid or not.
    pub async fn token(&self) -> Option<String> {
        match self.store.get(store_keys::AUTH_TOKEN).await {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(error = %err, "could not read stored token");
                None
            }
        }
    }

    /// The stored token type, defaulting to Bearer.
    pub async fn token_type(&self) -> String {
        match self.store.get(store_keys::AUTH_TOKEN_TYPE).await {
            Ok(Some(token_type)) => token_type,
            Ok(None) => "Bearer".to_string(),
            Err(err) => {
                tracing::warn!(error = %err, "could not read stored token type");
                "Bearer".to_string()
            }
        }
    }

    /// The current session, if the stored token decodes.
    pub async fn session(&self) -> Option<Session> {
        let token = self.token().await?;
        let token_type = self.token_type().await;
        Session::from_token(token, token_type)
    }

    /// Identity from the token claims; `None` when absent or unreadable.
    /// A read with no side effects.
    pub async fn user_id(&self) -> Option<UserId> {
        let token = self.token().await?;
        TokenClaims::decode(&token)?.user_id()
    }

    /// Whether a usable session exists.
    ///
    /// Self-healing: an expired or unreadable token is removed on the spot
    /// and `false` is returned, so later reads see a clean slate. A token
    /// without an expiry claim never expires on the client.
    pub async fn is_logged_in(&self) -> bool {
        let Some(token) = self.token().await else {
            return false;
        };

        match TokenClaims::decode(&token) {
            None => {
                tracing::debug!("stored token is unreadable; clearing it");
                self.remove_token().await;
                false
            }
            Some(claims) => match claims.expires_at() {
                Some(at) if at.is_past() => {
                    tracing::debug!("stored token has expired; clearing it");
                    self.remove_token().await;
                    false
                }
                _ => true,
            },
        }
    }

    /// Stores a credential, broadcasts the change, and (re)arms the expiry
    /// watch from the token's `exp` claim.
    pub async fn set_token(&self, token: &str, token_type: &str) -> Result<(), AuthError> {
        self.store
            .put(store_keys::AUTH_TOKEN, token)
            .await
            .map_err(|e| AuthError::service_unavailable(e.to_string()))?;
        self.store
            .put(store_keys::AUTH_TOKEN_TYPE, token_type)
            .await
            .map_err(|e| AuthError::service_unavailable(e.to_string()))?;

        self.events.publish(SessionChanged::signed_in(token));
        self.schedule_expiry(token).await;
        Ok(())
    }

    /// Clears the credential and any pending expiry timer, then broadcasts
    /// a signed-out notification.
    pub async fn remove_token(&self) {
        self.cancel_expiry_timer();
        purge_session(&self.store, &self.events).await;
    }

    async fn schedule_expiry(&self, token: &str) {
        self.cancel_expiry_timer();

        let Some(expires_at) = TokenClaims::decode(token).and_then(|c| c.expires_at()) else {
            // No expiry claim: the token never expires on the client.
            return;
        };

        match expires_at.duration_until() {
            None => {
                tracing::debug!("token arrived already expired; removing now");
                purge_session(&self.store, &self.events).await;
            }
            Some(remaining) => {
                tracing::debug!(remaining_secs = remaining.as_secs(), "expiry watch armed");
                let store = Arc::clone(&self.store);
                let events = Arc::clone(&self.events);
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(remaining).await;
                    tracing::debug!("session token reached its expiry; removing");
                    purge_session(&store, &events).await;
                });
                *self
                    .expiry_timer
                    .lock()
                    .expect("SessionManager: timer lock poisoned") = Some(handle);
            }
        }
    }

    fn cancel_expiry_timer(&self) {
        if let Some(handle) = self
            .expiry_timer
            .lock()
            .expect("SessionManager: timer lock poisoned")
            .take()
        {
            handle.abort();
        }
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.cancel_expiry_timer();
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager").finish_non_exhaustive()
    }
}

async fn purge_session(store: &Arc<dyn LocalStore>, events: &Arc<dyn SessionEventBus>) {
    if let Err(err) = store.remove(store_keys::AUTH_TOKEN).await {
        tracing::warn!(error = %err, "could not remove stored token");
    }
    if let Err(err) = store.remove(store_keys::AUTH_TOKEN_TYPE).await {
        tracing::warn!(error = %err, "could not remove stored token type");
    }
    events.publish(SessionChanged::signed_out());
}

fn is_email_in_use(message: &str) -> bool {
    message.to_lowercase().contains("email already")
}
