//! Authentication endpoints over the shared API client.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::ports::{ApiError, AuthApi, LoginResponse, RegistrationReply};

use super::ApiClient;

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

/// `AuthApi` against the real backend.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: ApiClient,
}

impl HttpAuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, email: &str, password: &SecretString) -> Result<LoginResponse, ApiError> {
        tracing::debug!(email, "logging in");
        self.client
            .post_json(
                "/api/auth/login",
                &LoginRequest {
                    email,
                    password: password.expose_secret(),
                },
            )
            .await
    }

    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<RegistrationReply, ApiError> {
        tracing::debug!(email, "registering account");
        // The reply may be plain text rather than JSON; take the raw body.
        let body = self
            .client
            .post_for_body(
                "/api/auth/register",
                &RegisterRequest {
                    name,
                    email,
                    password: password.expose_secret(),
                },
            )
            .await?;
        Ok(RegistrationReply::from_body(&body))
    }
}
