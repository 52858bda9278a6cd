//! Shared HTTP client for the storefront backend.
//!
//! Owns the base URL, the request timeout, and the one cross-cutting rule of
//! the API surface: a stored bearer token is attached to requests going to
//! the configured backend origin, and never to any other origin.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ApiConfig;
use crate::ports::{store_keys, ApiError, LocalStore};

/// HTTP client wrapper all REST adapters share.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn LocalStore>,
}

impl ApiClient {
    /// Creates a client for the configured backend.
    pub fn new(config: &ApiConfig, store: Arc<dyn LocalStore>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: config.trimmed_base_url().to_string(),
            store,
        }
    }

    /// The backend origin this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a JSON resource.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let builder = self.prepare(Method::GET, path).await;
        Self::decode_json(Self::send(builder).await?).await
    }

    /// GET a JSON resource with query parameters.
    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let builder = self.prepare(Method::GET, path).await.query(query);
        Self::decode_json(Self::send(builder).await?).await
    }

    /// POST a JSON body, decode a JSON reply.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let builder = self.prepare(Method::POST, path).await.json(body);
        Self::decode_json(Self::send(builder).await?).await
    }

    /// POST a JSON body, return the raw success body.
    ///
    /// For endpoints that reply with plain text as often as with JSON.
    pub async fn post_for_body<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<String, ApiError> {
        let builder = self.prepare(Method::POST, path).await.json(body);
        let response = Self::send(builder).await?;
        response
            .text()
            .await
            .map_err(|e| ApiError::network(e.to_string()))
    }

    /// PUT a JSON body, decode a JSON reply.
    pub async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let builder = self.prepare(Method::PUT, path).await.json(body);
        Self::decode_json(Self::send(builder).await?).await
    }

    /// DELETE with query parameters, decode a JSON reply.
    pub async fn delete_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let builder = self.prepare(Method::DELETE, path).await.query(query);
        Self::decode_json(Self::send(builder).await?).await
    }

    /// DELETE where only the status matters.
    pub async fn delete_no_content(&self, path: &str) -> Result<(), ApiError> {
        let builder = self.prepare(Method::DELETE, path).await;
        Self::send(builder).await?;
        Ok(())
    }

    async fn prepare(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        // Paths are backend-relative; an absolute URL passes through as-is
        // and only gets the bearer header if it targets our origin.
        let url = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        };

        let mut builder = self.http.request(method, &url);
        if is_same_origin(&url, &self.base_url) {
            if let Some(token) = self.bearer_token().await {
                builder = builder.bearer_auth(token);
            }
        }
        builder
    }

    async fn bearer_token(&self) -> Option<String> {
        match self.store.get(store_keys::AUTH_TOKEN).await {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(error = %err, "could not read stored token; sending unauthenticated");
                None
            }
        }
    }

    async fn send(builder: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(status.as_u16(), &body);
        tracing::warn!(status = status.as_u16(), message = %message, "backend request failed");
        Err(ApiError::status(status.as_u16(), message))
    }

    async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ApiError::decode(e.to_string()))
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// True when `url` is under the configured backend origin.
fn is_same_origin(url: &str, base_url: &str) -> bool {
    url.strip_prefix(base_url)
        .map(|rest| rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'))
        .unwrap_or(false)
}

/// Pulls a human-readable message out of an error response.
///
/// Tries, in order: a structured `message`/`msg`/`error` field, a JSON
/// string body, the raw body text, then a generic status line. The backend
/// is not consistent about which of these it sends.
fn extract_error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        match value {
            serde_json::Value::Object(map) => {
                for field in ["message", "msg", "error"] {
                    if let Some(serde_json::Value::String(s)) = map.get(field) {
                        if !s.trim().is_empty() {
                            return s.clone();
                        }
                    }
                }
            }
            serde_json::Value::String(s) if !s.trim().is_empty() => return s,
            _ => {}
        }
    }

    let raw = body.trim();
    if !raw.is_empty() {
        return raw.to_string();
    }

    format!("Request failed with status {}", status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_field_takes_priority() {
        let body = r#"{ "message": "Invalid credentials", "error": "Unauthorized" }"#;
        assert_eq!(extract_error_message(401, body), "Invalid credentials");
    }

    #[test]
    fn msg_and_error_fields_are_fallbacks() {
        assert_eq!(
            extract_error_message(400, r#"{ "msg": "Bad request body" }"#),
            "Bad request body"
        );
        assert_eq!(
            extract_error_message(500, r#"{ "error": "boom" }"#),
            "boom"
        );
    }

    #[test]
    fn json_string_body_is_unquoted() {
        assert_eq!(
            extract_error_message(409, r#""Email already in use""#),
            "Email already in use"
        );
    }

    #[test]
    fn raw_text_body_is_used_verbatim() {
        assert_eq!(
            extract_error_message(409, "Email already in use"),
            "Email already in use"
        );
    }

    #[test]
    fn empty_body_falls_back_to_status_line() {
        assert_eq!(
            extract_error_message(503, "   "),
            "Request failed with status 503"
        );
    }

    #[test]
    fn object_without_known_fields_falls_back_to_raw_body() {
        let body = r#"{ "code": 17 }"#;
        assert_eq!(extract_error_message(500, body), body);
    }

    #[test]
    fn same_origin_requires_a_path_boundary() {
        let base = "https://shop.example.com";
        assert!(is_same_origin("https://shop.example.com/api/cart/1", base));
        assert!(is_same_origin("https://shop.example.com", base));
        assert!(!is_same_origin("https://shop.example.com.evil.io/x", base));
        assert!(!is_same_origin("https://cdn.example.com/img.jpg", base));
    }
}
