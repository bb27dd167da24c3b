//! Client implementation for Vault API interactions.
//!
//! Wraps a `reqwest::Client` and attaches the `X-Vault-Token` header once a
//! token has been obtained via AppRole login.

use crate::http::HttpOptions;
use crate::vault::VaultError;
use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};
use tracing::debug;

/// Client for interacting with the Vault HTTP API.
pub struct VaultClient {
    /// Base URL of the Vault server
    pub addr: String,
    /// Auth token for Vault API requests; `None` before login.
    token: Option<String>,
    client: Client,
}

impl VaultClient {
    /// Creates an unauthenticated client for the specified address.
    pub fn new(addr: &str, options: &HttpOptions) -> Result<Self, VaultError> {
        let client = options
            .client_builder()
            .build()
            .map_err(|e| VaultError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            addr: addr.trim_end_matches('/').to_string(),
            token: None,
            client,
        })
    }

    /// Sets the token sent with every subsequent request.
    pub fn set_token(&mut self, token: &str) {
        self.token = Some(token.to_string());
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Makes a GET request to the Vault API.
    pub async fn get(&self, path: &str) -> Result<Value, VaultError> {
        self.request(Method::GET, path, None).await
    }

    /// Makes a POST request to the Vault API with a JSON body.
    pub async fn post_with_body(&self, path: &str, body: Value) -> Result<Value, VaultError> {
        self.request(Method::POST, path, Some(body)).await
    }

    /// Makes a POST request to the Vault API without a body.
    pub async fn post(&self, path: &str) -> Result<Value, VaultError> {
        self.request(Method::POST, path, None).await
    }

    /// Makes a PUT request to the Vault API with a JSON body.
    pub async fn put_with_body(&self, path: &str, body: Value) -> Result<Value, VaultError> {
        self.request(Method::PUT, path, Some(body)).await
    }

    /// Makes a DELETE request to the Vault API.
    pub async fn delete(&self, path: &str) -> Result<Value, VaultError> {
        self.request(Method::DELETE, path, None).await
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, VaultError> {
        let url = format!("{}{}", self.addr, path);
        debug!("Vault request: {} {}", method, url);
        let mut request = self.client.request(method, &url);

        if let Some(token) = &self.token {
            request = request.header("X-Vault-Token", token);
        }

        if let Some(json_body) = body {
            request = request.json(&json_body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| VaultError::Network(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(VaultError::HttpStatus(status.as_u16(), error_text));
        }

        // Return an empty JSON object for 204 No Content responses
        if status == StatusCode::NO_CONTENT {
            return Ok(json!({}));
        }

        let text = response
            .text()
            .await
            .map_err(|e| VaultError::ParseError(format!("Failed to read response: {}", e)))?;
        if text.trim().is_empty() {
            return Ok(json!({}));
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn sends_token_header_after_login() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/sys/mounts"))
            .and(header("X-Vault-Token", "s.token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let mut client = VaultClient::new(&server.uri(), &HttpOptions::default()).unwrap();
        client.set_token("s.token");
        let value = client.get("/v1/sys/mounts").await.unwrap();
        assert!(value.get("data").is_some());
    }

    #[tokio::test]
    async fn non_success_status_is_reported_with_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/v1/sys/mounts/kv-clab-grp"))
            .respond_with(ResponseTemplate::new(403).set_body_string("permission denied"))
            .mount(&server)
            .await;

        let client = VaultClient::new(&server.uri(), &HttpOptions::default()).unwrap();
        let err = client.delete("/v1/sys/mounts/kv-clab-grp").await.unwrap_err();
        match err {
            VaultError::HttpStatus(status, body) => {
                assert_eq!(status, 403);
                assert!(body.contains("permission denied"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_json_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/kv-clab-grp/data/config"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
            .mount(&server)
            .await;

        let client = VaultClient::new(&server.uri(), &HttpOptions::default()).unwrap();
        let err = client.get("/v1/kv-clab-grp/data/config").await.unwrap_err();
        assert!(matches!(err, VaultError::Json(_)));
    }

    #[tokio::test]
    async fn no_content_yields_empty_object() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v1/sys/policies/acl/grp-policy"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = VaultClient::new(&server.uri(), &HttpOptions::default()).unwrap();
        let value = client
            .put_with_body("/v1/sys/policies/acl/grp-policy", json!({"policy": ""}))
            .await
            .unwrap();
        assert_eq!(value, json!({}));
    }
}
