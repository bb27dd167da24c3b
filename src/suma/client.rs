//! HTTP client for the SUSE Manager JSON-over-HTTP API.
//!
//! All methods live below `{manager_url}/rhn/manager/api`. Authenticated calls
//! carry the session as the `pxt-session-cookie` cookie.

use crate::http::HttpOptions;
use crate::suma::{Session, SumaError};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

pub const API_PATH: &str = "/rhn/manager/api";
pub const SESSION_COOKIE: &str = "pxt-session-cookie";

/// Unauthenticated SUSE Manager client. Use [`SumaClient::login`] to obtain a session.
pub struct SumaClient {
    api_url: String,
    client: Client,
}

impl SumaClient {
    pub fn new(manager_url: &str, options: &HttpOptions) -> Result<Self, SumaError> {
        let client = options
            .client_builder()
            .build()
            .map_err(|e| SumaError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_url: format!("{}{}", manager_url.trim_end_matches('/'), API_PATH),
            client,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}", self.api_url, method)
    }

    fn with_session(builder: RequestBuilder, session: &Session) -> RequestBuilder {
        builder.header(
            reqwest::header::COOKIE,
            format!("{}={}", SESSION_COOKIE, session.token()),
        )
    }

    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<Response, SumaError> {
        builder
            .send()
            .await
            .map_err(|e| SumaError::Transport(format!("Request failed: {}", e)))
    }

    /// Unauthenticated JSON POST, used for login.
    pub(crate) async fn post_anonymous<B: Serialize + ?Sized>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<Response, SumaError> {
        let url = self.url(method);
        debug!("SUSE Manager request: POST {}", url);
        self.send(self.client.post(&url).json(body)).await
    }

    /// Authenticated read-only GET. Any non-2xx status is a transport failure.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        session: &Session,
        method: &str,
        query: &[(&str, String)],
    ) -> Result<T, SumaError> {
        let url = self.url(method);
        debug!("SUSE Manager request: GET {} {:?}", url, query);
        let builder = Self::with_session(self.client.get(&url).query(query), session);
        let response = self.send(builder).await?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SumaError::Transport(format!("Error reading http response: {}", e)))?;
        if !status.is_success() {
            return Err(SumaError::Transport(format!(
                "HTTP request {} failed: HTTP {}",
                method,
                status.as_u16()
            )));
        }
        debug!("Got response body: {}", body);

        serde_json::from_str(&body)
            .map_err(|e| SumaError::Protocol(format!("Unexpected response from {}: {}", method, e)))
    }

    /// Authenticated mutating POST. Returns the status on 2xx, `HttpStatus` otherwise.
    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        session: &Session,
        method: &str,
        body: &B,
    ) -> Result<u16, SumaError> {
        let url = self.url(method);
        debug!("SUSE Manager request: POST {}", url);
        let builder = Self::with_session(self.client.post(&url).json(body), session);
        let response = self.send(builder).await?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(SumaError::HttpStatus {
                status: status.as_u16(),
                body: text,
            });
        }
        debug!("{} returned HTTP {}: {}", method, status.as_u16(), text);
        Ok(status.as_u16())
    }
}
