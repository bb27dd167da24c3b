//! Session establishment against SUSE Manager.

use crate::suma::client::SESSION_COOKIE;
use crate::suma::{MatchPolicy, SumaClient, SumaError};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// SUSE Manager sets the session cookie twice on login; only the one with this
/// max-age carries the live session.
pub const SESSION_MAX_AGE: Duration = Duration::from_secs(3600);

/// Opaque session token valid for the lifetime of one run.
#[derive(Clone, PartialEq, Eq)]
pub struct Session(String);

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Session(*******)")
    }
}

#[derive(Serialize)]
struct AuthRequest<'a> {
    login: &'a str,
    password: &'a str,
}

/// An authenticated SUSE Manager client.
pub struct SumaSession {
    pub(crate) client: SumaClient,
    pub(crate) session: Session,
    pub(crate) match_policy: MatchPolicy,
}

impl SumaSession {
    /// Wraps an existing session token, e.g. one obtained out of band.
    pub fn from_parts(client: SumaClient, session: Session) -> Self {
        Self {
            client,
            session,
            match_policy: MatchPolicy::default(),
        }
    }

    /// Selects how hostname lookups with several matches are resolved.
    pub fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.match_policy = policy;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

impl SumaClient {
    /// Logs in with `login`/`password` and returns a session-bound client.
    pub async fn login(self, login: &str, password: &str) -> Result<SumaSession, SumaError> {
        debug!("Logging into SUSE Manager at {} as {}", self.api_url(), login);
        let response = self
            .post_anonymous("auth/login", &AuthRequest { login, password })
            .await?;

        let status = response.status();
        let token = response
            .cookies()
            .inspect(|c| {
                debug!(
                    "Cookie name: {}, max-age: {:?}",
                    c.name(),
                    c.max_age().map(|d| d.as_secs())
                )
            })
            .filter(|c| c.name() == SESSION_COOKIE && c.max_age() == Some(SESSION_MAX_AGE))
            .map(|c| c.value().to_string())
            .last();

        let body = response.text().await.unwrap_or_default();
        debug!("Login response status: {}", status);

        if !status.is_success() {
            return Err(SumaError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        match token {
            Some(token) if !token.is_empty() => Ok(SumaSession::from_parts(self, Session(token))),
            _ => Err(SumaError::Login(format!(
                "no {} with max-age {}s returned",
                SESSION_COOKIE,
                SESSION_MAX_AGE.as_secs()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpOptions;
    use crate::init_logging;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn login_against(template: ResponseTemplate) -> Result<SumaSession, SumaError> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rhn/manager/api/auth/login"))
            .and(body_json(json!({"login": "admin", "password": "secret"})))
            .respond_with(template)
            .mount(&server)
            .await;

        let client = SumaClient::new(&server.uri(), &HttpOptions::default())?;
        client.login("admin", "secret").await
    }

    #[tokio::test]
    async fn test_login_picks_live_session_cookie() {
        init_logging();
        let template = ResponseTemplate::new(200)
            .append_header("Set-Cookie", "pxt-session-cookie=stale; Max-Age=0; Path=/")
            .append_header(
                "Set-Cookie",
                "pxt-session-cookie=session123; Max-Age=3600; Path=/",
            )
            .set_body_json(json!({"success": true}));

        let session = login_against(template).await.unwrap();
        assert_eq!(session.session().token(), "session123");
    }

    #[tokio::test]
    async fn test_login_without_session_cookie_fails() {
        init_logging();
        let template = ResponseTemplate::new(200)
            .append_header("Set-Cookie", "pxt-session-cookie=other; Max-Age=60")
            .set_body_json(json!({"success": false}));

        let err = login_against(template).await.err().unwrap();
        assert!(matches!(err, SumaError::Login(_)));
    }

    #[tokio::test]
    async fn test_login_rejected_with_status() {
        init_logging();
        let err = login_against(ResponseTemplate::new(401))
            .await
            .err()
            .unwrap();
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_session_debug_is_redacted() {
        let session = Session::new("very-secret");
        assert!(!format!("{:?}", session).contains("very-secret"));
    }
}
