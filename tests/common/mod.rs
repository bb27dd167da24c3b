//! Shared fixtures for the integration tests.
//!
//! Both Vault and SUSE Manager are replaced by `wiremock` servers. Each fixture
//! mounts the endpoints every run needs; tests add the mutation mocks they want
//! to assert on.

#![allow(dead_code)]

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ROLE_ID: &str = "test-role-id";
pub const SECRET_ID: &str = "test-secret-id";

/// Initialize logging for tests
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

/// Vault serving the AppRole login and the SUSE Manager credentials of `dagobah`.
/// The token must be revoked exactly once.
pub async fn vault_with_credentials() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/auth/approle/login"))
        .and(body_json(json!({"role_id": ROLE_ID, "secret_id": SECRET_ID})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "auth": {"client_token": "s.test-token"}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/kv-clab-dagobah/data/suma"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"data": {"login": "admin", "password": "admin-pw"}}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/auth/token/revoke-self"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    server
}

/// Like [`vault_with_credentials`], plus the permitted network of group `grp`.
pub async fn vault_with_network(network: &str) -> MockServer {
    let server = vault_with_credentials().await;

    Mock::given(method("GET"))
        .and(path("/v1/kv-clab-grp/data/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"data": {"network": network}}
        })))
        .mount(&server)
        .await;

    server
}

/// SUSE Manager accepting the `admin` login.
pub async fn suma_with_login() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rhn/manager/api/auth/login"))
        .and(body_json(json!({"login": "admin", "password": "admin-pw"})))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("Set-Cookie", "pxt-session-cookie=expired; Max-Age=0")
                .append_header("Set-Cookie", "pxt-session-cookie=live; Max-Age=3600")
                .set_body_json(json!({"success": true})),
        )
        .mount(&server)
        .await;

    server
}

/// Like [`suma_with_login`], plus a single known system.
pub async fn suma_with_system(hostname: &str, id: i64, ip: &str) -> MockServer {
    let server = suma_with_login().await;

    Mock::given(method("GET"))
        .and(path("/rhn/manager/api/system/getId"))
        .and(query_param("name", hostname))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": [{"id": id, "name": hostname}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rhn/manager/api/system/getNetwork"))
        .and(query_param("sid", id.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": {"ip": ip, "hostname": hostname}
        })))
        .mount(&server)
        .await;

    server
}
