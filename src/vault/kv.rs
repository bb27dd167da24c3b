//! KV version 2 secrets engine operations.
//!
//! Secret paths are passed in their full API form, including the `data/`
//! segment, e.g. `kv-clab-grp/data/config`.

use crate::vault::{VaultClient, VaultError};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Enables a KV v2 engine at `mount`. An existing mount at the same path is accepted.
pub async fn enable_kv2(client: &VaultClient, mount: &str) -> Result<(), VaultError> {
    let response = client
        .post_with_body(
            &format!("/v1/sys/mounts/{}", mount),
            json!({
                "type": "kv",
                "options": { "version": "2" }
            }),
        )
        .await;

    match response {
        Ok(_) => {
            info!("Enabled KV v2 engine at {}", mount);
            Ok(())
        }
        Err(VaultError::HttpStatus(_status, error_text))
            if error_text.contains("path is already in use") =>
        {
            info!("KV engine at {} already enabled, continuing", mount);
            Ok(())
        }
        Err(e) => {
            warn!("Failed to enable KV engine at {}: {}", mount, e);
            Err(e)
        }
    }
}

pub async fn disable_kv(client: &VaultClient, mount: &str) -> Result<(), VaultError> {
    client.delete(&format!("/v1/sys/mounts/{}", mount)).await?;
    info!("Disabled KV engine at {}", mount);
    Ok(())
}

fn flatten(data: &Map<String, Value>) -> HashMap<String, String> {
    data.iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), text)
        })
        .collect()
}

/// Reads the key-value pairs stored at `path`.
pub async fn read_secret(
    client: &VaultClient,
    path: &str,
) -> Result<HashMap<String, String>, VaultError> {
    let resp = match client.get(&format!("/v1/{}", path)).await {
        Ok(resp) => resp,
        Err(VaultError::HttpStatus(404, _)) => {
            return Err(VaultError::SecretNotFound(path.to_string()))
        }
        Err(e) => return Err(e),
    };

    let data = resp
        .get("data")
        .and_then(|d| d.get("data"))
        .and_then(|d| d.as_object())
        .ok_or_else(|| VaultError::SecretNotFound(path.to_string()))?;

    let secret = flatten(data);
    for key in secret.keys() {
        debug!("Retrieved secret key {}: *******", key);
    }
    Ok(secret)
}

/// Sets `key` to `value` at `path`, keeping any other keys already stored there.
pub async fn update_secret(
    client: &VaultClient,
    path: &str,
    key: &str,
    value: &str,
) -> Result<(), VaultError> {
    let mut current = match read_secret(client, path).await {
        Ok(existing) => existing,
        Err(VaultError::SecretNotFound(_)) => HashMap::new(),
        Err(e) => return Err(e),
    };
    current.insert(key.to_string(), value.to_string());

    client
        .post_with_body(&format!("/v1/{}", path), json!({ "data": current }))
        .await?;
    debug!("Updated key '{}' at {}", key, path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpOptions;
    use crate::init_logging;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> VaultClient {
        let mut client = VaultClient::new(&server.uri(), &HttpOptions::default()).unwrap();
        client.set_token("s.test");
        client
    }

    #[tokio::test]
    async fn test_read_secret_flattens_values() {
        init_logging();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/kv-clab-dagobah/data/suma"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "data": {"login": "admin", "password": "pw", "port": 443},
                    "metadata": {"version": 3}
                }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let secret = read_secret(&client, "kv-clab-dagobah/data/suma")
            .await
            .unwrap();
        assert_eq!(secret.get("login").map(String::as_str), Some("admin"));
        assert_eq!(secret.get("port").map(String::as_str), Some("443"));
    }

    #[tokio::test]
    async fn test_read_missing_secret() {
        init_logging();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/kv-clab-grp/data/config"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"errors": []})))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = read_secret(&client, "kv-clab-grp/data/config")
            .await
            .unwrap_err();
        assert!(matches!(err, VaultError::SecretNotFound(p) if p == "kv-clab-grp/data/config"));
    }

    #[tokio::test]
    async fn test_update_secret_merges_existing_keys() {
        init_logging();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/kv-clab-grp/data/approle_output"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"data": {"role_id": "rid"}}
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/kv-clab-grp/data/approle_output"))
            .and(body_json(json!({"data": {"role_id": "rid", "secret_id": "sid"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"version": 2}})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        update_secret(&client, "kv-clab-grp/data/approle_output", "secret_id", "sid")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_enable_kv2_accepts_existing_mount() {
        init_logging();
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/sys/mounts/kv-clab-grp"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "errors": ["path is already in use at kv-clab-grp/"]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert!(enable_kv2(&client, "kv-clab-grp").await.is_ok());
    }
}
