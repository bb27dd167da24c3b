//! AppRole authentication and role management.

use crate::vault::{AppRoleCredentials, VaultClient, VaultError};
use serde_json::{json, Value};
use tracing::{debug, info};

fn string_field(resp: &Value, section: &str, field: &str) -> Result<String, VaultError> {
    resp.get(section)
        .and_then(|d| d.get(field))
        .and_then(|v| v.as_str())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| VaultError::MissingField(format!("{}.{}", section, field)))
}

/// Logs in with AppRole credentials and stores the returned client token on `client`.
pub async fn approle_login(
    client: &mut VaultClient,
    role_id: &str,
    secret_id: &str,
) -> Result<(), VaultError> {
    let resp = client
        .post_with_body(
            "/v1/auth/approle/login",
            json!({ "role_id": role_id, "secret_id": secret_id }),
        )
        .await?;
    let token = string_field(&resp, "auth", "client_token")?;
    client.set_token(&token);
    info!("Successfully authenticated with Vault at {}", client.addr);
    Ok(())
}

/// Revokes the token currently held by `client`.
pub async fn revoke_self(client: &VaultClient) -> Result<(), VaultError> {
    if client.token().is_none() {
        return Err(VaultError::Api(
            "no token found, already logged out?".to_string(),
        ));
    }
    client.post("/v1/auth/token/revoke-self").await?;
    info!("Successfully logged out from Vault");
    Ok(())
}

/// Creates (or overwrites) an AppRole role and returns a fresh Role ID and Secret ID.
pub async fn create_role(
    client: &VaultClient,
    role_name: &str,
    policies: &[String],
) -> Result<AppRoleCredentials, VaultError> {
    client
        .post_with_body(
            &format!("/v1/auth/approle/role/{}", role_name),
            json!({ "token_policies": policies }),
        )
        .await?;
    debug!("AppRole role '{}' written", role_name);

    let resp = client
        .get(&format!("/v1/auth/approle/role/{}/role-id", role_name))
        .await?;
    let role_id = string_field(&resp, "data", "role_id")?;

    let resp = client
        .post(&format!("/v1/auth/approle/role/{}/secret-id", role_name))
        .await?;
    let secret_id = string_field(&resp, "data", "secret_id")?;

    Ok(AppRoleCredentials { role_id, secret_id })
}

pub async fn delete_role(client: &VaultClient, role_name: &str) -> Result<(), VaultError> {
    client
        .delete(&format!("/v1/auth/approle/role/{}", role_name))
        .await?;
    info!("Deleted AppRole role '{}'", role_name);
    Ok(())
}
