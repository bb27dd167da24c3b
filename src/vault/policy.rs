//! ACL policy management.

use crate::vault::{VaultClient, VaultError};
use serde_json::json;
use tracing::{info, warn};

/// Renders the policy granting a group read access to its own KV mount and to
/// the shared SUSE Manager credentials.
pub fn group_policy_hcl(kv_mount: &str, credentials_path: &str) -> String {
    format!(
        r#"
        # Allow reading the group's own configuration
        path "{}/data/*" {{
            capabilities = ["read"]
        }}

        # Allow reading the SUSE Manager credentials
        path "{}" {{
            capabilities = ["read"]
        }}
        "#,
        kv_mount, credentials_path
    )
}

pub async fn create_policy(
    client: &VaultClient,
    policy_name: &str,
    policy_hcl: &str,
) -> Result<(), VaultError> {
    let response = client
        .put_with_body(
            &format!("/v1/sys/policies/acl/{}", policy_name),
            json!({ "policy": policy_hcl }),
        )
        .await;

    match response {
        Ok(_) => {
            info!("Created/updated policy: {}", policy_name);
            Ok(())
        }
        Err(e) => {
            warn!("Failed to create/update policy '{}': {}", policy_name, e);
            Err(e)
        }
    }
}

pub async fn delete_policy(client: &VaultClient, policy_name: &str) -> Result<(), VaultError> {
    client
        .delete(&format!("/v1/sys/policies/acl/{}", policy_name))
        .await?;
    info!("Deleted policy: {}", policy_name);
    Ok(())
}
