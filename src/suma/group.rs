//! Group membership mutations.

use crate::interface::GroupMutator;
use crate::suma::{AuthorizedSystem, SumaError, SumaSession};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddOrRemoveSystems<'a> {
    system_group_name: &'a str,
    server_ids: Vec<i64>,
    add: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteSystem {
    sid: i64,
    cleanup_type: &'static str,
}

#[async_trait]
impl GroupMutator for SumaSession {
    async fn add_to_group(
        &self,
        group: &str,
        system: AuthorizedSystem,
    ) -> Result<u16, SumaError> {
        let payload = AddOrRemoveSystems {
            system_group_name: group,
            server_ids: vec![system.id()],
            add: true,
        };
        debug!("Payload: {:?}", payload);

        let status = self
            .client
            .post_json(&self.session, "systemgroup/addOrRemoveSystems", &payload)
            .await?;
        info!("Added {} (id {}) to group {}", system.hostname(), system.id(), group);
        Ok(status)
    }

    /// Deletes the entire system record with `FORCE_DELETE` cleanup, which also
    /// drops it from every group, not just the one the operator named.
    async fn remove_system(&self, system: AuthorizedSystem) -> Result<u16, SumaError> {
        let payload = DeleteSystem {
            sid: system.id(),
            cleanup_type: "FORCE_DELETE",
        };
        warn!(
            "Force-deleting system record {} (id {}) from SUSE Manager",
            system.hostname(),
            system.id()
        );

        self.client
            .post_json(&self.session, "system/deleteSystem", &payload)
            .await
    }
}
