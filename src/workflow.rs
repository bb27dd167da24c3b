//! End-to-end provisioning runs.
//!
//! A system run walks
//! `START -> CREDENTIALS_LOADED -> SESSION_ESTABLISHED -> ID_RESOLVED -> IP_RESOLVED -> AUTHORIZED -> MUTATED`
//! and stops at the first failure. Nothing is retried.

use crate::credentials::{CredentialBroker, FleetCredentials, KvLayout};
use crate::error::ProvisionError;
use crate::http::HttpOptions;
use crate::interface::{GroupMutator, NetworkChecker, SecretStore, SystemResolver};
use crate::suma::{MatchPolicy, MembershipGuard, NetworkMembership, SumaClient, SumaSession};
use crate::task::Task;
use crate::vault::policy::group_policy_hcl;
use tracing::{debug, info};

/// Everything a `register-system` run needs besides the secret store.
#[derive(Debug, Clone)]
pub struct SystemTaskConfig {
    pub group: String,
    pub hostname: String,
    /// Overrides the `url` stored with the SUSE Manager credentials.
    pub manager_url: Option<String>,
    pub task: Task,
    pub match_policy: MatchPolicy,
    pub layout: KvLayout,
    pub credentials_group: String,
    pub http: HttpOptions,
}

/// Everything a `register-user` run needs besides the secret store.
#[derive(Clone)]
pub struct UserTaskConfig {
    pub group: String,
    /// Password for the group's SUSE Manager account; only used by `add`.
    pub group_password: String,
    /// Permitted network prefix stored for the group; only used by `add`.
    pub network: String,
    pub manager_url: Option<String>,
    pub task: Task,
    pub layout: KvLayout,
    pub credentials_group: String,
    pub http: HttpOptions,
}

impl std::fmt::Debug for UserTaskConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserTaskConfig")
            .field("group", &self.group)
            .field("group_password", &"*******")
            .field("network", &self.network)
            .field("manager_url", &self.manager_url)
            .field("task", &self.task)
            .field("layout", &self.layout)
            .field("credentials_group", &self.credentials_group)
            .finish()
    }
}

async fn open_session(
    credentials: &FleetCredentials,
    manager_url: Option<&str>,
    credentials_path: String,
    http: &HttpOptions,
) -> Result<SumaSession, ProvisionError> {
    let url = manager_url
        .or(credentials.url.as_deref())
        .ok_or(ProvisionError::MissingSecret {
            path: credentials_path,
            key: "url".to_string(),
        })?;

    let session = SumaClient::new(url, http)?
        .login(&credentials.login, &credentials.password)
        .await?;
    debug!("State SESSION_ESTABLISHED: {}", url);
    Ok(session)
}

/// Authorizes `hostname` against `network` and applies `task` to it.
pub async fn mutate_system<R, M, N>(
    resolver: &R,
    mutator: &M,
    checker: &N,
    task: Task,
    hostname: &str,
    group: &str,
    network: &str,
) -> Result<String, ProvisionError>
where
    R: SystemResolver + ?Sized,
    M: GroupMutator + ?Sized,
    N: NetworkChecker + ?Sized,
{
    let system = MembershipGuard::new(resolver, checker)
        .authorize(hostname, network)
        .await?;

    let message = match task {
        Task::Add => {
            let status = mutator.add_to_group(group, system).await?;
            debug!("Got result: {}", status);
            format!("Successfully added system {} to group {}", hostname, group)
        }
        Task::Delete => {
            let status = mutator.remove_system(system).await?;
            debug!("Got result: {}", status);
            format!(
                "Successfully deleted system {} (the system record was removed from SUSE Manager)",
                hostname
            )
        }
    };
    debug!("State MUTATED: {} {}", task, hostname);
    Ok(message)
}

/// Adds `config.hostname` to `config.group`, or deletes it, after verifying that
/// its IP lies in the group's permitted network.
pub async fn run_system_task<S: SecretStore + ?Sized>(
    config: &SystemTaskConfig,
    store: &S,
) -> Result<String, ProvisionError> {
    let broker = CredentialBroker::new(store, &config.layout);
    let credentials = broker.fleet_credentials(&config.credentials_group).await?;
    let network = broker.permitted_network(&config.group).await?;
    debug!("State CREDENTIALS_LOADED: network {}", network);

    let session = open_session(
        &credentials,
        config.manager_url.as_deref(),
        config.layout.credentials_path(&config.credentials_group),
        &config.http,
    )
    .await?
    .with_match_policy(config.match_policy);

    mutate_system(
        &session,
        &session,
        &NetworkMembership,
        config.task,
        &config.hostname,
        &config.group,
        &network,
    )
    .await
}

/// Creates or removes a group's policy, AppRole, KV mount and SUSE Manager user.
pub async fn run_user_task<S: SecretStore + ?Sized>(
    config: &UserTaskConfig,
    store: &S,
) -> Result<String, ProvisionError> {
    let layout = &config.layout;
    let group = config.group.as_str();
    let credentials_path = layout.credentials_path(&config.credentials_group);

    let credentials = CredentialBroker::new(store, layout)
        .fleet_credentials(&config.credentials_group)
        .await?;
    let session = open_session(
        &credentials,
        config.manager_url.as_deref(),
        credentials_path.clone(),
        &config.http,
    )
    .await?;

    let policy_name = format!("{}-policy", group);
    let mount = layout.mount(group);

    match config.task {
        Task::Add => {
            session.ensure_user_absent(group).await?;

            let policy = group_policy_hcl(&mount, &credentials_path);
            store.create_policy(&policy_name, &policy).await?;

            let approle = store
                .create_role(group, std::slice::from_ref(&policy_name))
                .await?;
            store.enable_kv2(&mount).await?;

            let output_path = layout.approle_output_path(group);
            store
                .put_secret(&output_path, "role_id", &approle.role_id)
                .await?;
            store
                .put_secret(&output_path, "secret_id", &approle.secret_id)
                .await?;
            store
                .put_secret(&layout.config_path(group), "network", &config.network)
                .await?;

            session.create_user(group, &config.group_password).await?;
            info!("Provisioned group {}", group);

            Ok(format!(
                "API Login-Information for User: {}\nroleID={}\nsecretID={}",
                group, approle.role_id, approle.secret_id
            ))
        }
        Task::Delete => {
            session.remove_user(group).await?;
            store.delete_policy(&policy_name).await?;
            store.delete_role(group).await?;
            store.disable_kv(&mount).await?;
            info!("Deprovisioned group {}", group);

            Ok(format!(
                "Successfully removed user, role, policy and kv-vault of group {}",
                group
            ))
        }
    }
}
