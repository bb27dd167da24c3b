use anyhow::{Context, Result};
use clap::{ArgAction, Args, CommandFactory, Parser};
use std::net::IpAddr;
use std::process::ExitCode;
use tracing::{debug, warn};

use crate::credentials::{KvLayout, DEFAULT_CREDENTIALS_GROUP, DEFAULT_KV_PREFIX};
use crate::error::ProvisionError;
use crate::http::{HttpOptions, DEFAULT_TIMEOUT_SECS};
use crate::interface::SecretStore;
use crate::suma::MatchPolicy;
use crate::task::Task;
use crate::vault::{VaultLogin, VaultStore};
use crate::workflow::{run_system_task, run_user_task, SystemTaskConfig, UserTaskConfig};

/// AppRole login shared by both tools.
#[derive(Args, Debug, Clone, Default)]
pub struct VaultArgs {
    /// AppRole role id.
    #[arg(short = 'r', long, env = "VAULT_ROLE_ID")]
    pub role_id: Option<String>,
    /// AppRole secret id.
    #[arg(short = 's', long, env = "VAULT_SECRET_ID", hide_env_values = true)]
    pub secret_id: Option<String>,
    /// Vault address, e.g. https://vault.example.com:8200.
    #[arg(short = 'a', long, env = "VAULT_ADDR")]
    pub vault_addr: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Verbose output.
    #[arg(short = 'v', long)]
    pub verbose: bool,
    /// Prefix of the per-group KV mounts.
    #[arg(long, default_value = DEFAULT_KV_PREFIX)]
    pub kv_prefix: String,
    /// Group whose KV mount holds the SUSE Manager credentials.
    #[arg(long, default_value = DEFAULT_CREDENTIALS_GROUP)]
    pub credentials_group: String,
    /// Accept invalid TLS certificates.
    #[arg(long)]
    pub insecure: bool,
    /// Request timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,
}

impl Default for CommonArgs {
    fn default() -> Self {
        Self {
            verbose: false,
            kv_prefix: DEFAULT_KV_PREFIX.to_string(),
            credentials_group: DEFAULT_CREDENTIALS_GROUP.to_string(),
            insecure: false,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl CommonArgs {
    fn http(&self) -> HttpOptions {
        HttpOptions::new(self.timeout, self.insecure)
    }
}

/// Add a system to a SUSE Manager system group, or delete it from SUSE Manager.
#[derive(Parser, Debug, Clone)]
#[command(name = "register-system", version, disable_help_flag = true)]
pub struct SystemCli {
    #[command(flatten)]
    pub vault: VaultArgs,
    /// SUSE Manager system group.
    #[arg(short = 'g', long)]
    pub group: Option<String>,
    /// Fully qualified hostname of the system.
    #[arg(short = 'h', long)]
    pub hostname: Option<String>,
    /// SUSE Manager URL. Defaults to the url stored with the credentials.
    #[arg(short = 'm', long)]
    pub manager_url: Option<String>,
    /// Task [add | delete].
    #[arg(short = 't', long)]
    pub task: Option<String>,
    /// Which record wins when the hostname matches several systems.
    #[arg(long, value_enum, default_value_t = MatchPolicy::Last)]
    pub match_policy: MatchPolicy,
    #[command(flatten)]
    pub common: CommonArgs,
    /// Print help.
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

/// Create or delete a group's user, policy and KV mount in Vault and its user in SUSE Manager.
#[derive(Parser, Debug, Clone)]
#[command(name = "register-user", version)]
pub struct UserCli {
    #[command(flatten)]
    pub vault: VaultArgs,
    /// Group (user) to create or delete.
    #[arg(short = 'g', long)]
    pub group: Option<String>,
    /// Password of the group's user in SUSE Manager.
    #[arg(short = 'd', long)]
    pub group_password: Option<String>,
    /// Network of the group's systems, e.g. 172.1.22.0.
    #[arg(short = 'n', long)]
    pub network: Option<String>,
    /// SUSE Manager URL. Defaults to the url stored with the credentials.
    #[arg(short = 'm', long)]
    pub manager_url: Option<String>,
    /// Task [add | delete].
    #[arg(short = 't', long)]
    pub task: Option<String>,
    #[command(flatten)]
    pub common: CommonArgs,
}

/// A hostname with at least one dot and no trailing dot.
pub fn is_fqdn(hostname: &str) -> bool {
    hostname.contains('.') && !hostname.ends_with('.')
}

/// An absolute URL with a host.
pub fn is_url(line: &str) -> bool {
    reqwest::Url::parse(line)
        .map(|url| url.has_host())
        .unwrap_or(false)
}

pub fn is_ip(line: &str) -> bool {
    line.parse::<IpAddr>().is_ok()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn require<'a>(value: &'a Option<String>, msg: &str) -> Result<&'a str, ProvisionError> {
    non_empty(value).ok_or_else(|| ProvisionError::validation(msg))
}

fn manager_url(value: &Option<String>) -> Result<Option<String>, ProvisionError> {
    match non_empty(value) {
        Some(url) if !is_url(url) => Err(ProvisionError::validation(
            "Please enter a valid URL for the SUSE Manager.",
        )),
        url => Ok(url.map(str::to_string)),
    }
}

fn vault_login(vault: &VaultArgs, addr: &str) -> Result<VaultLogin, ProvisionError> {
    Ok(VaultLogin {
        addr: addr.to_string(),
        role_id: require(&vault.role_id, "Please enter a roleID.")?.to_string(),
        secret_id: require(&vault.secret_id, "Please enter a secretID.")?.to_string(),
    })
}

impl SystemCli {
    /// Checks the flags before anything touches the network.
    pub fn validate(&self) -> Result<(VaultLogin, SystemTaskConfig), ProvisionError> {
        let hostname = non_empty(&self.hostname)
            .filter(|h| is_fqdn(h))
            .ok_or_else(|| ProvisionError::validation("Please enter the FQDN Hostname."))?;
        let addr = non_empty(&self.vault.vault_addr)
            .filter(|a| is_url(a))
            .ok_or_else(|| ProvisionError::validation("Please enter a valid URL for vault."))?;
        let login = vault_login(&self.vault, addr)?;
        let group = require(&self.group, "Please enter a SUSE Manager group.")?;
        let task: Task = require(&self.task, "Please enter a task.")?.parse()?;

        let config = SystemTaskConfig {
            group: group.to_string(),
            hostname: hostname.to_string(),
            manager_url: manager_url(&self.manager_url)?,
            task,
            match_policy: self.match_policy,
            layout: KvLayout::new(&self.common.kv_prefix),
            credentials_group: self.common.credentials_group.clone(),
            http: self.common.http(),
        };
        Ok((login, config))
    }
}

impl UserCli {
    /// Checks the flags before anything touches the network. The group password
    /// and network are only required for `add`.
    pub fn validate(&self) -> Result<(VaultLogin, UserTaskConfig), ProvisionError> {
        let role_id = require(&self.vault.role_id, "Please enter a roleID.")?;
        let secret_id = require(&self.vault.secret_id, "Please enter a secretID.")?;
        let group = require(&self.group, "Please enter a group (user) to create.")?;
        let addr = require(
            &self.vault.vault_addr,
            "Please enter the URL of the Hashicorp Vault.",
        )?;
        let task = require(&self.task, "Please enter a task.")?;
        if !is_url(addr) {
            return Err(ProvisionError::validation(
                "Please enter a valid URL for vault.",
            ));
        }
        let task: Task = task.parse()?;

        let (group_password, network) = match task {
            Task::Add => {
                let password = require(
                    &self.group_password,
                    "Please enter a password for the group (user) in SUSE Manager.",
                )?;
                let network = non_empty(&self.network)
                    .filter(|n| is_ip(n))
                    .ok_or_else(|| {
                        ProvisionError::validation("Please enter a valid IP for the network.")
                    })?;
                (password.to_string(), network.to_string())
            }
            Task::Delete => (String::new(), String::new()),
        };

        let login = VaultLogin {
            addr: addr.to_string(),
            role_id: role_id.to_string(),
            secret_id: secret_id.to_string(),
        };
        let config = UserTaskConfig {
            group: group.to_string(),
            group_password,
            network,
            manager_url: manager_url(&self.manager_url)?,
            task,
            layout: KvLayout::new(&self.common.kv_prefix),
            credentials_group: self.common.credentials_group.clone(),
            http: self.common.http(),
        };
        Ok((login, config))
    }
}

async fn logout(store: &VaultStore) {
    if let Err(e) = store.logout().await {
        warn!("Failed to revoke Vault token: {}", e);
    }
}

/// Runs `register-system` to completion and returns the success message.
pub async fn run_system(cli: SystemCli) -> Result<String> {
    let (login, config) = cli.validate()?;
    debug!("Running {:?}", config);

    let store = VaultStore::login(&login, &config.http)
        .await
        .context("error logging in to Vault")?;
    let result = run_system_task(&config, &store).await;
    logout(&store).await;
    Ok(result?)
}

/// Runs `register-user` to completion and returns the success message.
pub async fn run_user(cli: UserCli) -> Result<String> {
    let (login, config) = cli.validate()?;
    debug!("Running {:?}", config);

    let store = VaultStore::login(&login, &config.http)
        .await
        .context("error logging in to Vault")?;
    let result = run_user_task(&config, &store).await;
    logout(&store).await;
    Ok(result?)
}

/// Parses the process arguments. Without any argument the usage is printed and
/// the run fails, like any other flag error.
pub fn parse_args<P: Parser>() -> std::result::Result<P, ExitCode> {
    if std::env::args_os().len() <= 1 {
        eprintln!("{}", P::command().render_help());
        return Err(ExitCode::FAILURE);
    }
    P::try_parse().map_err(|e| {
        let _ = e.print();
        if e.use_stderr() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    })
}

/// Prints the outcome of a run and maps it to the process exit code.
pub fn report(result: Result<String>) -> ExitCode {
    match result {
        Ok(message) => {
            println!("{}", message);
            ExitCode::SUCCESS
        }
        Err(e) => {
            debug!("State FAILED");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
