//! Authorization of system mutations.
//!
//! A system may only be added to a group or deleted once its current IP has been
//! resolved and found inside the group's permitted network. The guard performs
//! the three steps strictly in order, because each step needs the previous
//! step's result:
//!
//! 1. hostname -> system id
//! 2. system id -> IP address
//! 3. IP address in permitted network
//!
//! Success yields an [`AuthorizedSystem`], the only value the [`GroupMutator`]
//! operations accept.
//!
//! [`GroupMutator`]: crate::interface::GroupMutator

use crate::interface::{NetworkChecker, SystemResolver};
use crate::suma::SumaError;
use tracing::{debug, warn};

/// Proof that a system passed the permitted-network check.
///
/// Not `Clone`: each mutation consumes one authorization.
#[derive(Debug, PartialEq, Eq)]
pub struct AuthorizedSystem {
    id: i64,
    hostname: String,
    ip: String,
}

impl AuthorizedSystem {
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn ip(&self) -> &str {
        &self.ip
    }

    #[cfg(test)]
    pub(crate) fn for_tests(id: i64, hostname: &str, ip: &str) -> Self {
        Self {
            id,
            hostname: hostname.to_string(),
            ip: ip.to_string(),
        }
    }
}

pub struct MembershipGuard<'a, R: ?Sized, N: ?Sized> {
    resolver: &'a R,
    checker: &'a N,
}

impl<'a, R, N> MembershipGuard<'a, R, N>
where
    R: SystemResolver + ?Sized,
    N: NetworkChecker + ?Sized,
{
    pub fn new(resolver: &'a R, checker: &'a N) -> Self {
        Self { resolver, checker }
    }

    pub async fn authorize(
        &self,
        hostname: &str,
        permitted_network: &str,
    ) -> Result<AuthorizedSystem, SumaError> {
        let id = self.resolver.resolve_id(hostname).await?;
        debug!("State ID_RESOLVED: {} -> {}", hostname, id);

        let ip = self.resolver.resolve_ip(id).await?;
        debug!("State IP_RESOLVED: {} -> {}", id, ip);

        if !self.checker.is_in_network(&ip, permitted_network) {
            warn!(
                "{} ({}) is outside the permitted network {}/24",
                hostname, ip, permitted_network
            );
            return Err(SumaError::PermissionDenied {
                hostname: hostname.to_string(),
                ip,
                network: permitted_network.to_string(),
            });
        }
        debug!("State AUTHORIZED: {} ({}) in {}/24", hostname, ip, permitted_network);

        Ok(AuthorizedSystem {
            id,
            hostname: hostname.to_string(),
            ip,
        })
    }
}
