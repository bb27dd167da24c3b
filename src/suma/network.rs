//! Permitted-network membership.
//!
//! The permitted network is stored as a bare prefix such as `172.16.5.0`; the
//! mask is always /24.

use crate::interface::NetworkChecker;
use ipnet::IpNet;
use std::net::IpAddr;
use tracing::debug;

pub const PERMITTED_PREFIX_LEN: u8 = 24;

/// Returns `true` iff `ip` lies inside `network_prefix/24`.
///
/// Unparseable input is never a member.
pub fn is_in_network(ip: &str, network_prefix: &str) -> bool {
    let addr: IpAddr = match ip.parse() {
        Ok(addr) => addr,
        Err(e) => {
            debug!("Error parsing IP {:?}: {}", ip, e);
            return false;
        }
    };
    let cidr = format!("{}/{}", network_prefix, PERMITTED_PREFIX_LEN);
    let net: IpNet = match cidr.parse() {
        Ok(net) => net,
        Err(e) => {
            debug!("Error parsing CIDR {:?}: {}", cidr, e);
            return false;
        }
    };
    net.contains(&addr)
}

/// The production [`NetworkChecker`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkMembership;

impl NetworkChecker for NetworkMembership {
    fn is_in_network(&self, ip: &str, network: &str) -> bool {
        is_in_network(ip, network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_in_network() {
        let cases = [
            ("192.168.1.10", "192.168.1.0", true),
            ("192.168.1.0", "192.168.1.0", true),
            ("192.168.1.255", "192.168.1.0", true),
            ("192.168.2.10", "192.168.1.0", false),
            ("10.0.0.1", "192.168.1.0", false),
            // host bits in the configured prefix are masked off
            ("172.16.5.77", "172.16.5.1", true),
        ];
        for (ip, network, want) in cases {
            assert_eq!(is_in_network(ip, network), want, "{} in {}/24", ip, network);
        }
    }

    #[test]
    fn test_malformed_input_is_never_member() {
        assert!(!is_in_network("not-an-ip", "192.168.1.0"));
        assert!(!is_in_network("10.0.0.1", "not-a-network"));
        assert!(!is_in_network("", ""));
        assert!(!is_in_network("10.0.0.1", "10.0.0.0/16"));
        assert!(!is_in_network("300.1.1.1", "10.0.0.0"));
    }

    #[test]
    fn test_surrounding_whitespace_is_malformed() {
        assert!(!is_in_network(" 192.168.1.10", "192.168.1.0"));
        assert!(!is_in_network("192.168.1.10\n", "192.168.1.0"));
        assert!(!is_in_network("192.168.1.10", "192.168.1.0 "));
    }

    #[test]
    fn test_address_families_do_not_mix() {
        assert!(!is_in_network("192.168.1.10", "2001:db8::"));
        assert!(is_in_network("2001:db8::1", "2001:db8::"));
    }

    #[test]
    fn test_checker_delegates() {
        let checker = NetworkMembership;
        assert!(checker.is_in_network("192.168.1.10", "192.168.1.0"));
        assert!(!checker.is_in_network("192.168.2.10", "192.168.1.0"));
    }
}
