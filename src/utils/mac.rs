//! MAC address helpers.
//!
//! This file provides MAC format validation for configuration input and a
//! [`MacResolver`] that inspects a live interface inside the owning node's
//! network namespace, extracting the address from the `ip link` output.

use crate::topology::{MacError, MacResolver};
use regex::Regex;
use std::process::Command;

/// Pattern matching a MAC address embedded in command output
const MAC_PATTERN: &str = r"(?:[[:xdigit:]]{1,2}:){5}[[:xdigit:]]{1,2}";

/// Extract the first MAC address from interface-inspection output
pub fn extract_mac(output: &str) -> Option<String> {
    let re = Regex::new(MAC_PATTERN).expect("MAC pattern is valid");
    re.find(output).map(|m| m.as_str().to_string())
}

/// Check that a string is a full `aa:bb:cc:dd:ee:ff` style MAC address
pub fn is_valid_mac(mac: &str) -> bool {
    let re = Regex::new(r"^(?:[[:xdigit:]]{2}:){5}[[:xdigit:]]{2}$").expect("MAC pattern is valid");
    re.is_match(mac)
}

/// Resolver that shells out to `ip netns exec <node> ip link show <intf>`.
///
/// This assumes the emulation framework gives every node a named network
/// namespace matching its node name. The first lookup per interface is
/// blocking and potentially slow; [`crate::topology::InterfaceRef`] caches
/// the result so it happens at most once.
pub struct NetnsMacResolver;

impl MacResolver for NetnsMacResolver {
    fn resolve_mac(&self, node: &str, intf: &str) -> Result<String, MacError> {
        let output = Command::new("ip")
            .args(["netns", "exec", node, "ip", "link", "show", intf])
            .output()
            .map_err(|e| MacError::Inspection {
                node: node.to_string(),
                intf: intf.to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(MacError::Inspection {
                node: node.to_string(),
                intf: intf.to_string(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        extract_mac(&String::from_utf8_lossy(&output.stdout)).ok_or_else(|| MacError::NotFound {
            node: node.to_string(),
            intf: intf.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_mac_from_ip_link_output() {
        let output = "3: wlan0: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 1500\n\
                      link/ether 02:00:00:00:01:00 brd ff:ff:ff:ff:ff:ff";
        assert_eq!(extract_mac(output), Some("02:00:00:00:01:00".to_string()));
    }

    #[test]
    fn test_extract_mac_missing() {
        assert_eq!(extract_mac("no address here"), None);
    }

    #[test]
    fn test_valid_macs() {
        assert!(is_valid_mac("02:00:00:00:01:00"));
        assert!(is_valid_mac("AA:BB:CC:DD:EE:FF"));
    }

    #[test]
    fn test_invalid_macs() {
        assert!(!is_valid_mac("02:00:00:00:01"));
        assert!(!is_valid_mac("02-00-00-00-01-00"));
        assert!(!is_valid_mac("0g:00:00:00:01:00"));
        assert!(!is_valid_mac("02:00:00:00:01:00 "));
        assert!(!is_valid_mac(""));
    }
}
