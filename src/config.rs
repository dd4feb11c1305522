//! Declarative topology configuration.
//!
//! Embeddings can describe a whole medium in one YAML document instead of
//! building the registry call by call:
//!
//! ```yaml
//! medium:
//!   executable: wmediumd
//!   auto_add_links: false
//!   default_snr: 0
//!
//! interfaces:
//!   - node: sta1
//!     intf: wlan0
//!     mac: "02:00:00:00:01:00"
//!   - node: sta2
//!     intf: wlan0          # MAC resolved from the live interface
//!
//! links:
//!   - from: sta1.wlan0
//!     to: sta2.wlan0
//!     snr: 15
//! ```
//!
//! Interfaces without a `mac` are resolved through the embedding's
//! [`MacResolver`](crate::topology::MacResolver) when the config is rendered.

use crate::topology::{InterfaceRef, LinkSpec, TopologyError, TopologyRegistry, DEFAULT_LINK_SNR};
use crate::utils::mac::is_valid_mac;
use crate::wmediumd::DEFAULT_EXECUTABLE;
use serde::{Deserialize, Serialize};

/// Validation errors for a parsed topology description
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid medium settings: {0}")]
    InvalidMedium(String),

    #[error("invalid interface definition: {0}")]
    InvalidInterface(String),

    #[error("invalid link definition: {0}")]
    InvalidLink(String),
}

/// Top-level topology description
#[derive(Debug, Serialize, Deserialize)]
pub struct TopologyConfig {
    #[serde(default)]
    pub medium: MediumConfig,
    pub interfaces: Vec<InterfaceConfig>,
    #[serde(default)]
    pub links: Vec<LinkConfig>,
}

/// Settings for the simulator process and link auto-completion
#[derive(Debug, Serialize, Deserialize)]
pub struct MediumConfig {
    #[serde(default = "default_executable")]
    pub executable: String,
    #[serde(default = "default_auto_add")]
    pub auto_add_links: bool,
    #[serde(default)]
    pub default_snr: i32,
}

impl Default for MediumConfig {
    fn default() -> Self {
        MediumConfig {
            executable: default_executable(),
            auto_add_links: default_auto_add(),
            default_snr: 0,
        }
    }
}

fn default_executable() -> String {
    DEFAULT_EXECUTABLE.to_string()
}

fn default_auto_add() -> bool {
    true
}

/// One managed interface
#[derive(Debug, Serialize, Deserialize)]
pub struct InterfaceConfig {
    pub node: String,
    pub intf: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
}

/// One declared link, endpoints given as `"node.intf"` identifiers
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkConfig {
    pub from: String,
    pub to: String,
    #[serde(default = "default_link_snr")]
    pub snr: i32,
}

fn default_link_snr() -> i32 {
    DEFAULT_LINK_SNR
}

impl TopologyConfig {
    /// Validate the parsed description before any registry is built
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.medium.executable.is_empty() {
            return Err(ValidationError::InvalidMedium(
                "executable cannot be empty".to_string(),
            ));
        }

        if self.interfaces.is_empty() {
            return Err(ValidationError::InvalidInterface(
                "at least one interface must be defined".to_string(),
            ));
        }

        for iface in &self.interfaces {
            if iface.node.is_empty() || iface.intf.is_empty() {
                return Err(ValidationError::InvalidInterface(
                    "node and intf cannot be empty".to_string(),
                ));
            }
            if let Some(mac) = &iface.mac {
                if !is_valid_mac(mac) {
                    return Err(ValidationError::InvalidInterface(format!(
                        "'{}' is not a valid MAC address for {}.{}",
                        mac, iface.node, iface.intf
                    )));
                }
            }
        }

        for link in &self.links {
            parse_endpoint(&link.from)?;
            parse_endpoint(&link.to)?;
        }

        Ok(())
    }

    /// Build a registry holding the described interfaces and links.
    ///
    /// Link endpoints are looked up among the described interfaces first so
    /// they share the interface's cached MAC; an endpoint that only names a
    /// managed node still passes node-level validation.
    pub fn build_registry(&self) -> Result<TopologyRegistry, TopologyError> {
        let mut registry = TopologyRegistry::new(self.medium.auto_add_links, self.medium.default_snr);

        let refs: Vec<InterfaceRef> = self
            .interfaces
            .iter()
            .map(|iface| match &iface.mac {
                Some(mac) => InterfaceRef::with_mac(&iface.node, &iface.intf, mac),
                None => InterfaceRef::new(&iface.node, &iface.intf),
            })
            .collect();
        registry.register_interfaces(refs)?;

        let links: Vec<LinkSpec> = self
            .links
            .iter()
            .map(|link| {
                LinkSpec::with_snr(
                    self.endpoint_ref(&registry, &link.from),
                    self.endpoint_ref(&registry, &link.to),
                    link.snr,
                )
            })
            .collect();
        registry.declare_links(links)?;

        Ok(registry)
    }

    fn endpoint_ref(&self, registry: &TopologyRegistry, endpoint: &str) -> InterfaceRef {
        if let Some(registered) = registry.get(endpoint) {
            return registered.clone();
        }
        // validate() guarantees the endpoint splits; unknown identifiers are
        // left for the registry's own coverage check to judge.
        let (node, intf) = endpoint.split_once('.').unwrap_or((endpoint, ""));
        InterfaceRef::new(node, intf)
    }
}

fn parse_endpoint(endpoint: &str) -> Result<(&str, &str), ValidationError> {
    match endpoint.split_once('.') {
        Some((node, intf)) if !node.is_empty() && !intf.is_empty() => Ok((node, intf)),
        _ => Err(ValidationError::InvalidLink(format!(
            "endpoint '{}' is not of the form node.intf",
            endpoint
        ))),
    }
}
