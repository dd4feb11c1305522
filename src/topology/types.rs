//! Topology type definitions.
//!
//! This file contains the value types the registry is built from: interface
//! references with lazily resolved MAC addresses, and pairwise link
//! specifications carrying a signal-to-noise ratio.

use std::cell::OnceCell;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Default SNR for an explicitly declared link
pub const DEFAULT_LINK_SNR: i32 = 10;

/// Errors that can occur while resolving an interface's MAC address
#[derive(Debug, thiserror::Error)]
pub enum MacError {
    #[error("failed to inspect interface {intf} on {node}: {reason}")]
    Inspection {
        node: String,
        intf: String,
        reason: String,
    },

    #[error("no MAC address found for interface {intf} on {node}")]
    NotFound { node: String, intf: String },

    #[error("MAC address for {id} was never provided")]
    Unresolved { id: String },
}

/// Capability for looking up the MAC address of a live interface.
///
/// The inspection may shell out to the node's runtime and is therefore
/// potentially expensive; [`InterfaceRef`] memoizes the result so each
/// interface is inspected at most once.
pub trait MacResolver {
    fn resolve_mac(&self, node: &str, intf: &str) -> Result<String, MacError>;
}

/// Resolver for topologies where every MAC is known up front.
///
/// Any attempt to resolve through it fails, so it surfaces interfaces that
/// were registered without an address.
pub struct NullMacResolver;

impl MacResolver for NullMacResolver {
    fn resolve_mac(&self, node: &str, intf: &str) -> Result<String, MacError> {
        Err(MacError::Unresolved {
            id: format!("{}.{}", node, intf),
        })
    }
}

/// An unambiguous reference to one radio interface of one node.
///
/// The identifier is `"<node>.<interface>"`; two references are equal iff
/// their identifiers are equal. The MAC address may be supplied up front or
/// resolved on first use and cached (the registry and supervisor are
/// single-threaded, so a `OnceCell` is sufficient).
#[derive(Debug, Clone)]
pub struct InterfaceRef {
    node_name: String,
    intf_name: String,
    mac: OnceCell<String>,
}

impl InterfaceRef {
    /// Create a reference whose MAC will be resolved lazily.
    pub fn new(node_name: impl Into<String>, intf_name: impl Into<String>) -> Self {
        InterfaceRef {
            node_name: node_name.into(),
            intf_name: intf_name.into(),
            mac: OnceCell::new(),
        }
    }

    /// Create a reference with a known MAC address.
    pub fn with_mac(
        node_name: impl Into<String>,
        intf_name: impl Into<String>,
        mac: impl Into<String>,
    ) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(mac.into());
        InterfaceRef {
            node_name: node_name.into(),
            intf_name: intf_name.into(),
            mac: cell,
        }
    }

    /// Name of the owning node
    pub fn node_name(&self) -> &str {
        &self.node_name
    }

    /// Name of the interface on the node
    pub fn intf_name(&self) -> &str {
        &self.intf_name
    }

    /// Identifier used as a map key: `"<node>.<interface>"`
    pub fn identifier(&self) -> String {
        format!("{}.{}", self.node_name, self.intf_name)
    }

    /// MAC address, resolving through `resolver` on first call and caching
    /// the result for the lifetime of this reference.
    pub fn mac(&self, resolver: &dyn MacResolver) -> Result<&str, MacError> {
        if let Some(mac) = self.mac.get() {
            return Ok(mac);
        }
        let resolved = resolver.resolve_mac(&self.node_name, &self.intf_name)?;
        Ok(self.mac.get_or_init(|| resolved))
    }

    /// MAC address if it has already been provided or resolved
    pub fn cached_mac(&self) -> Option<&str> {
        self.mac.get().map(String::as_str)
    }
}

impl PartialEq for InterfaceRef {
    fn eq(&self, other: &Self) -> bool {
        self.node_name == other.node_name && self.intf_name == other.intf_name
    }
}

impl Eq for InterfaceRef {}

impl Hash for InterfaceRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node_name.hash(state);
        self.intf_name.hash(state);
    }
}

impl fmt::Display for InterfaceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.node_name, self.intf_name)
    }
}

/// A directional link between two interfaces with its SNR.
///
/// Links are declared A→B; a link declared B→A is a separate entry and may
/// carry a different quality (asymmetric links are legal and expected).
#[derive(Debug, Clone, PartialEq)]
pub struct LinkSpec {
    sta1: InterfaceRef,
    sta2: InterfaceRef,
    snr: i32,
}

impl LinkSpec {
    /// Create a link with the default SNR of 10.
    pub fn new(sta1: InterfaceRef, sta2: InterfaceRef) -> Self {
        Self::with_snr(sta1, sta2, DEFAULT_LINK_SNR)
    }

    /// Create a link with an explicit SNR.
    pub fn with_snr(sta1: InterfaceRef, sta2: InterfaceRef, snr: i32) -> Self {
        LinkSpec { sta1, sta2, snr }
    }

    /// Source endpoint
    pub fn sta1(&self) -> &InterfaceRef {
        &self.sta1
    }

    /// Destination endpoint
    pub fn sta2(&self) -> &InterfaceRef {
        &self.sta2
    }

    /// Signal-to-noise ratio
    pub fn snr(&self) -> i32 {
        self.snr
    }

    /// Deduplication key: `"<id(sta1)>/<id(sta2)>"`
    pub fn pair_key(&self) -> String {
        format!("{}/{}", self.sta1.identifier(), self.sta2.identifier())
    }
}
