//! Radio topology module.
//!
//! This module holds the authoritative set of managed interfaces and the
//! declared links between them, validates link endpoints against the managed
//! set, and auto-completes missing interface pairs before the topology is
//! handed to the config renderer.

pub mod types;

pub use types::{
    InterfaceRef, LinkSpec, MacError, MacResolver, NullMacResolver, DEFAULT_LINK_SNR,
};

use std::collections::{HashMap, HashSet};

/// Errors produced while building a topology
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("interface {id} is already registered")]
    DuplicateInterface { id: String },

    #[error("{id} is not part of the managed interfaces")]
    UnmanagedEndpoint { id: String },
}

/// Authoritative registry of managed interfaces and declared links.
///
/// Interfaces keep their registration order, which fixes the zero-based
/// index each one gets in the rendered config. Links are keyed by the
/// ordered pair of endpoint identifiers, so a declared A→B and B→A coexist.
///
/// Duplicate registration of an identifier is always an error, never a
/// silent no-op.
#[derive(Debug)]
pub struct TopologyRegistry {
    interfaces: Vec<InterfaceRef>,
    positions: HashMap<String, usize>,
    nodes: HashSet<String>,
    links: HashMap<String, LinkSpec>,
    auto_add_links: bool,
    default_auto_snr: i32,
}

impl Default for TopologyRegistry {
    fn default() -> Self {
        Self::new(true, 0)
    }
}

impl TopologyRegistry {
    /// Create a registry.
    ///
    /// With `auto_add_links` set, [`finalize`](Self::finalize) fills every
    /// undeclared ordered interface pair with a link of `default_auto_snr`.
    pub fn new(auto_add_links: bool, default_auto_snr: i32) -> Self {
        TopologyRegistry {
            interfaces: Vec::new(),
            positions: HashMap::new(),
            nodes: HashSet::new(),
            links: HashMap::new(),
            auto_add_links,
            default_auto_snr,
        }
    }

    /// Register a batch of interfaces.
    ///
    /// The call is atomic: if any identifier is already registered, or
    /// appears twice within the batch, nothing is stored and
    /// [`TopologyError::DuplicateInterface`] is returned.
    pub fn register_interfaces(
        &mut self,
        refs: impl IntoIterator<Item = InterfaceRef>,
    ) -> Result<(), TopologyError> {
        let refs: Vec<InterfaceRef> = refs.into_iter().collect();

        let mut batch_ids = HashSet::new();
        for intfref in &refs {
            let id = intfref.identifier();
            if self.positions.contains_key(&id) || !batch_ids.insert(id.clone()) {
                return Err(TopologyError::DuplicateInterface { id });
            }
        }

        for intfref in refs {
            self.positions.insert(intfref.identifier(), self.interfaces.len());
            self.nodes.insert(intfref.node_name().to_string());
            self.interfaces.push(intfref);
        }
        Ok(())
    }

    /// Declare a batch of links.
    ///
    /// Every link of the batch is validated before any is stored, so a
    /// failing call leaves the link set unchanged. Validation is node-level:
    /// an endpoint is covered as soon as any registered interface belongs to
    /// the same node (matching the behavior embeddings rely on, even though
    /// it accepts endpoints that name an unregistered interface of a managed
    /// node — those are rejected later when the config is rendered).
    ///
    /// Redeclaring a pair replaces the earlier entry (last write wins).
    pub fn declare_links(
        &mut self,
        links: impl IntoIterator<Item = LinkSpec>,
    ) -> Result<(), TopologyError> {
        let links: Vec<LinkSpec> = links.into_iter().collect();

        for link in &links {
            self.check_coverage(link)?;
        }

        for link in links {
            self.links.insert(link.pair_key(), link);
        }
        Ok(())
    }

    /// Complete and order the link set.
    ///
    /// Re-validates endpoint coverage, then (if enabled) synthesizes a link
    /// with the default auto SNR for every ordered pair of distinct
    /// registered interfaces that has no declared link. Declared links are
    /// never overwritten, including those declared with SNR 0.
    ///
    /// The returned sequence is ordered by the registration indices of the
    /// endpoints, so the rendered config is reproducible for the same inputs.
    pub fn finalize(&mut self) -> Result<Vec<LinkSpec>, TopologyError> {
        for link in self.links.values() {
            self.check_coverage(link)?;
        }

        if self.auto_add_links {
            for i in 0..self.interfaces.len() {
                for j in 0..self.interfaces.len() {
                    if i == j {
                        continue;
                    }
                    let key = format!(
                        "{}/{}",
                        self.interfaces[i].identifier(),
                        self.interfaces[j].identifier()
                    );
                    if !self.links.contains_key(&key) {
                        let link = LinkSpec::with_snr(
                            self.interfaces[i].clone(),
                            self.interfaces[j].clone(),
                            self.default_auto_snr,
                        );
                        self.links.insert(key, link);
                    }
                }
            }
        }

        let mut ordered: Vec<LinkSpec> = self.links.values().cloned().collect();
        ordered.sort_by(|a, b| self.order_key(a).cmp(&self.order_key(b)));
        Ok(ordered)
    }

    /// Registered interfaces in registration order
    pub fn interfaces(&self) -> &[InterfaceRef] {
        &self.interfaces
    }

    /// Look up a registered interface by identifier
    pub fn get(&self, identifier: &str) -> Option<&InterfaceRef> {
        self.positions.get(identifier).map(|&i| &self.interfaces[i])
    }

    /// True if no interface has been registered
    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }

    /// Number of currently declared links (before auto-completion)
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    fn check_coverage(&self, link: &LinkSpec) -> Result<(), TopologyError> {
        if !self.nodes.contains(link.sta1().node_name()) {
            return Err(TopologyError::UnmanagedEndpoint {
                id: link.sta1().identifier(),
            });
        }
        if !self.nodes.contains(link.sta2().node_name()) {
            return Err(TopologyError::UnmanagedEndpoint {
                id: link.sta2().identifier(),
            });
        }
        Ok(())
    }

    // Links whose endpoints carry no registration index sort last; the pair
    // key keeps even those deterministic.
    fn order_key(&self, link: &LinkSpec) -> (usize, usize, String) {
        let a = self
            .positions
            .get(&link.sta1().identifier())
            .copied()
            .unwrap_or(usize::MAX);
        let b = self
            .positions
            .get(&link.sta2().identifier())
            .copied()
            .unwrap_or(usize::MAX);
        (a, b, link.pair_key())
    }
}
