//! # Wmedsim - Connectivity-topology manager for wmediumd radio simulations
//!
//! This library manages the *description* of a simulated radio medium and the
//! lifecycle of the wmediumd process that simulates it. It does not simulate
//! radio physics, and it does not create stations or virtual radio devices —
//! the surrounding network-emulation framework supplies interface identities
//! and MAC addresses.
//!
//! ## Overview
//!
//! An embedding registers its radio interfaces and the pairwise link
//! qualities (signal-to-noise ratios) it wants, the registry validates and
//! auto-completes the link matrix, the renderer serializes it into wmediumd's
//! config format, and the supervisor writes the file and runs the simulator
//! detached until it is told to stop.
//!
//! ## Architecture
//!
//! - `topology`: interface references, link specifications, and the
//!   validating/auto-completing registry
//! - `wmediumd`: byte-exact rendering of the simulator's config format
//! - `supervisor`: lifecycle state machine and detached process management
//! - `config`: declarative YAML topology descriptions
//! - `config_loader`: topology file loading
//! - `utils`: MAC validation and live-interface inspection
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use wmedsim::supervisor::MediumSupervisor;
//! use wmedsim::topology::{InterfaceRef, LinkSpec, NullMacResolver, TopologyRegistry};
//!
//! let mut registry = TopologyRegistry::new(false, 0);
//! registry.register_interfaces(vec![
//!     InterfaceRef::with_mac("sta1", "wlan0", "02:00:00:00:01:00"),
//!     InterfaceRef::with_mac("sta2", "wlan0", "02:00:00:00:02:00"),
//! ])?;
//! registry.declare_links(vec![LinkSpec::with_snr(
//!     InterfaceRef::new("sta1", "wlan0"),
//!     InterfaceRef::new("sta2", "wlan0"),
//!     15,
//! )])?;
//!
//! let mut supervisor = MediumSupervisor::new();
//! supervisor.configure(&mut registry, &NullMacResolver, "wmediumd")?;
//! supervisor.start()?;
//! // ... interact with the emulated network while wmediumd runs detached ...
//! supervisor.stop()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Lifecycle
//!
//! The supervisor moves `Uninitialized` → `Configured` → `Running` →
//! `Stopped`. Double starts and premature stops are errors; teardown is
//! best-effort and always lands in `Stopped` so the embedding is never
//! wedged by a half-failed cleanup. The simulator cannot know its managed
//! interfaces' addresses before they exist, so an embedding either starts
//! the medium from a post-provision hook (pre-empting connectivity entirely)
//! or calls `start()` once its network is built — both funnel into the same
//! `configure`/`start` sequence.
//!
//! ## Concurrency
//!
//! All calls are synchronous and single-threaded; the only concurrent piece
//! is the detached simulator process itself. Embeddings that mutate the
//! registry from several writers must serialize their own calls.

pub mod config;
pub mod config_loader;
pub mod supervisor;
pub mod topology;
pub mod utils;
pub mod wmediumd;

pub use supervisor::{MediumSupervisor, ProcessLauncher, SupervisorError, SupervisorState};
pub use topology::{
    InterfaceRef, LinkSpec, MacError, MacResolver, TopologyError, TopologyRegistry,
};
pub use wmediumd::{render_config, RenderError};
