//! wmediumd configuration rendering.
//!
//! This module renders a finalized topology into the structured-text config
//! file wmediumd consumes. The output grammar is the wire contract with the
//! simulator's parser and is reproduced byte for byte:
//!
//! ```text
//! ifaces :
//! {
//!     ids = ["02:00:00:00:01:00", "02:00:00:00:02:00"];
//!     links = (
//!         (0, 1, 15),
//!         (1, 0, 15)
//!     );
//! }
//! ```
//!
//! `ids` lists the MAC address of every managed interface; the position of a
//! MAC within the list is the index the `links` tuples refer to, fixed by the
//! interface's registration order.

use crate::topology::{InterfaceRef, LinkSpec, MacError, MacResolver};
use std::collections::HashMap;

/// Default name of the simulator binary
pub const DEFAULT_EXECUTABLE: &str = "wmediumd";

/// Errors produced while rendering the wmediumd config
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Mac(#[from] MacError),

    /// A link endpoint identifier that never got an index in the `ids` list.
    /// Node-level link validation can let these through; rendering is where
    /// the per-interface invariant is enforced.
    #[error("link endpoint {id} is not a registered interface")]
    UnknownEndpoint { id: String },
}

/// Render the config document for the given interfaces and links.
///
/// `interfaces` must be in registration order; each link tuple references
/// its endpoints by position in that sequence. MAC addresses are resolved
/// through `resolver` (and cached on the references) as the `ids` list is
/// emitted.
pub fn render_config(
    interfaces: &[InterfaceRef],
    links: &[LinkSpec],
    resolver: &dyn MacResolver,
) -> Result<Vec<u8>, RenderError> {
    let mut positions: HashMap<String, usize> = HashMap::new();

    let mut config = String::from("ifaces :\n{\n\tids = [");
    for (index, intfref) in interfaces.iter().enumerate() {
        if index != 0 {
            config.push_str(", ");
        }
        let mac = intfref.mac(resolver)?;
        config.push('"');
        config.push_str(mac);
        config.push('"');
        positions.insert(intfref.identifier(), index);
    }
    config.push_str("];\n\tlinks = (");

    for (index, link) in links.iter().enumerate() {
        if index != 0 {
            config.push(',');
        }
        let sta1_pos = lookup(&positions, link.sta1())?;
        let sta2_pos = lookup(&positions, link.sta2())?;
        config.push_str(&format!("\n\t\t({}, {}, {})", sta1_pos, sta2_pos, link.snr()));
    }
    config.push_str("\n\t);\n}");

    Ok(config.into_bytes())
}

fn lookup(positions: &HashMap<String, usize>, endpoint: &InterfaceRef) -> Result<usize, RenderError> {
    positions
        .get(&endpoint.identifier())
        .copied()
        .ok_or_else(|| RenderError::UnknownEndpoint {
            id: endpoint.identifier(),
        })
}
