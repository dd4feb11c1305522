//! Shared utilities: MAC address validation and live-interface inspection.

pub mod mac;

pub use mac::{extract_mac, is_valid_mac, NetnsMacResolver};
