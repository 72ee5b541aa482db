//! IPv4 address packing helpers shared by the codec and the engine.

use std::net::Ipv4Addr;

use crate::error::DcpError;

pub fn pack_ipv4(addr: Ipv4Addr) -> [u8; 4] {
    addr.octets()
}

/// Render up to 4 bytes as dotted-decimal; returns an empty string if
/// fewer than 4 bytes are available (spec: "possibly empty" IP fields).
pub fn format_ipv4(bytes: &[u8]) -> String {
    match bytes {
        [a, b, c, d, ..] => format!("{a}.{b}.{c}.{d}"),
        _ => String::new(),
    }
}

pub fn parse_ipv4(s: &str) -> Result<Ipv4Addr, DcpError> {
    s.parse()
        .map_err(|_| DcpError::Argument(format!("malformed ipv4 address: {s}")))
}

/// `^[a-z][a-zA-Z0-9\-.]*$` — a DNS-like station name (spec §4.4, P7).
pub fn is_valid_station_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
}
