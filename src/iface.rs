//! Selects the local network interface that owns a given host IP.

use std::net::IpAddr;

use crate::error::DcpError;
use crate::mac::MacAddress;

/// Resolve `host_ip` to the MAC address and OS interface name of the
/// local interface that owns it.
///
/// IPv4 addresses must match exactly; IPv6 addresses are matched by
/// prefix to accommodate zone-id suffixes (spec §4.3).
pub fn resolve(host_ip: IpAddr) -> Result<(MacAddress, String), DcpError> {
    let devices = pcap::Device::list().map_err(DcpError::Socket)?;

    for device in &devices {
        let matches = device.addresses.iter().any(|addr| match (addr.addr, host_ip) {
            (IpAddr::V4(found), IpAddr::V4(wanted)) => found == wanted,
            (IpAddr::V6(found), IpAddr::V6(wanted)) => {
                found.to_string().starts_with(&wanted.to_string())
            }
            _ => false,
        });

        if !matches {
            continue;
        }

        return match mac_address::mac_address_by_name(&device.name) {
            Ok(Some(mac)) => Ok((MacAddress::from_octets(mac.bytes()), device.name.clone())),
            Ok(None) => {
                tracing::warn!(
                    interface = %device.name,
                    "matched interface for {host_ip} has no link-layer address"
                );
                continue;
            }
            Err(err) => {
                tracing::warn!(interface = %device.name, %err, "failed to read MAC address");
                continue;
            }
        };
    }

    Err(DcpError::NotFound(host_ip.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv6_prefix_match_allows_zone_id_suffix() {
        let found: std::net::Ipv6Addr = "fe80::1".parse().unwrap();
        let wanted: std::net::Ipv6Addr = "fe80::1".parse().unwrap();
        assert!(found.to_string().starts_with(&wanted.to_string()));
    }
}
