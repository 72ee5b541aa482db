//! 48-bit hardware address, canonicalized to lowercase `:`-separated hex.

use std::fmt;
use std::str::FromStr;

use crate::error::DcpError;

#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct MacAddress {
    octets: [u8; 6],
}

impl MacAddress {
    pub const BROADCAST: MacAddress = MacAddress { octets: [0xff; 6] };

    pub fn from_octets(octets: [u8; 6]) -> Self {
        Self { octets }
    }

    pub fn octets(&self) -> [u8; 6] {
        self.octets
    }

    /// Parse a slice of exactly 6 bytes, as found at a fixed offset in an Ethernet header.
    pub fn from_slice(data: &[u8]) -> Option<Self> {
        let octets: [u8; 6] = data.try_into().ok()?;
        Some(Self { octets })
    }
}

impl fmt::Debug for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let [a, b, c, d, e, g] = self.octets;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

/// Accepts `aa:bb:cc:dd:ee:ff` or `aa-bb-cc-dd-ee-ff`, dashes normalized to colons (spec.md §6).
impl FromStr for MacAddress {
    type Err = DcpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.replace('-', ":");
        let mut octets = [0u8; 6];
        let mut parts = normalized.split(':');
        for octet in octets.iter_mut() {
            let part = parts
                .next()
                .ok_or_else(|| DcpError::Argument(format!("malformed MAC address: {s}")))?;
            *octet = u8::from_str_radix(part, 16)
                .map_err(|_| DcpError::Argument(format!("malformed MAC address: {s}")))?;
        }
        if parts.next().is_some() {
            return Err(DcpError::Argument(format!("malformed MAC address: {s}")));
        }
        Ok(Self { octets })
    }
}
