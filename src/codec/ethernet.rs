//! Ethernet II framing: `destination(6) | source(6) | ether_type(2) | payload`.
//!
//! No VLAN tag handling and no trailer/CRC — the NIC/OS owns the latter.

use byteorder::{BigEndian, ByteOrder};

use crate::mac::MacAddress;

pub const HEADER_LENGTH: usize = 14;

/// A parsed Ethernet frame borrowing its payload from the underlying buffer.
#[derive(Debug, Clone, Copy)]
pub struct EthernetPacket<'a> {
    pub destination: MacAddress,
    pub source: MacAddress,
    pub ether_type: u16,
    pub payload: &'a [u8],
}

pub fn parse(data: &[u8]) -> Option<EthernetPacket<'_>> {
    if data.len() < HEADER_LENGTH {
        return None;
    }
    Some(EthernetPacket {
        destination: MacAddress::from_slice(&data[0..6])?,
        source: MacAddress::from_slice(&data[6..12])?,
        ether_type: BigEndian::read_u16(&data[12..14]),
        payload: &data[HEADER_LENGTH..],
    })
}

pub fn serialize(destination: MacAddress, source: MacAddress, ether_type: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LENGTH + payload.len());
    out.extend_from_slice(&destination.octets());
    out.extend_from_slice(&source.octets());

    let mut buf = [0u8; 2];
    BigEndian::write_u16(&mut buf, ether_type);
    out.extend_from_slice(&buf);

    out.extend_from_slice(payload);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emitted_length_is_header_plus_payload() {
        let dst = MacAddress::from_octets([1, 2, 3, 4, 5, 6]);
        let src = MacAddress::from_octets([6, 5, 4, 3, 2, 1]);
        let payload = vec![0xAB; 20];

        let bytes = serialize(dst, src, 0x8892, &payload);
        assert_eq!(bytes.len(), HEADER_LENGTH + 20);
    }

    #[test]
    fn parse_recovers_addresses_and_ether_type() {
        let dst = MacAddress::from_octets([0xaa; 6]);
        let src = MacAddress::from_octets([0xbb; 6]);
        let bytes = serialize(dst, src, 0x8892, b"hi");

        let frame = parse(&bytes).unwrap();
        assert_eq!(frame.destination, dst);
        assert_eq!(frame.source, src);
        assert_eq!(frame.ether_type, 0x8892);
        assert_eq!(frame.payload, b"hi");
    }

    #[test]
    fn parse_rejects_truncated_header() {
        let short = [0u8; 13];
        assert!(parse(&short).is_none());
    }
}
