//! DCP protocol unit: a 10-byte header followed by a block area.
//!
//! `frame_id(2) | service_id(1) | service_type(1) | xid(4) |
//! response_delay_or_reserved(2) | length(2) | block_area(length)`
//! All integers are big-endian.

use byteorder::{BigEndian, ByteOrder};

use super::block::BlockRequest;

pub const HEADER_LENGTH: usize = 10;

/// A parsed DCP packet borrowing its block area from the underlying buffer.
///
/// Returned by [`parse`]; malformed or truncated input is represented by
/// `parse` returning `None`, never by a panic — the engine treats this as
/// "drop packet" (spec §4.1 / §7).
#[derive(Debug, Clone, Copy)]
pub struct DcpPacket<'a> {
    pub frame_id: u16,
    pub service_id: u8,
    pub service_type: u8,
    pub xid: u32,
    pub response_delay: u16,
    pub length: u16,
    pub block_area: &'a [u8],
}

pub fn parse(data: &[u8]) -> Option<DcpPacket<'_>> {
    if data.len() < HEADER_LENGTH {
        return None;
    }
    let length = BigEndian::read_u16(&data[8..10]);
    let block_area_end = (HEADER_LENGTH + length as usize).min(data.len());

    Some(DcpPacket {
        frame_id: BigEndian::read_u16(&data[0..2]),
        service_id: data[2],
        service_type: data[3],
        xid: BigEndian::read_u32(&data[4..8]),
        response_delay: BigEndian::read_u16(&data[8..10]),
        length,
        block_area: &data[HEADER_LENGTH..block_area_end],
    })
}

/// Serialize a DCP request: header followed by a single block.
///
/// `response_delay` is meaningful only for multicast identify requests
/// (spec §3); unicast requests pass 0 or [`crate::constants::RESPONSE_DELAY_UNICAST`].
pub fn serialize_request(
    frame_id: u16,
    service_id: u8,
    service_type: u8,
    xid: u32,
    response_delay: u16,
    block: &BlockRequest,
) -> Vec<u8> {
    let block_bytes = block.serialize();

    let mut out = Vec::with_capacity(HEADER_LENGTH + block_bytes.len());
    let mut buf2 = [0u8; 2];

    BigEndian::write_u16(&mut buf2, frame_id);
    out.extend_from_slice(&buf2);
    out.push(service_id);
    out.push(service_type);

    let mut buf4 = [0u8; 4];
    BigEndian::write_u32(&mut buf4, xid);
    out.extend_from_slice(&buf4);

    BigEndian::write_u16(&mut buf2, response_delay);
    out.extend_from_slice(&buf2);

    BigEndian::write_u16(&mut buf2, block_bytes.len() as u16);
    out.extend_from_slice(&buf2);

    out.extend_from_slice(&block_bytes);
    out
}
