//! DCP block (TLV) encoding and decoding.
//!
//! Each block is `option(1) | suboption(1) | length(2, BE) | payload(length)`,
//! padded to an even total length on the wire. The pad byte is never counted
//! in `length`.

use byteorder::{BigEndian, ByteOrder};

/// One parsed block from a received DCP payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    pub option: u8,
    pub suboption: u8,
    pub payload: &'a [u8],
}

/// Iterates the blocks in a DCP block area, advancing by `4 + length +
/// (length % 2)` bytes per block and stopping once fewer than 7 bytes
/// remain, per spec (`declared_length <= 6` in the current wire format).
pub struct BlockIter<'a> {
    remaining: &'a [u8],
}

impl<'a> BlockIter<'a> {
    pub fn new(block_area: &'a [u8]) -> Self {
        Self {
            remaining: block_area,
        }
    }
}

impl<'a> Iterator for BlockIter<'a> {
    type Item = Block<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining.len() <= 6 {
            return None;
        }
        let option = self.remaining[0];
        let suboption = self.remaining[1];
        let length = BigEndian::read_u16(&self.remaining[2..4]) as usize;
        let padded_length = length + (length % 2);

        if self.remaining.len() < 4 + length {
            // Truncated block: drop the remainder rather than panic.
            self.remaining = &[];
            return None;
        }

        let payload = &self.remaining[4..4 + length];
        let advance = (4 + padded_length).min(self.remaining.len());
        self.remaining = &self.remaining[advance..];

        Some(Block { option, suboption, payload })
    }
}

/// A block built for transmission: a request carries an optional
/// 2-byte qualifier ahead of its value (set/reset/blink), or an empty
/// payload (get/identify).
pub struct BlockRequest {
    pub option: u8,
    pub suboption: u8,
    pub payload: Vec<u8>,
}

impl BlockRequest {
    pub fn new(option: u8, suboption: u8, payload: Vec<u8>) -> Self {
        Self { option, suboption, payload }
    }

    pub fn empty(option: u8, suboption: u8) -> Self {
        Self::new(option, suboption, Vec::new())
    }

    /// Serialize as `option | suboption | length(BE) | payload | pad?`.
    pub fn serialize(&self) -> Vec<u8> {
        let length = self.payload.len();
        let mut out = Vec::with_capacity(4 + length + (length % 2));
        out.push(self.option);
        out.push(self.suboption);
        let mut len_buf = [0u8; 2];
        BigEndian::write_u16(&mut len_buf, length as u16);
        out.extend_from_slice(&len_buf);
        out.extend_from_slice(&self.payload);
        if length % 2 == 1 {
            out.push(0);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_then_parse_round_trips_a_single_block() {
        let req = BlockRequest::new(0x02, 0x02, b"plc1".to_vec());
        let bytes = req.serialize();

        let mut iter = BlockIter::new(&bytes);
        let block = iter.next().expect("one block");
        assert_eq!(block.option, 0x02);
        assert_eq!(block.suboption, 0x02);
        assert_eq!(block.payload, b"plc1");
        assert!(iter.next().is_none());
    }

    #[test]
    fn odd_length_payload_is_padded_and_skipped() {
        let req = BlockRequest::new(0x02, 0x02, b"abc".to_vec());
        let bytes = req.serialize();
        assert_eq!(bytes.len(), 4 + 3 + 1); // one pad byte

        let mut iter = BlockIter::new(&bytes);
        let block = iter.next().unwrap();
        assert_eq!(block.payload, b"abc");
        assert!(iter.next().is_none());
    }

    #[test]
    fn iterates_exactly_n_blocks_for_n_declared_lengths() {
        let mut buf = Vec::new();
        let lens = [3usize, 4, 0, 5];
        for (i, &len) in lens.iter().enumerate() {
            let payload = vec![i as u8; len];
            buf.extend(BlockRequest::new(i as u8, 0, payload).serialize());
        }

        let count = BlockIter::new(&buf).count();
        assert_eq!(count, lens.len());
    }

    #[test]
    fn stops_when_six_or_fewer_bytes_remain() {
        let tail = [0x05u8, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert!(BlockIter::new(&tail).next().is_none());
    }

    #[test]
    fn empty_request_has_zero_length_and_no_pad() {
        let req = BlockRequest::empty(0xFF, 0xFF);
        let bytes = req.serialize();
        assert_eq!(bytes, vec![0xFF, 0xFF, 0x00, 0x00]);
    }
}
