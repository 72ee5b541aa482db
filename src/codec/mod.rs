//! Pure wire codec: Ethernet framing, the DCP header, and DCP blocks.
//!
//! Nothing in this module performs I/O. Parse functions never panic on
//! malformed or truncated input; they return `None`, which the engine
//! treats as "drop this candidate frame".

pub mod block;
pub mod dcp;
pub mod ethernet;

pub use block::{Block, BlockIter, BlockRequest};
pub use dcp::DcpPacket;
pub use ethernet::EthernetPacket;
