//! Raw layer-2 capture bound to a named interface, filtered to DCP traffic
//! addressed to this host.
//!
//! The OS-appropriate capture primitive (AF_PACKET on Linux, BPF on
//! BSD/macOS, Npcap on Windows) is chosen by `pcap` itself and is
//! invisible to the protocol engine (spec §4.2).

use crate::error::DcpError;
use crate::mac::MacAddress;

/// Read timeout passed to the underlying capture handle. `recv` surfaces
/// `Ok(None)` rather than blocking past this, so the engine can implement
/// deadline-driven polling (spec §4.2, §5).
const READ_TIMEOUT_MS: i32 = 100;

/// The send/recv surface the engine's deadline-polling loop actually needs.
/// Exists so `poll_one`/`poll_all` in `engine.rs` can run against a fake in
/// unit tests instead of requiring a live capture handle.
pub(crate) trait PacketSocket {
    fn send(&mut self, frame: &[u8]) -> Result<(), DcpError>;
    fn recv(&mut self) -> Option<Vec<u8>>;
}

pub struct L2Socket {
    capture: pcap::Capture<pcap::Active>,
}

impl L2Socket {
    /// Open `interface_name` for DCP traffic, installing a kernel-level
    /// filter equivalent to "Ethernet destination == src_mac AND ether
    /// type == DCP" so unrelated traffic never reaches user space.
    pub fn open(interface_name: &str, src_mac: MacAddress, ether_type: u16) -> Result<Self, DcpError> {
        let device = pcap::Device::list()
            .map_err(DcpError::Socket)?
            .into_iter()
            .find(|d| d.name == interface_name)
            .ok_or_else(|| DcpError::NotFound(interface_name.to_string()))?;

        let mut capture = pcap::Capture::from_device(device)
            .map_err(DcpError::Socket)?
            .promisc(false)
            .immediate_mode(true)
            .timeout(READ_TIMEOUT_MS)
            .open()
            .map_err(DcpError::Socket)?;

        let filter_expr = format!("ether dst {src_mac} and ether proto 0x{ether_type:04x}");
        capture.filter(&filter_expr, true).map_err(DcpError::Socket)?;

        Ok(Self { capture })
    }

    /// Transmit the full frame synchronously.
    pub fn send(&mut self, frame: &[u8]) -> Result<(), DcpError> {
        self.capture.sendpacket(frame).map_err(DcpError::Socket)
    }

    /// Return the next buffered frame, or `None` if nothing arrived within
    /// the read timeout. Never blocks past `READ_TIMEOUT_MS`.
    pub fn recv(&mut self) -> Option<Vec<u8>> {
        match self.capture.next_packet() {
            Ok(packet) => Some(packet.data.to_vec()),
            Err(pcap::Error::TimeoutExpired) => None,
            Err(err) => {
                tracing::warn!(%err, "l2 socket recv error");
                None
            }
        }
    }
}

impl PacketSocket for L2Socket {
    fn send(&mut self, frame: &[u8]) -> Result<(), DcpError> {
        L2Socket::send(self, frame)
    }

    fn recv(&mut self) -> Option<Vec<u8>> {
        L2Socket::recv(self)
    }
}
