//! The protocol engine: owns the capture handle, the XID counter, and the
//! seven administrative operations exposed as the public API façade.

use std::net::IpAddr;
use std::time::{Duration, Instant};

use crate::codec::{dcp, ethernet, BlockIter, BlockRequest};
use crate::constants::{
    self, FrameId, ServiceId, ServiceType, OPTION_ALL, OPTION_BLINK_LED, OPTION_CONTROL,
    OPTION_DEVICE_FAMILY, OPTION_IP_ADDRESS, OPTION_NAME_OF_STATION, OPTION_RESET_TO_FACTORY,
};
use crate::error::DcpError;
use crate::iface;
use crate::l2socket::{L2Socket, PacketSocket};
use crate::mac::MacAddress;
use crate::model::{Device, ResponseCode};
use crate::util;

/// Construction parameters for [`Dcp`] (spec §9 "Configuration").
#[derive(Debug, Clone)]
pub struct DcpConfig {
    /// Host IP used to select the local network interface.
    pub host_ip: IpAddr,
    /// Deadline for a single unicast request/response transaction.
    pub default_timeout: Duration,
    /// How long `identify_all` collects responses for.
    pub identify_all_timeout: Duration,
    /// Settling time between sending a set request and polling for its response.
    pub waiting_time: Duration,
}

impl DcpConfig {
    /// All three durations default to 7 seconds, matching the original
    /// client's `timeout=7` default.
    pub fn new(host_ip: IpAddr) -> Self {
        let default = Duration::from_secs(7);
        Self {
            host_ip,
            default_timeout: default,
            identify_all_timeout: default,
            waiting_time: default,
        }
    }
}

/// A DCP client bound to one local interface. Owns its capture handle
/// exclusively; not designed for concurrent use from multiple threads
/// (spec §5) — a caller that needs shared access should serialize callers
/// behind a `Mutex<Dcp>` rather than share `&Dcp` across threads.
pub struct Dcp {
    socket: L2Socket,
    src_mac: MacAddress,
    xid: u32,
    config: DcpConfig,
}

impl Dcp {
    /// Construct a new engine bound to the interface owning `host_ip`,
    /// with the spec's default timeouts.
    pub fn new(host_ip: IpAddr) -> Result<Self, DcpError> {
        Self::with_config(DcpConfig::new(host_ip))
    }

    pub fn with_config(config: DcpConfig) -> Result<Self, DcpError> {
        if config.default_timeout.is_zero() || config.identify_all_timeout.is_zero() {
            return Err(DcpError::Argument("timeout must be positive".to_string()));
        }

        let (src_mac, interface_name) = iface::resolve(config.host_ip)?;
        let socket = L2Socket::open(&interface_name, src_mac, constants::ETHER_TYPE)?;
        let xid = rand::random::<u32>();

        tracing::info!(interface = %interface_name, mac = %src_mac, "dcp engine initialized");

        Ok(Self { socket, src_mac, xid, config })
    }

    /// Identify one device by MAC address. Fails with [`DcpError::Timeout`]
    /// if it does not answer within `default_timeout`.
    pub fn identify(&mut self, mac: MacAddress) -> Result<Device, DcpError> {
        tracing::info!(%mac, "dcp identify");
        self.send_request(
            mac,
            FrameId::IdentifyRequest,
            ServiceId::Identify,
            OPTION_ALL.0,
            OPTION_ALL.1,
            Vec::new(),
            constants::RESPONSE_DELAY_UNICAST,
        )?;

        self.await_device(self.config.default_timeout)
            .ok_or(DcpError::Timeout)
    }

    /// Multicast discovery. Collects every valid response for the full
    /// duration of `timeout` (or `identify_all_timeout` if `None`) — an
    /// empty list is a legitimate result, never a timeout error, since the
    /// number of devices on the segment is unknown a priori.
    pub fn identify_all(&mut self, timeout: Option<Duration>) -> Result<Vec<Device>, DcpError> {
        let timeout = timeout.unwrap_or(self.config.identify_all_timeout);
        tracing::info!(?timeout, "dcp identify_all");

        self.send_request(
            MacAddress::from_octets(constants::PROFINET_MULTICAST_MAC_IDENTIFY),
            FrameId::IdentifyRequest,
            ServiceId::Identify,
            OPTION_ALL.0,
            OPTION_ALL.1,
            Vec::new(),
            constants::RESPONSE_DELAY_MULTICAST,
        )?;

        let deadline = Instant::now() + timeout;
        let xid = self.xid;
        let src_mac = self.src_mac;
        Ok(poll_all(&mut self.socket, deadline, |raw| {
            consume_device_response(raw, src_mac, xid)
        }))
    }

    /// Get the IP address of a device. Fails with [`DcpError::Timeout`] on silence.
    pub fn get_ip_address(&mut self, mac: MacAddress) -> Result<String, DcpError> {
        Ok(self.get(mac, OPTION_IP_ADDRESS)?.ip)
    }

    /// Get the name of station of a device. Fails with [`DcpError::Timeout`] on silence.
    pub fn get_name_of_station(&mut self, mac: MacAddress) -> Result<String, DcpError> {
        Ok(self.get(mac, OPTION_NAME_OF_STATION)?.name_of_station)
    }

    /// Set a device's IP configuration. After transmission, sleeps
    /// `waiting_time` to allow the device to commit before polling for
    /// the set-response.
    pub fn set_ip_address(
        &mut self,
        mac: MacAddress,
        ip: &str,
        netmask: &str,
        gateway: &str,
    ) -> Result<ResponseCode, DcpError> {
        let ip = util::parse_ipv4(ip)?;
        let netmask = util::parse_ipv4(netmask)?;
        let gateway = util::parse_ipv4(gateway)?;

        let mut value = constants::block_qualifier::STORE_PERMANENT.to_vec();
        value.extend_from_slice(&util::pack_ipv4(ip));
        value.extend_from_slice(&util::pack_ipv4(netmask));
        value.extend_from_slice(&util::pack_ipv4(gateway));

        tracing::info!(%mac, %ip, %netmask, %gateway, "dcp set_ip_address");
        self.send_request(
            mac,
            FrameId::GetSet,
            ServiceId::Set,
            OPTION_IP_ADDRESS.0,
            OPTION_IP_ADDRESS.1,
            value,
            constants::RESPONSE_DELAY_UNICAST,
        )?;

        std::thread::sleep(self.config.waiting_time);
        self.await_set_response(mac)
    }

    /// Set a device's name of station. Rejects non-conforming names with
    /// [`DcpError::Argument`] before any I/O takes place (spec P7 / S4).
    pub fn set_name_of_station(&mut self, mac: MacAddress, name: &str) -> Result<ResponseCode, DcpError> {
        let name = normalize_station_name(name)?;

        let mut value = constants::block_qualifier::STORE_PERMANENT.to_vec();
        value.extend_from_slice(name.as_bytes());

        tracing::info!(%mac, %name, "dcp set_name_of_station");
        self.send_request(
            mac,
            FrameId::GetSet,
            ServiceId::Set,
            OPTION_NAME_OF_STATION.0,
            OPTION_NAME_OF_STATION.1,
            value,
            constants::RESPONSE_DELAY_UNICAST,
        )?;

        std::thread::sleep(self.config.waiting_time);
        self.await_set_response(mac)
    }

    /// Ask a device to flash its LEDs. No settling sleep (spec §4.4).
    pub fn blink(&mut self, mac: MacAddress) -> Result<ResponseCode, DcpError> {
        let mut value = constants::block_qualifier::RESERVED.to_vec();
        value.extend_from_slice(&constants::LED_BLINK_VALUE);

        tracing::info!(%mac, "dcp blink");
        self.send_request(
            mac,
            FrameId::GetSet,
            ServiceId::Set,
            OPTION_BLINK_LED.0,
            OPTION_BLINK_LED.1,
            value,
            constants::RESPONSE_DELAY_UNICAST,
        )?;

        self.await_set_response(mac)
    }

    /// Reset a device's communication parameters to factory defaults.
    /// No settling sleep (spec §4.4).
    pub fn reset_to_factory(&mut self, mac: MacAddress) -> Result<ResponseCode, DcpError> {
        let value = constants::block_qualifier::RESET_COMMUNICATION.to_vec();

        tracing::info!(%mac, "dcp reset_to_factory");
        self.send_request(
            mac,
            FrameId::GetSet,
            ServiceId::Set,
            OPTION_RESET_TO_FACTORY.0,
            OPTION_RESET_TO_FACTORY.1,
            value,
            constants::RESPONSE_DELAY_UNICAST,
        )?;

        self.await_set_response(mac)
    }

    fn get(&mut self, mac: MacAddress, option: (u8, u8)) -> Result<Device, DcpError> {
        tracing::info!(%mac, option = ?option, "dcp get");
        self.send_request(
            mac,
            FrameId::GetSet,
            ServiceId::Get,
            option.0,
            option.1,
            Vec::new(),
            constants::RESPONSE_DELAY_UNICAST,
        )?;

        self.await_device(self.config.default_timeout)
            .ok_or(DcpError::Timeout)
    }

    fn await_device(&mut self, timeout: Duration) -> Option<Device> {
        let deadline = Instant::now() + timeout;
        let xid = self.xid;
        let src_mac = self.src_mac;
        poll_one(&mut self.socket, deadline, |raw| consume_device_response(raw, src_mac, xid))
    }

    fn await_set_response(&mut self, mac: MacAddress) -> Result<ResponseCode, DcpError> {
        let deadline = Instant::now() + self.config.default_timeout;
        let xid = self.xid;
        let src_mac = self.src_mac;

        let response = poll_one(&mut self.socket, deadline, |raw| consume_response_code(raw, src_mac, xid))
            .ok_or(DcpError::Timeout)?;

        if !response.is_success() {
            tracing::debug!(%mac, message = response.message(), "set request rejected");
        }
        Ok(response)
    }

    /// Increment the XID, build one block, wrap it in a DCP packet and an
    /// Ethernet frame, and transmit (spec §4.4).
    fn send_request(
        &mut self,
        dst_mac: MacAddress,
        frame_id: FrameId,
        service_id: ServiceId,
        option: u8,
        suboption: u8,
        value: Vec<u8>,
        response_delay: u16,
    ) -> Result<(), DcpError> {
        self.xid = next_xid(self.xid);

        let block = BlockRequest::new(option, suboption, value);
        let dcp_bytes = dcp::serialize_request(
            frame_id as u16,
            service_id as u8,
            ServiceType::Request as u8,
            self.xid,
            response_delay,
            &block,
        );
        let frame = ethernet::serialize(dst_mac, self.src_mac, constants::ETHER_TYPE, &dcp_bytes);

        self.socket.send(&frame)
    }
}

/// Each request gets a fresh, monotonically advancing XID so a stray
/// response to an earlier request can never be mistaken for the answer
/// to a later one (spec P4). Wraps on overflow rather than panicking —
/// a 32-bit counter wrapping after ~4 billion requests is not a
/// realistic concern for one process's lifetime.
fn next_xid(current: u32) -> u32 {
    current.wrapping_add(1)
}

/// Validate and lowercase a station name per the DNS-like grammar (spec P7 /
/// S4), rejecting before any I/O takes place. Pulled out as its own
/// function, independent of `Dcp`, so the rejection path is unit-testable
/// without a live socket — see the `set_name_of_station` tests below.
fn normalize_station_name(name: &str) -> Result<String, DcpError> {
    if !util::is_valid_station_name(name) {
        return Err(DcpError::Argument(format!(
            "station name must match ^[a-z][a-zA-Z0-9\\-.]*$: {name}"
        )));
    }
    Ok(name.to_lowercase())
}

/// Poll `socket` until either `consume` accepts a received frame or
/// `deadline` passes. Generic over [`PacketSocket`] rather than the
/// concrete `L2Socket` so this — the heart of every unicast operation's
/// timeout behavior (spec S5) and of `identify_all`'s collection window
/// (spec B3) — can be driven against a fake in unit tests without a live NIC.
fn poll_one<S: PacketSocket, R>(socket: &mut S, deadline: Instant, mut consume: impl FnMut(&[u8]) -> Option<R>) -> Option<R> {
    while Instant::now() < deadline {
        if let Some(raw) = socket.recv() {
            if let Some(result) = consume(&raw) {
                return Some(result);
            }
        }
    }
    None
}

/// Like [`poll_one`], but never returns early: every matching frame is
/// accumulated until `deadline` passes (spec §4.4 "the engine does NOT stop
/// after the first response"), which is what makes `identify_all`'s
/// multi-responder collection (spec S2) testable without a live NIC.
fn poll_all<S: PacketSocket, R>(socket: &mut S, deadline: Instant, mut consume: impl FnMut(&[u8]) -> Option<R>) -> Vec<R> {
    let mut results = Vec::new();
    while Instant::now() < deadline {
        if let Some(raw) = socket.recv() {
            if let Some(result) = consume(&raw) {
                results.push(result);
            }
        }
    }
    results
}

/// True iff `raw` is a DCP response addressed to `self_mac` for transaction `xid`
/// (spec P5: destination MAC, EtherType, service_type, and XID must all match).
fn frame_matches(raw: &[u8], self_mac: MacAddress, xid: u32) -> Option<(ethernet::EthernetPacket<'_>, dcp::DcpPacket<'_>)> {
    let eth = ethernet::parse(raw)?;
    if eth.destination != self_mac || eth.ether_type != constants::ETHER_TYPE {
        tracing::debug!("dropping frame: destination or ether_type mismatch");
        return None;
    }

    let dcp_packet = dcp::parse(eth.payload)?;
    if dcp_packet.service_type != ServiceType::Response as u8 || dcp_packet.xid != xid {
        tracing::debug!(
            service_type = dcp_packet.service_type,
            xid = dcp_packet.xid,
            expected_xid = xid,
            "dropping frame: service_type or xid mismatch"
        );
        return None;
    }

    Some((eth, dcp_packet))
}

/// Consume one already-received frame as a candidate identify/get response,
/// producing a [`Device`]. A pure function so it can be exercised without a
/// live capture handle (spec §3.4 test tooling, scenarios S1/S2/B2).
fn consume_device_response(raw: &[u8], self_mac: MacAddress, xid: u32) -> Option<Device> {
    let (eth, dcp_packet) = frame_matches(raw, self_mac, xid)?;
    Some(device_from_blocks(dcp_packet.block_area, eth.source))
}

/// Consume one already-received frame as a candidate set-response,
/// producing a [`ResponseCode`]. Per spec §4.4 the engine reads only the
/// first block and requires it to be the "Control" block (option 5); any
/// other layout is logged and dropped rather than silently misreported,
/// since the caller's call site expects a `ResponseCode`, not a `Device`
/// (spec §9 "tagged result instead of polymorphism" — see DESIGN.md).
fn consume_response_code(raw: &[u8], self_mac: MacAddress, xid: u32) -> Option<ResponseCode> {
    let (_eth, dcp_packet) = frame_matches(raw, self_mac, xid)?;
    let first_block = BlockIter::new(dcp_packet.block_area).next()?;
    let return_code_offset = constants::CONTROL_BLOCK_RETURN_CODE_OFFSET - 4;

    if first_block.option != OPTION_CONTROL || first_block.payload.len() <= return_code_offset {
        tracing::warn!(
            option = first_block.option,
            "set-response's first block is not a well-formed Control block"
        );
        return None;
    }

    Some(ResponseCode::new(first_block.payload[return_code_offset]))
}

fn device_from_blocks(block_area: &[u8], source_mac: MacAddress) -> Device {
    let mut device = Device {
        mac: Some(source_mac),
        ..Default::default()
    };

    for block in BlockIter::new(block_area) {
        match (block.option, block.suboption) {
            OPTION_NAME_OF_STATION => {
                device.name_of_station = decode_ascii_rstrip_nul(block.payload);
            }
            OPTION_IP_ADDRESS if block.payload.len() >= 12 => {
                device.ip = util::format_ipv4(&block.payload[0..4]);
                device.netmask = util::format_ipv4(&block.payload[4..8]);
                device.gateway = util::format_ipv4(&block.payload[8..12]);
            }
            OPTION_DEVICE_FAMILY => {
                device.family = decode_ascii_rstrip_nul(block.payload);
            }
            _ => {
                tracing::debug!(option = block.option, suboption = block.suboption, "skipping unrecognized block");
            }
        }
    }

    device
}

fn decode_ascii_rstrip_nul(payload: &[u8]) -> String {
    let end = payload.iter().rposition(|&b| b != 0).map(|i| i + 1).unwrap_or(0);
    String::from_utf8_lossy(&payload[..end]).into_owned()
}
