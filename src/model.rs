//! Value types returned by the public API: `Device` and `ResponseCode`.

use std::fmt;

use crate::mac::MacAddress;

/// The parsed identity of a remote DCP station, assembled fresh from one
/// identify response. Unknown attributes remain empty strings (spec §3).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Device {
    pub name_of_station: String,
    pub mac: Option<MacAddress>,
    pub ip: String,
    pub netmask: String,
    pub gateway: String,
    pub family: String,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Device(name_of_station={}, MAC={}, IP={}, netmask={}, gateway={}, family={})",
            self.name_of_station,
            self.mac.map(|m| m.to_string()).unwrap_or_default(),
            self.ip,
            self.netmask,
            self.gateway,
            self.family,
        )
    }
}

const RESPONSE_MESSAGES: [&str; 7] = [
    "Code 00: Set successful",
    "Code 01: Option unsupported",
    "Code 02: Suboption unsupported or no DataSet available",
    "Code 03: Suboption not set",
    "Code 04: Resource Error",
    "Code 05: SET not possible by local reasons",
    "Code 06: In operation, SET not possible",
];

/// The outcome of a set/reset/blink request. `code == 0` means success;
/// every other value in `0..=6` is a fixed, human-readable failure (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseCode {
    pub code: u8,
}

impl ResponseCode {
    pub fn new(code: u8) -> Self {
        Self { code }
    }

    /// True iff the request succeeded (`code == 0`).
    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    pub fn message(&self) -> &'static str {
        RESPONSE_MESSAGES
            .get(self.code as usize)
            .copied()
            .unwrap_or("Code unknown: unrecognized return code")
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ResponseCode({})", self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_zero_is_truthy_and_success_message() {
        let rc = ResponseCode::new(0);
        assert!(rc.is_success());
        assert_eq!(rc.message(), "Code 00: Set successful");
    }

    #[test]
    fn nonzero_codes_are_falsy_with_fixed_messages() {
        let rc = ResponseCode::new(4);
        assert!(!rc.is_success());
        assert_eq!(rc.message(), "Code 04: Resource Error");
        assert_eq!(rc.to_string(), "ResponseCode(Code 04: Resource Error)");
    }

    #[test]
    fn device_defaults_to_empty_attributes() {
        let device = Device::default();
        assert_eq!(device.name_of_station, "");
        assert_eq!(device.ip, "");
        assert!(device.mac.is_none());
    }
}
