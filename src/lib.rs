//! Client-side PROFINET Discovery and Configuration Protocol (DCP) engine.
//!
//! Identifies and configures PROFINET devices on the local Ethernet
//! segment without any IP-layer dependency, by speaking DCP directly
//! over raw Layer 2 frames.
//!
//! ```no_run
//! use std::net::IpAddr;
//! use profinet_dcp::{Dcp, MacAddress};
//!
//! # fn main() -> Result<(), profinet_dcp::DcpError> {
//! let host_ip: IpAddr = "192.168.0.5".parse().unwrap();
//! let mut dcp = Dcp::new(host_ip)?;
//!
//! let devices = dcp.identify_all(None)?;
//! for device in devices {
//!     println!("{device}");
//! }
//! # Ok(())
//! # }
//! ```

mod codec;
mod constants;
mod engine;
mod error;
mod iface;
mod l2socket;
mod mac;
mod model;
mod util;

pub use engine::{Dcp, DcpConfig};
pub use error::DcpError;
pub use mac::MacAddress;
pub use model::{Device, ResponseCode};
