//! Command line front end for the Profinet DCP engine.
//!
//! Mirrors the subcommand layout of the original `dcp_utility` script:
//! one subcommand per engine operation, a shared `--host`/`--timeout`,
//! and a MAC address positional argument where the operation needs one.

use std::net::{IpAddr, UdpSocket};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};

use profinet_dcp::{Dcp, DcpConfig, DcpError, MacAddress};

#[derive(Parser)]
#[command(name = "dcp-cli", about = "A command line utility to interface with devices compatible with Profinet DCP")]
struct Cli {
    /// IP address of the host interface to send/receive on (defaults to the
    /// outbound interface toward a well-known unreachable address).
    #[arg(long)]
    host: Option<IpAddr>,

    /// How long to wait for response messages, in seconds.
    #[arg(long, default_value_t = 7)]
    timeout: u64,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Send a DCP Identify request to a single target MAC address.
    IdOne { mac: MacAddress },
    /// Broadcast a DCP Identify All request on the subnet.
    IdAll,
    /// Get the IP address of a target.
    GetIp { mac: MacAddress },
    /// Set the IP configuration of a target.
    SetIp { mac: MacAddress, ip: String, subnet: String, gateway: String },
    /// Get the name of station of a target.
    GetName { mac: MacAddress },
    /// Set the name of station of a target.
    SetName { mac: MacAddress, name: String },
    /// Reset a target's communication parameters to factory defaults.
    Reset { mac: MacAddress },
    /// Ask a target to flash its LEDs.
    Blink { mac: MacAddress },
}

/// Finds the address of the local interface that would be used to reach the
/// outside world, by the traditional "connect a UDP socket and read its
/// local address back" trick.
fn default_host_ip() -> IpAddr {
    UdpSocket::bind("0.0.0.0:0")
        .and_then(|socket| {
            socket.connect("10.254.254.254:1")?;
            socket.local_addr()
        })
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::V4(std::net::Ipv4Addr::LOCALHOST))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.timeout < 1 {
        eprintln!("timeout must be >= 1");
        return ExitCode::from(2);
    }

    let host = cli.host.unwrap_or_else(default_host_ip);
    let mut config = DcpConfig::new(host);
    let timeout = Duration::from_secs(cli.timeout);
    config.default_timeout = timeout;
    config.identify_all_timeout = timeout;
    config.waiting_time = timeout;

    let mut dcp = match Dcp::with_config(config) {
        Ok(dcp) => dcp,
        Err(err) => {
            eprintln!("failed to initialize dcp engine: {err}");
            return ExitCode::from(2);
        }
    };

    let result = run(&mut dcp, cli.action);
    println!("done");
    result
}

fn run(dcp: &mut Dcp, action: Action) -> ExitCode {
    match action {
        Action::IdAll => {
            println!("sending dcp identify all request");
            println!("awaiting responses...");
            match dcp.identify_all(None) {
                Ok(devices) => {
                    for device in devices {
                        println!("{device}");
                    }
                    ExitCode::SUCCESS
                }
                Err(err) => report(err),
            }
        }
        Action::IdOne { mac } => {
            println!("sending dcp identify request to {mac}");
            println!("awaiting response from {mac}");
            report_result(dcp.identify(mac))
        }
        Action::GetIp { mac } => {
            println!("requesting ip address from {mac}");
            println!("awaiting response from {mac}");
            report_result(dcp.get_ip_address(mac))
        }
        Action::SetIp { mac, ip, subnet, gateway } => {
            println!("sending command to set ip config of device {mac} to IP:{ip}, SUB:{subnet}, GW:{gateway}");
            println!("awaiting response from {mac}");
            report_result(dcp.set_ip_address(mac, &ip, &subnet, &gateway))
        }
        Action::GetName { mac } => {
            println!("sending command to get name of device {mac}");
            println!("awaiting response from {mac}");
            report_result(dcp.get_name_of_station(mac))
        }
        Action::SetName { mac, name } => {
            println!("sending command to set name of device {mac} to {name}");
            println!("awaiting response from {mac}");
            report_result(dcp.set_name_of_station(mac, &name))
        }
        Action::Reset { mac } => {
            println!("sending command to reset device {mac} to factory defaults");
            println!("awaiting response from {mac}");
            report_result(dcp.reset_to_factory(mac))
        }
        Action::Blink { mac } => {
            println!("sending command to {mac} to flash its LEDs");
            println!("awaiting response from {mac}");
            report_result(dcp.blink(mac))
        }
    }
}

fn report_result<T: std::fmt::Display>(result: Result<T, DcpError>) -> ExitCode {
    match result {
        Ok(value) => {
            println!("{value}");
            ExitCode::SUCCESS
        }
        Err(err) => report(err),
    }
}

fn report(err: DcpError) -> ExitCode {
    match err {
        DcpError::Timeout => {
            println!("timeout occurred, no response received");
            ExitCode::from(1)
        }
        DcpError::Argument(_) => {
            eprintln!("{err}");
            ExitCode::from(2)
        }
        other => {
            eprintln!("{other}");
            ExitCode::from(2)
        }
    }
}
