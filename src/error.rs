//! Error type returned by the public API façade.
//!
//! Malformed or truncated wire data encountered while parsing a candidate
//! response is never surfaced here — the engine treats it as "drop packet"
//! (see `codec`), logs it at debug level, and keeps polling.

/// Errors the public `Dcp` operations can return.
#[derive(Debug, thiserror::Error)]
pub enum DcpError {
    /// No local interface matches the host IP given at construction.
    #[error("no network interface found for host ip: {0}")]
    NotFound(String),

    /// Malformed MAC/IP input, a non-conforming station name, or a
    /// non-positive timeout.
    #[error("invalid argument: {0}")]
    Argument(String),

    /// No matching response arrived before the deadline.
    #[error("timed out waiting for a response")]
    Timeout,

    /// The underlying capture handle failed to open, filter, send, or receive.
    #[error("socket failure: {0}")]
    Socket(#[from] pcap::Error),
}
