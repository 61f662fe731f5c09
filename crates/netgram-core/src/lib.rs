#![warn(missing_docs)]

//! netgram-core: foundational types shared across the workspace.
//!
//! This crate provides the minimal set of core types the endpoint layer is
//! built on:
//! - Error taxonomy (the four reportable kinds plus structured failure detail)
//! - Endpoint configuration
//! - The transport abstraction the endpoint logic is written against
//!
//! The endpoint itself lives in `netgram-endpoint`; `netgram` is the public
//! facade.

/// Constants shared across layers.
pub mod constants {
    /// Default capacity of the buffer-returning receive, in bytes.
    ///
    /// One Ethernet MTU: a datagram larger than this is truncated by the
    /// transport unless the caller asks for a bigger buffer.
    pub const DEFAULT_RECV_CAPACITY: u16 = 1500;

    /// Address the remote-configuration and send-to operations treat as the
    /// conventional default destination.
    pub const LOOPBACK_ADDRESS: &str = "127.0.0.1";
}

/// Endpoint configuration fixed at construction time.
pub mod config;
/// Error types and results.
pub mod error;
/// Transport abstraction for pluggable I/O.
pub mod transport;

/// Raw platform socket handle, the escape hatch for low-level configuration
/// not otherwise exposed.
#[cfg(unix)]
pub type RawHandle = std::os::fd::RawFd;

/// Raw platform socket handle, the escape hatch for low-level configuration
/// not otherwise exposed.
#[cfg(windows)]
pub type RawHandle = std::os::windows::io::RawSocket;
