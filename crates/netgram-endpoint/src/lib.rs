#![warn(missing_docs)]

//! netgram-endpoint: a portable, thread-safe UDP endpoint.
//!
//! The [`UdpEndpoint`] binds one local address, optionally pins a default
//! remote peer, and moves datagrams with blocking, timeout-bounded calls.
//! Its send and receive paths are serialized independently, so one endpoint
//! can be driven full duplex from any number of threads.
//!
//! The endpoint adds no reliability layer of any kind: UDP stays unordered,
//! lossy, and message-oriented.

/// Typed element transfer layered on the byte-oriented endpoint.
pub mod element;
/// The endpoint: lifecycle, remote configuration, transfer paths.
pub mod endpoint;
/// OS socket transport implementation.
pub mod os;
/// One-time process-wide network subsystem startup.
pub mod startup;

pub use endpoint::UdpEndpoint;
