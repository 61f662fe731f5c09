#![warn(missing_docs)]

//! Netgram: a small public API facade for the workspace.
//!
//! This crate provides a clean, stable surface that re-exports the most
//! commonly used types for moving datagrams through a single UDP endpoint:
//!
//! - The endpoint itself (`UdpEndpoint`)
//! - Construction-time options (`EndpointConfig`)
//! - The error taxonomy (`ErrorKind`, `Failure`, `Result`)
//! - Typed element transfer (`element`)
//!
//! Example
//! ```no_run
//! use netgram::UdpEndpoint;
//!
//! let receiver = UdpEndpoint::bind_any().unwrap();
//! let port = receiver.local_addr().unwrap().port();
//!
//! let sender = UdpEndpoint::bind_any().unwrap();
//! sender.configure_remote_loopback(port).unwrap();
//! sender.send(b"hello").unwrap();
//!
//! let datagram = receiver.recv().unwrap();
//! assert_eq!(datagram, b"hello");
//! ```

// Core: configuration, errors, raw handle
pub use netgram_core::config::EndpointConfig;
pub use netgram_core::constants;
pub use netgram_core::error::{ErrorKind, Failure, Result};
pub use netgram_core::RawHandle;
// Endpoint: lifecycle and transfer paths
pub use netgram_endpoint::element;
pub use netgram_endpoint::UdpEndpoint;

/// Convenience prelude with the most commonly used items.
pub mod prelude {
    pub use crate::{EndpointConfig, ErrorKind, Failure, RawHandle, Result, UdpEndpoint};
}
