//! Transport abstraction for pluggable I/O.

use std::{io::Result, net::SocketAddr, time::Duration};

use crate::RawHandle;

/// Low-level datagram socket capability.
///
/// The endpoint's transfer and configuration logic is written once against
/// this trait; the concrete implementation (OS sockets on POSIX or Windows,
/// an in-memory emulator, ...) is plugged in underneath. All methods take
/// `&self`: a datagram socket's inbound and outbound queues are independent
/// and the endpoint layer supplies its own serialization.
pub trait Transport {
    /// Sends a single datagram to `addr`, returning the bytes accepted by
    /// the transport. Datagrams are atomic: the count is the full payload
    /// length or the call fails.
    fn send_one(&self, payload: &[u8], addr: SocketAddr, flags: i32) -> Result<usize>;

    /// Receives a single datagram into `buffer`, returning the byte count.
    /// A datagram larger than `buffer` is truncated by the transport.
    /// `flags` carries platform `MSG_*` receive flags; 0 is a plain receive.
    fn receive_one(&self, buffer: &mut [u8], flags: i32) -> Result<usize>;

    /// Applies a read timeout; `None` blocks indefinitely.
    fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()>;

    /// Returns the local address this transport is bound to.
    fn local_addr(&self) -> Result<SocketAddr>;

    /// Returns the raw platform handle for low-level configuration.
    fn raw_handle(&self) -> RawHandle;
}
