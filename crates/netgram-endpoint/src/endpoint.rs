//! The endpoint: lifecycle, remote configuration, transfer paths.

use std::{
    net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket},
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use netgram_core::{
    config::EndpointConfig,
    constants::LOOPBACK_ADDRESS,
    error::{is_timeout, ErrorKind, Failure, Result},
    transport::Transport,
    RawHandle,
};
use socket2::{Domain, Protocol, Socket, Type};
use tracing::{debug, trace, warn};

use crate::{os::OsSocket, startup};

/// A bound UDP endpoint usable from any number of threads.
///
/// Every operation is a blocking call on the calling thread. Three
/// independent locks serialize the endpoint: the general lock guarding the
/// configured remote, a send gate, and a receive gate, so sends and
/// receives proceed fully concurrently while each path admits one caller at
/// a time.
///
/// Dropping the endpoint releases the socket handle exactly once. Because
/// every operation borrows the endpoint, no send or receive can still be in
/// flight when it drops.
pub struct UdpEndpoint {
    transport: OsSocket,
    /// General lock and remote-configuration record in one: once set, the
    /// remote stays set for the endpoint's lifetime.
    remote: Mutex<Option<SocketAddrV4>>,
    send_gate: Mutex<()>,
    recv_gate: Mutex<()>,
    default_recv_capacity: u16,
}

impl std::fmt::Debug for UdpEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UdpEndpoint")
            .field("local_addr", &self.transport.local_addr().ok())
            .field("remote", &*lock(&self.remote))
            .finish()
    }
}

/// Recovers the guard from a poisoned lock. The guarded state is a plain
/// value snapshot, still consistent if another thread panicked mid-call.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn parse_peer(address: &str, port: u16) -> Option<SocketAddrV4> {
    address.parse().ok().map(|ip| SocketAddrV4::new(ip, port))
}

/// Applies construction-time socket options before binding.
fn apply_socket_options(socket: &Socket, config: &EndpointConfig) -> std::io::Result<()> {
    if config.reuse_address {
        socket.set_reuse_address(true)?;
    }
    if config.broadcast {
        socket.set_broadcast(true)?;
    }
    if let Some(size) = config.recv_buffer_size {
        socket.set_recv_buffer_size(size)?;
    }
    if let Some(size) = config.send_buffer_size {
        socket.set_send_buffer_size(size)?;
    }
    if let Some(ttl) = config.ttl {
        socket.set_ttl(ttl)?;
    }
    Ok(())
}

impl UdpEndpoint {
    /// Binds an endpoint to `port` on the given local IPv4 address with
    /// default configuration.
    ///
    /// An empty `address` binds the wildcard address; port 0 asks the
    /// operating system for an ephemeral port. Fails with
    /// [`ErrorKind::InitializationError`] when the address does not parse,
    /// the socket cannot be created or configured, or the bind fails.
    pub fn bind(port: u16, address: &str) -> Result<Self> {
        Self::bind_with_config(port, address, EndpointConfig::default())
    }

    /// Binds an endpoint to an ephemeral port on the wildcard address.
    pub fn bind_any() -> Result<Self> {
        Self::bind(0, "")
    }

    /// Binds an endpoint with explicit construction-time socket options.
    pub fn bind_with_config(port: u16, address: &str, config: EndpointConfig) -> Result<Self> {
        startup::ensure_started();

        let ip = if address.is_empty() {
            Ipv4Addr::UNSPECIFIED
        } else {
            address.parse().map_err(|_| {
                ErrorKind::InitializationError(Failure::stage("parse local address"))
            })?
        };
        let local = SocketAddrV4::new(ip, port);

        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
            .map_err(|err| ErrorKind::InitializationError(Failure::os("create socket", &err)))?;
        apply_socket_options(&socket, &config).map_err(|err| {
            ErrorKind::InitializationError(Failure::os("set socket options", &err))
        })?;
        // Baseline: block indefinitely until a timeout is configured.
        socket.set_read_timeout(None).map_err(|err| {
            ErrorKind::InitializationError(Failure::os("set receive timeout", &err))
        })?;
        socket
            .bind(&socket2::SockAddr::from(local))
            .map_err(|err| ErrorKind::InitializationError(Failure::os("bind", &err)))?;

        let socket: UdpSocket = socket.into();
        if let Ok(bound) = socket.local_addr() {
            debug!("endpoint bound to {}", bound);
        }

        Ok(Self {
            transport: OsSocket::new(socket),
            remote: Mutex::new(None),
            send_gate: Mutex::new(()),
            recv_gate: Mutex::new(()),
            default_recv_capacity: config.default_recv_capacity,
        })
    }

    /// Stores the default destination used by [`send`](Self::send).
    ///
    /// Fails with [`ErrorKind::ConfigurationError`] when `address` does not
    /// parse as an IPv4 address. Once set, the remote stays set until the
    /// endpoint is dropped; senders always observe a complete
    /// (address, port) pair.
    pub fn configure_remote(&self, port: u16, address: &str) -> Result<()> {
        let peer = parse_peer(address, port).ok_or_else(|| {
            ErrorKind::ConfigurationError(Failure::stage("parse remote address"))
        })?;
        *lock(&self.remote) = Some(peer);
        Ok(())
    }

    /// Stores the loopback address and `port` as the default destination.
    pub fn configure_remote_loopback(&self, port: u16) -> Result<()> {
        self.configure_remote(port, LOOPBACK_ADDRESS)
    }

    /// Sets how long a receive blocks before returning empty; 0 blocks
    /// indefinitely.
    ///
    /// Fails with [`ErrorKind::ConfigurationError`] when the platform
    /// refuses the option.
    pub fn set_receive_timeout(&self, milliseconds: u32) -> Result<()> {
        let timeout = if milliseconds == 0 {
            None
        } else {
            Some(Duration::from_millis(u64::from(milliseconds)))
        };
        self.transport.set_read_timeout(timeout).map_err(|err| {
            ErrorKind::ConfigurationError(Failure::os("set receive timeout", &err))
        })
    }

    /// Receives one datagram into a fresh buffer of the default capacity.
    ///
    /// Returns an empty vector when the receive timeout elapses first; that
    /// is not an error. Any other failure is
    /// [`ErrorKind::ReceiveError`] carrying the platform code. A datagram
    /// larger than the capacity is truncated by the transport; truncation is
    /// not detected or reported.
    pub fn recv(&self) -> Result<Vec<u8>> {
        self.recv_sized(self.default_recv_capacity)
    }

    /// Receives one datagram into a fresh buffer of at most `max_bytes`.
    pub fn recv_sized(&self, max_bytes: u16) -> Result<Vec<u8>> {
        self.recv_sized_with_flags(max_bytes, 0)
    }

    /// [`recv_sized`](Self::recv_sized) with platform `MSG_*` receive flags.
    pub fn recv_sized_with_flags(&self, max_bytes: u16, flags: i32) -> Result<Vec<u8>> {
        let _gate = lock(&self.recv_gate);

        let mut buffer = vec![0u8; usize::from(max_bytes)];
        match self.transport.receive_one(&mut buffer, flags) {
            Ok(received) => {
                buffer.truncate(received);
                Ok(buffer)
            }
            Err(err) if is_timeout(&err) => {
                trace!("receive timed out");
                Ok(Vec::new())
            }
            Err(err) => {
                warn!("error receiving datagram: {}", err);
                Err(ErrorKind::ReceiveError(Failure::os("receive", &err)))
            }
        }
    }

    /// Receives one datagram into a caller-supplied buffer, returning the
    /// byte count; 0 when the receive timeout elapses first.
    pub fn recv_into(&self, buffer: &mut [u8]) -> Result<usize> {
        self.recv_into_with_flags(buffer, 0)
    }

    /// [`recv_into`](Self::recv_into) with platform `MSG_*` receive flags.
    pub fn recv_into_with_flags(&self, buffer: &mut [u8], flags: i32) -> Result<usize> {
        let _gate = lock(&self.recv_gate);

        match self.transport.receive_one(buffer, flags) {
            Ok(received) => Ok(received),
            Err(err) if is_timeout(&err) => {
                trace!("receive timed out");
                Ok(0)
            }
            Err(err) => {
                warn!("error receiving datagram: {}", err);
                Err(ErrorKind::ReceiveError(Failure::os("receive", &err)))
            }
        }
    }

    /// Sends one datagram to the configured remote, returning the bytes
    /// accepted by the transport.
    ///
    /// Fails with [`ErrorKind::SendError`] when no remote has been
    /// configured or the transmission fails.
    pub fn send(&self, buffer: &[u8]) -> Result<usize> {
        self.send_with_flags(buffer, 0)
    }

    /// [`send`](Self::send) with platform `MSG_*` send flags.
    pub fn send_with_flags(&self, buffer: &[u8], flags: i32) -> Result<usize> {
        // Lock order: general lock first, then the send gate. The remote
        // snapshot is held for the whole transmission so a concurrent
        // reconfiguration cannot interleave with it.
        let remote = lock(&self.remote);
        let _gate = lock(&self.send_gate);

        let peer = (*remote).ok_or_else(|| {
            ErrorKind::SendError(Failure::stage("remote not configured"))
        })?;
        self.transmit(buffer, SocketAddr::V4(peer), flags)
    }

    /// Sends one datagram to an explicit destination, returning the bytes
    /// accepted by the transport.
    ///
    /// Does not read the configured remote, so it never contends with
    /// [`configure_remote`](Self::configure_remote). Fails with
    /// [`ErrorKind::SendError`] when `address` does not parse or the
    /// transmission fails.
    pub fn send_to(&self, buffer: &[u8], port: u16, address: &str) -> Result<usize> {
        self.send_to_with_flags(buffer, port, address, 0)
    }

    /// [`send_to`](Self::send_to) with platform `MSG_*` send flags.
    pub fn send_to_with_flags(
        &self,
        buffer: &[u8],
        port: u16,
        address: &str,
        flags: i32,
    ) -> Result<usize> {
        let peer = parse_peer(address, port).ok_or_else(|| {
            ErrorKind::SendError(Failure::stage("parse destination address"))
        })?;

        let _gate = lock(&self.send_gate);
        self.transmit(buffer, SocketAddr::V4(peer), flags)
    }

    /// Returns the local address the endpoint is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.transport.local_addr().map_err(|err| {
            ErrorKind::ConfigurationError(Failure::os("query local address", &err))
        })
    }

    /// Returns the raw platform socket handle for low-level configuration
    /// not otherwise exposed.
    pub fn raw_handle(&self) -> RawHandle {
        self.transport.raw_handle()
    }

    fn transmit(&self, buffer: &[u8], peer: SocketAddr, flags: i32) -> Result<usize> {
        self.transport.send_one(buffer, peer, flags).map_err(|err| {
            warn!("error sending datagram to {}: {}", peer, err);
            ErrorKind::SendError(Failure::os("transmit", &err))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_any_assigns_an_ephemeral_port() {
        let endpoint = UdpEndpoint::bind_any().unwrap();
        assert_ne!(endpoint.local_addr().unwrap().port(), 0);
    }

    #[test]
    fn bind_rejects_unparsable_address() {
        let err = UdpEndpoint::bind(0, "not an address").unwrap_err();
        assert!(matches!(err, ErrorKind::InitializationError(_)));
        assert_eq!(err.failure().stage_name(), "parse local address");
    }

    #[test]
    fn configure_remote_rejects_unparsable_address() {
        let endpoint = UdpEndpoint::bind_any().unwrap();
        let err = endpoint.configure_remote(9000, "256.0.0.1").unwrap_err();
        assert!(matches!(err, ErrorKind::ConfigurationError(_)));
    }

    #[test]
    fn send_to_rejects_unparsable_address() {
        let endpoint = UdpEndpoint::bind_any().unwrap();
        let err = endpoint.send_to(b"data", 9000, "nowhere").unwrap_err();
        assert!(matches!(err, ErrorKind::SendError(_)));
        assert_eq!(err.failure().stage_name(), "parse destination address");
    }

    #[test]
    fn send_without_remote_fails() {
        let endpoint = UdpEndpoint::bind_any().unwrap();
        let err = endpoint.send(b"data").unwrap_err();
        assert!(matches!(err, ErrorKind::SendError(_)));
        assert_eq!(err.failure().stage_name(), "remote not configured");
    }

    #[test]
    fn failed_send_leaves_the_endpoint_usable() {
        let receiver = UdpEndpoint::bind_any().unwrap();
        receiver.set_receive_timeout(5000).unwrap();
        let port = receiver.local_addr().unwrap().port();

        let sender = UdpEndpoint::bind_any().unwrap();
        assert!(sender.send(b"no remote yet").is_err());

        sender.configure_remote_loopback(port).unwrap();
        assert_eq!(sender.send(b"after failure").unwrap(), 13);
        assert_eq!(receiver.recv().unwrap(), b"after failure");
    }

    #[cfg(unix)]
    #[test]
    fn raw_handle_is_a_live_descriptor() {
        let endpoint = UdpEndpoint::bind_any().unwrap();
        assert!(endpoint.raw_handle() >= 0);
    }
}
