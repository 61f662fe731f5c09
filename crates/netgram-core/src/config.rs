use std::default::Default;

use crate::constants::DEFAULT_RECV_CAPACITY;

/// Socket options applied once at construction time.
///
/// These are endpoint-local: changing a config after an endpoint is bound
/// has no effect on that endpoint. Address reuse and broadcast default to
/// enabled, matching the behavior callers of a plain datagram endpoint
/// usually want on a LAN.
#[derive(Clone, Debug)]
pub struct EndpointConfig {
    /// Allow rebinding a local address that is in `TIME_WAIT` or shared.
    /// Corresponds to the `SO_REUSEADDR` socket option.
    pub reuse_address: bool,
    /// Allow sending to broadcast addresses.
    /// Corresponds to the `SO_BROADCAST` socket option.
    pub broadcast: bool,
    /// Socket receive buffer size in bytes (None = use system default).
    /// Corresponds to the `SO_RCVBUF` socket option.
    pub recv_buffer_size: Option<usize>,
    /// Socket send buffer size in bytes (None = use system default).
    /// Corresponds to the `SO_SNDBUF` socket option.
    pub send_buffer_size: Option<usize>,
    /// Time-to-live for outgoing datagrams (None = use system default).
    /// Corresponds to the `IP_TTL` socket option.
    pub ttl: Option<u32>,
    /// Capacity in bytes of the buffer allocated by the default receive.
    pub default_recv_capacity: u16,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            reuse_address: true,
            broadcast: true,
            recv_buffer_size: None, // Use system default
            send_buffer_size: None, // Use system default
            ttl: None,              // Use system default
            default_recv_capacity: DEFAULT_RECV_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_enables_reuse_and_broadcast() {
        let config = EndpointConfig::default();
        assert!(config.reuse_address);
        assert!(config.broadcast);
        assert_eq!(config.recv_buffer_size, None);
        assert_eq!(config.send_buffer_size, None);
        assert_eq!(config.ttl, None);
        assert_eq!(config.default_recv_capacity, 1500);
    }
}
