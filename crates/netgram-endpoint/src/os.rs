//! OS socket transport implementation.

use std::{
    io,
    mem::MaybeUninit,
    net::{SocketAddr, UdpSocket},
    time::Duration,
};

#[cfg(unix)]
use std::os::fd::AsRawFd;
#[cfg(windows)]
use std::os::windows::io::AsRawSocket;

use netgram_core::{transport::Transport, RawHandle};
use socket2::{SockAddr, SockRef};

/// [`Transport`] implementation over a bound operating-system socket.
///
/// The standard library socket already abstracts the POSIX/Winsock split;
/// `socket2` fills in the flag-carrying send the standard library does not
/// expose.
#[derive(Debug)]
pub struct OsSocket {
    socket: UdpSocket,
}

impl OsSocket {
    /// Wraps an already bound socket.
    pub fn new(socket: UdpSocket) -> Self {
        Self { socket }
    }
}

impl Transport for OsSocket {
    fn send_one(&self, payload: &[u8], addr: SocketAddr, flags: i32) -> io::Result<usize> {
        if flags == 0 {
            self.socket.send_to(payload, addr)
        } else {
            let raw_addr = SockAddr::from(addr);
            SockRef::from(&self.socket).send_to_with_flags(payload, &raw_addr, flags)
        }
    }

    fn receive_one(&self, buffer: &mut [u8], flags: i32) -> io::Result<usize> {
        if flags == 0 {
            return self.socket.recv(buffer);
        }
        // socket2 receives into uninitialized memory; stage the datagram
        // there and copy out the bytes the transport filled in.
        let mut staging = vec![MaybeUninit::<u8>::uninit(); buffer.len()];
        let received = SockRef::from(&self.socket).recv_with_flags(&mut staging, flags)?;
        // SAFETY: the transport initialized the first `received` bytes.
        let filled =
            unsafe { std::slice::from_raw_parts(staging.as_ptr().cast::<u8>(), received) };
        buffer[..received].copy_from_slice(filled);
        Ok(received)
    }

    fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        self.socket.set_read_timeout(timeout)
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    #[cfg(unix)]
    fn raw_handle(&self) -> RawHandle {
        self.socket.as_raw_fd()
    }

    #[cfg(windows)]
    fn raw_handle(&self) -> RawHandle {
        self.socket.as_raw_socket()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_and_receive_through_the_trait() {
        let receiver = OsSocket::new(UdpSocket::bind("127.0.0.1:0").unwrap());
        let sender = OsSocket::new(UdpSocket::bind("127.0.0.1:0").unwrap());
        let dest = receiver.local_addr().unwrap();

        let sent = sender.send_one(b"ping", dest, 0).unwrap();
        assert_eq!(sent, 4);

        let mut buffer = [0u8; 16];
        let received = receiver.receive_one(&mut buffer, 0).unwrap();
        assert_eq!(&buffer[..received], b"ping");
    }

    #[test]
    fn peek_flag_leaves_the_datagram_queued() {
        // MSG_PEEK is 0x2 on every supported platform.
        const MSG_PEEK: i32 = 0x2;

        let receiver = OsSocket::new(UdpSocket::bind("127.0.0.1:0").unwrap());
        let sender = OsSocket::new(UdpSocket::bind("127.0.0.1:0").unwrap());
        sender.send_one(b"peeked", receiver.local_addr().unwrap(), 0).unwrap();

        let mut buffer = [0u8; 16];
        let peeked = receiver.receive_one(&mut buffer, MSG_PEEK).unwrap();
        assert_eq!(&buffer[..peeked], b"peeked");

        // A plain receive still sees the same datagram.
        let received = receiver.receive_one(&mut buffer, 0).unwrap();
        assert_eq!(&buffer[..received], b"peeked");
    }

    #[test]
    fn read_timeout_surfaces_as_timeout_kind() {
        let socket = OsSocket::new(UdpSocket::bind("127.0.0.1:0").unwrap());
        socket.set_read_timeout(Some(Duration::from_millis(20))).unwrap();

        let mut buffer = [0u8; 16];
        let err = socket.receive_one(&mut buffer, 0).unwrap_err();
        assert!(netgram_core::error::is_timeout(&err));
    }
}
