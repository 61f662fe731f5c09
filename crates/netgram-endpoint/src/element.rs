//! Typed element transfer layered on the byte-oriented endpoint.
//!
//! The transfer paths of [`UdpEndpoint`] move raw bytes only. This module
//! reinterprets a datagram as a sequence of fixed-size native-endian
//! scalars on top of those paths, without pushing type genericity into the
//! endpoint itself.

use byteorder::{ByteOrder, NativeEndian};
use netgram_core::error::Result;

use crate::endpoint::UdpEndpoint;

/// A fixed-size scalar that can be reinterpreted from and to raw datagram
/// bytes in native byte order.
pub trait Element: Copy {
    /// Size of one element on the wire, in bytes.
    const SIZE: usize;

    /// Reads one element from `bytes`, which holds at least `SIZE` bytes.
    fn read(bytes: &[u8]) -> Self;

    /// Appends this element's bytes to `out`.
    fn write(&self, out: &mut Vec<u8>);
}

impl Element for u8 {
    const SIZE: usize = 1;

    fn read(bytes: &[u8]) -> Self {
        bytes[0]
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.push(*self);
    }
}

impl Element for i8 {
    const SIZE: usize = 1;

    fn read(bytes: &[u8]) -> Self {
        bytes[0] as i8
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.push(*self as u8);
    }
}

macro_rules! scalar_element {
    ($ty:ty, $size:expr, $read:ident, $write:ident) => {
        impl Element for $ty {
            const SIZE: usize = $size;

            fn read(bytes: &[u8]) -> Self {
                NativeEndian::$read(bytes)
            }

            fn write(&self, out: &mut Vec<u8>) {
                let mut raw = [0u8; $size];
                NativeEndian::$write(&mut raw, *self);
                out.extend_from_slice(&raw);
            }
        }
    };
}

scalar_element!(u16, 2, read_u16, write_u16);
scalar_element!(i16, 2, read_i16, write_i16);
scalar_element!(u32, 4, read_u32, write_u32);
scalar_element!(i32, 4, read_i32, write_i32);
scalar_element!(u64, 8, read_u64, write_u64);
scalar_element!(i64, 8, read_i64, write_i64);
scalar_element!(f32, 4, read_f32, write_f32);
scalar_element!(f64, 8, read_f64, write_f64);

/// Sends a slice of elements as one datagram to the configured remote.
pub fn send_elements<T: Element>(endpoint: &UdpEndpoint, items: &[T]) -> Result<usize> {
    endpoint.send(&encode(items))
}

/// Sends a slice of elements as one datagram to an explicit destination.
pub fn send_elements_to<T: Element>(
    endpoint: &UdpEndpoint,
    items: &[T],
    port: u16,
    address: &str,
) -> Result<usize> {
    endpoint.send_to(&encode(items), port, address)
}

/// Receives one datagram of at most `max_bytes` and reinterprets it as
/// elements. A trailing partial element is zero-padded to full size; the
/// result is empty when the receive timed out.
pub fn recv_elements<T: Element>(endpoint: &UdpEndpoint, max_bytes: u16) -> Result<Vec<T>> {
    Ok(decode(endpoint.recv_sized(max_bytes)?))
}

fn encode<T: Element>(items: &[T]) -> Vec<u8> {
    let mut out = Vec::with_capacity(items.len() * T::SIZE);
    for item in items {
        item.write(&mut out);
    }
    out
}

fn decode<T: Element>(mut bytes: Vec<u8>) -> Vec<T> {
    if bytes.is_empty() {
        return Vec::new();
    }
    let remainder = bytes.len() % T::SIZE;
    if remainder != 0 {
        bytes.resize(bytes.len() + T::SIZE - remainder, 0);
    }
    bytes.chunks_exact(T::SIZE).map(T::read).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u32_slices_survive_the_byte_round_trip() {
        let items = [1u32, 0xDEAD_BEEF, u32::MAX];
        let bytes = encode(&items);
        assert_eq!(bytes.len(), 12);
        assert_eq!(decode::<u32>(bytes), items);
    }

    #[test]
    fn f64_slices_survive_the_byte_round_trip() {
        let items = [0.5f64, -13.25, f64::MIN_POSITIVE];
        assert_eq!(decode::<f64>(encode(&items)), items);
    }

    #[test]
    fn trailing_partial_element_is_zero_padded() {
        // Five bytes decoded as u32: one full element plus one padded one.
        let decoded = decode::<u32>(vec![0xAA, 0xBB, 0xCC, 0xDD, 0x01]);
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0], u32::from_ne_bytes([0xAA, 0xBB, 0xCC, 0xDD]));
        assert_eq!(decoded[1], u32::from_ne_bytes([0x01, 0, 0, 0]));
    }

    #[test]
    fn empty_input_decodes_to_nothing() {
        assert!(decode::<u16>(Vec::new()).is_empty());
    }

    #[test]
    fn signed_bytes_keep_their_sign() {
        let items = [-1i8, 0, 127, -128];
        assert_eq!(decode::<i8>(encode(&items)), items);
    }
}
