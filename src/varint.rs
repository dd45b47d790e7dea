//! Variable-length integer encoding for framing prefixes.
//!
//! Base-128 little-endian groups with a continuation bit in the high bit
//! of each byte (the protobuf scheme). A `u64` takes at most
//! [`MAX_VARINT64_LEN`] bytes.

use crate::writer::Writer;

/// Maximum encoded length of a u64 varint.
pub const MAX_VARINT64_LEN: usize = 10;

/// Encode `value` into `buf`, returning the encoded length.
pub fn encode_varint64(buf: &mut [u8; MAX_VARINT64_LEN], mut value: u64) -> usize {
    let mut len = 0;
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            buf[len] = byte;
            return len + 1;
        }
        buf[len] = byte | 0x80;
        len += 1;
    }
}

/// Decode a varint from the front of `src`.
///
/// Returns the value and the number of bytes consumed, or `None` if `src`
/// is truncated or the encoding overflows a u64.
pub fn decode_varint64(src: &[u8]) -> Option<(u64, usize)> {
    let mut value: u64 = 0;
    for (i, &byte) in src.iter().enumerate().take(MAX_VARINT64_LEN) {
        let payload = u64::from(byte & 0x7f);
        value |= payload.checked_shl(7 * i as u32)?;
        if i == MAX_VARINT64_LEN - 1 && byte > 0x01 {
            // Tenth byte may only contribute the final bit.
            return None;
        }
        if byte & 0x80 == 0 {
            return Some((value, i + 1));
        }
    }
    None
}

/// Write `value` as a varint to `dest`.
pub fn write_varint64<W: Writer + ?Sized>(dest: &mut W, value: u64) -> bool {
    let mut buf = [0u8; MAX_VARINT64_LEN];
    let len = encode_varint64(&mut buf, value);
    dest.write(&buf[..len])
}
