//! LEB128 varints used for string length prefixes

use crate::error::{BlockError, Result};

/// Maximum encoded length of a `u32` varint
pub const MAX_VARINT32_LEN: usize = 5;

/// Encoded length of `value` in bytes
#[inline]
pub fn varint_len(value: u32) -> usize {
    match value {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        0x20_0000..=0x0FFF_FFFF => 4,
        _ => 5,
    }
}

/// Append a varint to `buf`
pub fn encode_varint32(mut value: u32, buf: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            break;
        } else {
            buf.push(byte | 0x80);
        }
    }
}

/// Decode a varint from the front of `bytes`, returning (value, bytes_consumed)
///
/// Returns an error if:
/// - The buffer ends mid-varint
/// - The varint is longer than five bytes or overflows `u32`
pub fn decode_varint32(bytes: &[u8]) -> Result<(u32, usize)> {
    let mut result: u32 = 0;

    for (i, &byte) in bytes.iter().take(MAX_VARINT32_LEN).enumerate() {
        let payload = (byte & 0x7F) as u32;
        if i == MAX_VARINT32_LEN - 1 && payload > 0x0F {
            return Err(BlockError::CorruptBody(
                "varint overflows u32".to_string(),
            ));
        }
        result |= payload << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((result, i + 1));
        }
    }

    if bytes.len() >= MAX_VARINT32_LEN {
        Err(BlockError::CorruptBody(
            "varint exceeds maximum length".to_string(),
        ))
    } else {
        Err(BlockError::Truncated {
            needed: bytes.len() + 1,
            available: bytes.len(),
        })
    }
}

/// Decode a varint already checked by [`decode_varint32`]
pub(crate) fn read_varint32(bytes: &[u8]) -> (u32, usize) {
    let mut result: u32 = 0;
    let mut i = 0;
    loop {
        let byte = bytes[i];
        result |= ((byte & 0x7F) as u32) << (7 * i);
        i += 1;
        if byte & 0x80 == 0 {
            return (result, i);
        }
    }
}
