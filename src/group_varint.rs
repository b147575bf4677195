//! Group-varint codec for batches of four `u32` values
//!
//! Each group is one tag byte followed by the four values in order, each
//! stored little-endian in the fewest bytes that hold it (zero takes one
//! byte). The tag carries `width - 1` for every value, two bits apiece, with
//! the first value in the most significant bits.
//!
//! ```text
//! [tag][v0: 1-4][v1: 1-4][v2: 1-4][v3: 1-4]
//!
//! tag = (w0-1) << 6 | (w1-1) << 4 | (w2-1) << 2 | (w3-1)
//! ```

use crate::error::{BlockError, Result};

/// Smallest encoded group: tag plus four one-byte values
pub const MIN_GROUP_LEN: usize = 5;

/// Largest encoded group: tag plus four four-byte values
pub const MAX_GROUP_LEN: usize = 17;

/// Number of bytes needed to hold `value` (1..=4)
#[inline]
pub fn byte_width(value: u32) -> usize {
    if value < 1 << 8 {
        1
    } else if value < 1 << 16 {
        2
    } else if value < 1 << 24 {
        3
    } else {
        4
    }
}

/// Encoded size of a group holding these four values
#[inline]
pub fn encoded_len(a: u32, b: u32, c: u32, d: u32) -> usize {
    1 + byte_width(a) + byte_width(b) + byte_width(c) + byte_width(d)
}

/// Total group size (tag included) declared by a tag byte
#[inline]
pub fn group_len(tag: u8) -> usize {
    1 + (0..4).map(|i| width_at(tag, i)).sum::<usize>()
}

#[inline]
fn width_at(tag: u8, index: usize) -> usize {
    (((tag >> (6 - 2 * index)) & 0b11) + 1) as usize
}

/// Append one group of four values to `buf`
pub fn append_group(buf: &mut Vec<u8>, a: u32, b: u32, c: u32, d: u32) {
    let values = [a, b, c, d];
    let mut tag = 0u8;
    for value in values {
        tag = (tag << 2) | (byte_width(value) - 1) as u8;
    }

    buf.reserve(1 + 16);
    buf.push(tag);
    for value in values {
        buf.extend_from_slice(&value.to_le_bytes()[..byte_width(value)]);
    }
}

/// Decode one group from the front of `data`
///
/// Returns the four values and the number of bytes consumed.
///
/// # Errors
///
/// Returns `Truncated` if `data` is empty or shorter than its tag declares.
pub fn decode_group(data: &[u8]) -> Result<([u32; 4], usize)> {
    let Some(&tag) = data.first() else {
        return Err(BlockError::Truncated {
            needed: MIN_GROUP_LEN,
            available: 0,
        });
    };

    let needed = group_len(tag);
    if data.len() < needed {
        return Err(BlockError::Truncated {
            needed,
            available: data.len(),
        });
    }

    Ok(read_group(data))
}

/// Decode a group whose full length is already known to be present
///
/// Callers must have checked `data.len() >= group_len(data[0])`.
pub(crate) fn read_group(data: &[u8]) -> ([u32; 4], usize) {
    let tag = data[0];
    let mut values = [0u32; 4];
    let mut offset = 1;

    for (i, value) in values.iter_mut().enumerate() {
        let width = width_at(tag, i);
        let mut le = [0u8; 4];
        le[..width].copy_from_slice(&data[offset..offset + width]);
        *value = u32::from_le_bytes(le);
        offset += width;
    }

    (values, offset)
}
