//! Block header shared by integer and string blocks

use crate::error::{BlockError, Result};
use crate::group_varint::{self, MIN_GROUP_LEN};
use std::ops::Range;

/// Encoded size of an empty block (all-zero header group)
pub const EMPTY_BLOCK_LEN: usize = MIN_GROUP_LEN;

/// Block header shared by integer and string blocks
///
/// Serialized as a single group-varint group:
///
/// ```text
/// (count, ordinal_base, restart_interval, reserved = 0)
/// ```
///
/// Integer blocks always write `restart_interval = 0`. An empty block is
/// written as five zero bytes whatever base the caller sealed it with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockHeader {
    /// Number of elements in the block
    pub count: u32,

    /// Ordinal position of the first element
    pub ordinal_base: u32,

    /// Strings between restart points (0 for integer blocks)
    pub restart_interval: u32,
}

impl BlockHeader {
    pub fn new(count: u32, ordinal_base: u32, restart_interval: u32) -> Self {
        if count == 0 {
            return BlockHeader::default();
        }

        BlockHeader {
            count,
            ordinal_base,
            restart_interval,
        }
    }

    /// Ordinal positions covered by the block
    ///
    /// Saturates at `u32::MAX` for a header that fails [`validate`](Self::validate).
    pub fn ordinal_range(&self) -> Range<u32> {
        self.ordinal_base..self.ordinal_base.saturating_add(self.count)
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.ordinal_base.checked_add(self.count).is_none() {
            return Err(BlockError::CorruptHeader(format!(
                "ordinal base {} + count {} overflows",
                self.ordinal_base, self.count
            )));
        }

        if self.count == 0 && (self.ordinal_base != 0 || self.restart_interval != 0) {
            return Err(BlockError::CorruptHeader(
                "empty block header must be all zeros".to_string(),
            ));
        }

        Ok(())
    }

    /// Append the encoded header to `buf`
    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        group_varint::append_group(
            buf,
            self.count,
            self.ordinal_base,
            self.restart_interval,
            0,
        );
    }

    /// Decode and validate a header from the front of `data`
    ///
    /// Returns the header and its encoded length.
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        if data.len() < MIN_GROUP_LEN {
            return Err(BlockError::Truncated {
                needed: MIN_GROUP_LEN,
                available: data.len(),
            });
        }

        let ([count, ordinal_base, restart_interval, reserved], len) =
            group_varint::decode_group(data)?;

        if reserved != 0 {
            return Err(BlockError::CorruptHeader(format!(
                "reserved header slot is {} (expected 0)",
                reserved
            )));
        }

        let header = BlockHeader {
            count,
            ordinal_base,
            restart_interval,
        };
        header.validate()?;

        Ok((header, len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_header_is_all_zeros() {
        let mut buf = Vec::new();
        BlockHeader::new(0, 12345, 16).encode_into(&mut buf);
        assert_eq!(buf, vec![0u8; EMPTY_BLOCK_LEN]);
    }

    #[test]
    fn test_header_serialization() {
        let header = BlockHeader::new(10003, 12345, 0);
        let mut buf = Vec::new();
        header.encode_into(&mut buf);

        let (decoded, len) = BlockHeader::decode(&buf).unwrap();
        assert_eq!(decoded, header);
        assert_eq!(len, buf.len());
        assert_eq!(decoded.ordinal_range(), 12345..22348);
    }

    #[test]
    fn test_short_header() {
        assert!(matches!(
            BlockHeader::decode(&[0, 0, 0]),
            Err(BlockError::Truncated { needed: 5, available: 3 })
        ));
    }

    #[test]
    fn test_reserved_slot_must_be_zero() {
        let mut buf = Vec::new();
        group_varint::append_group(&mut buf, 1, 0, 0, 9);
        assert!(matches!(
            BlockHeader::decode(&buf),
            Err(BlockError::CorruptHeader(_))
        ));
    }

    #[test]
    fn test_ordinal_overflow_rejected() {
        let mut buf = Vec::new();
        group_varint::append_group(&mut buf, 2, u32::MAX, 0, 0);
        assert!(matches!(
            BlockHeader::decode(&buf),
            Err(BlockError::CorruptHeader(_))
        ));
    }

    #[test]
    fn test_empty_block_with_base_rejected() {
        let header = BlockHeader {
            count: 0,
            ordinal_base: 7,
            restart_interval: 0,
        };
        assert!(header.validate().is_err());
    }

    #[test]
    fn test_ordinal_range_of_unvalidated_header() {
        let header = BlockHeader {
            count: 10,
            ordinal_base: u32::MAX - 3,
            restart_interval: 0,
        };
        assert!(header.validate().is_err());
        assert_eq!(header.ordinal_range(), u32::MAX - 3..u32::MAX);
    }
}
