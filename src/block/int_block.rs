//! Integer blocks
//!
//! Layout:
//!
//! ```text
//! [header group][group 0][group 1]...[group ⌈count/4⌉-1]
//! ```
//!
//! Values are packed four to a group-varint group. The last group is padded
//! with zeros when `count` is not a multiple of four; each pad value costs one
//! byte. The decoder records every group's offset so a seek touches exactly
//! one group.

use super::{assert_seekable, BlockBuilder, BlockDecoder, DecoderState, HEADER_RESERVE};
use crate::config::WriterOptions;
use crate::error::{BlockError, Result};
use crate::group_varint::{self, byte_width, group_len, MIN_GROUP_LEN};
use crate::header::BlockHeader;
use tracing::{debug, trace, warn};

const GROUP_SIZE: usize = 4;

/// Sealed size of a block holding `count` values whose widths sum to `width_sum`
fn sealed_size(count: usize, width_sum: usize) -> usize {
    let groups = count.div_ceil(GROUP_SIZE);
    let padding = groups * GROUP_SIZE - count;
    HEADER_RESERVE + groups + width_sum + padding
}

/// Accumulates `u32` values for one integer block
#[derive(Debug, Clone)]
pub struct IntBlockBuilder {
    max_block_bytes: usize,
    values: Vec<u32>,
    /// Sum of the group-varint widths of `values`
    width_sum: usize,
    buffer: Vec<u8>,
}

impl IntBlockBuilder {
    pub fn new(options: &WriterOptions) -> Self {
        IntBlockBuilder {
            max_block_bytes: options.max_block_bytes,
            values: Vec::new(),
            width_sum: 0,
            buffer: Vec::new(),
        }
    }
}

impl BlockBuilder for IntBlockBuilder {
    type Item<'v> = u32;

    fn add<'v>(&mut self, values: &[Self::Item<'v>]) -> usize {
        let mut width_sum = self.width_sum;
        let mut taken = 0;

        for &value in values {
            let next_width_sum = width_sum + byte_width(value);
            let next_count = self.values.len() + taken + 1;
            if next_count > 1 && sealed_size(next_count, next_width_sum) > self.max_block_bytes {
                break;
            }
            width_sum = next_width_sum;
            taken += 1;
        }

        self.values.extend_from_slice(&values[..taken]);
        self.width_sum = width_sum;
        taken
    }

    fn count(&self) -> usize {
        self.values.len()
    }

    fn estimated_size(&self) -> usize {
        sealed_size(self.values.len(), self.width_sum)
    }

    fn is_full(&self) -> bool {
        !self.values.is_empty()
            && sealed_size(self.values.len() + 1, self.width_sum + 1) > self.max_block_bytes
    }

    fn reset(&mut self) {
        self.values.clear();
        self.width_sum = 0;
        self.buffer.clear();
    }

    fn finish(&mut self, ordinal_base: u32) -> Result<&[u8]> {
        let count = u32::try_from(self.values.len())
            .ok()
            .filter(|count| ordinal_base.checked_add(*count).is_some())
            .ok_or(BlockError::OrdinalOverflow {
                base: ordinal_base,
                count: self.values.len(),
            })?;

        self.buffer.clear();
        self.buffer.reserve(self.estimated_size());
        BlockHeader::new(count, ordinal_base, 0).encode_into(&mut self.buffer);

        for chunk in self.values.chunks(GROUP_SIZE) {
            let mut group = [0u32; GROUP_SIZE];
            group[..chunk.len()].copy_from_slice(chunk);
            group_varint::append_group(&mut self.buffer, group[0], group[1], group[2], group[3]);
        }

        debug!(
            "Sealed int block: {} values from ordinal {} in {} bytes",
            count,
            ordinal_base,
            self.buffer.len()
        );

        Ok(&self.buffer)
    }
}

/// Reads an integer block
///
/// Borrows the block bytes for its whole lifetime.
#[derive(Debug, Clone)]
pub struct IntBlockDecoder<'a> {
    data: &'a [u8],
    state: DecoderState,
    header: BlockHeader,
    /// Byte offset of every group within `data`
    group_offsets: Vec<usize>,
    cursor: usize,
    /// Decoded values of the current group not yet returned
    pending: [u32; GROUP_SIZE],
    pending_pos: usize,
    pending_len: usize,
}

impl<'a> IntBlockDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        IntBlockDecoder {
            data,
            state: DecoderState::Unparsed,
            header: BlockHeader::default(),
            group_offsets: Vec::new(),
            cursor: 0,
            pending: [0; GROUP_SIZE],
            pending_pos: 0,
            pending_len: 0,
        }
    }

    /// Parsed header (all zeros until `parse_header` succeeds)
    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    fn parse(&self) -> Result<(BlockHeader, Vec<usize>)> {
        let (header, mut offset) = BlockHeader::decode(self.data)?;

        if header.restart_interval != 0 {
            return Err(BlockError::CorruptHeader(format!(
                "integer block carries restart interval {}",
                header.restart_interval
            )));
        }

        let count = header.count as usize;
        let groups = count.div_ceil(GROUP_SIZE);
        let available = self.data.len() - offset;
        if groups > available / MIN_GROUP_LEN {
            return Err(BlockError::Truncated {
                needed: offset + groups * MIN_GROUP_LEN,
                available: self.data.len(),
            });
        }

        let mut group_offsets = Vec::with_capacity(groups);
        for _ in 0..groups {
            let Some(&tag) = self.data.get(offset) else {
                return Err(BlockError::Truncated {
                    needed: offset + MIN_GROUP_LEN,
                    available: self.data.len(),
                });
            };
            let end = offset + group_len(tag);
            if end > self.data.len() {
                return Err(BlockError::Truncated {
                    needed: end,
                    available: self.data.len(),
                });
            }
            group_offsets.push(offset);
            offset = end;
        }

        if offset != self.data.len() {
            return Err(BlockError::CorruptBody(format!(
                "{} trailing bytes after last group",
                self.data.len() - offset
            )));
        }

        let used = count % GROUP_SIZE;
        if used != 0 {
            if let Some(&last) = group_offsets.last() {
                let (values, _) = group_varint::read_group(&self.data[last..]);
                if values[used..].iter().any(|&v| v != 0) {
                    return Err(BlockError::CorruptBody(
                        "non-zero padding in final group".to_string(),
                    ));
                }
            }
        }

        Ok((header, group_offsets))
    }

    /// Decode `group` into the pending buffer, skipping its first `skip` values
    fn load_group(&mut self, group: usize, skip: usize) {
        let (values, _) = group_varint::read_group(&self.data[self.group_offsets[group]..]);
        self.pending = values;
        self.pending_len = GROUP_SIZE.min(self.count() - group * GROUP_SIZE);
        self.pending_pos = skip;
    }
}

impl<'a> BlockDecoder for IntBlockDecoder<'a> {
    type Value = u32;

    fn parse_header(&mut self) -> Result<()> {
        match self.state {
            DecoderState::Ready => return Ok(()),
            DecoderState::Failed => return Err(BlockError::DecoderFailed),
            DecoderState::Unparsed => {}
        }

        match self.parse() {
            Ok((header, group_offsets)) => {
                debug!(
                    "Parsed int block: {} values from ordinal {} in {} groups",
                    header.count,
                    header.ordinal_base,
                    group_offsets.len()
                );
                self.header = header;
                self.group_offsets = group_offsets;
                self.state = DecoderState::Ready;
                Ok(())
            }
            Err(e) => {
                warn!("Rejected int block of {} bytes: {}", self.data.len(), e);
                self.state = DecoderState::Failed;
                Err(e)
            }
        }
    }

    fn state(&self) -> DecoderState {
        self.state
    }

    fn count(&self) -> usize {
        self.header.count as usize
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn ordinal_base(&self) -> u32 {
        self.header.ordinal_base
    }

    fn get_next_values(&mut self, n: usize, out: &mut Vec<u32>) -> usize {
        if self.state != DecoderState::Ready {
            return 0;
        }

        let to_produce = n.min(self.count() - self.cursor);
        out.reserve(to_produce);

        let mut produced = 0;
        while produced < to_produce {
            let remaining = to_produce - produced;

            if self.pending_pos < self.pending_len {
                let take = remaining.min(self.pending_len - self.pending_pos);
                out.extend_from_slice(&self.pending[self.pending_pos..self.pending_pos + take]);
                self.pending_pos += take;
                produced += take;
                continue;
            }

            // Pending is drained, so the read position sits on a group boundary
            let group = (self.cursor + produced) / GROUP_SIZE;
            if remaining >= GROUP_SIZE {
                let (values, _) =
                    group_varint::read_group(&self.data[self.group_offsets[group]..]);
                out.extend_from_slice(&values);
                produced += GROUP_SIZE;
            } else {
                self.load_group(group, 0);
            }
        }

        self.cursor += to_produce;
        to_produce
    }

    fn seek_to_position(&mut self, pos: usize) {
        assert_seekable(self.state, pos, self.count());

        self.load_group(pos / GROUP_SIZE, pos % GROUP_SIZE);
        self.cursor = pos;
        trace!("Int block seek to ordinal {}", self.ordinal_pos());
    }

    fn seek_to_start(&mut self) {
        if self.count() == 0 {
            assert!(
                self.state == DecoderState::Ready,
                "seek on a decoder in state {:?}",
                self.state
            );
            self.cursor = 0;
            self.pending_pos = 0;
            self.pending_len = 0;
            return;
        }
        self.seek_to_position(0);
    }
}
