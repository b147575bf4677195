//! String blocks
//!
//! Layout:
//!
//! ```text
//! [header group: count, ordinal_base, restart_interval, 0]
//! [restart table: u32 LE body offset × ⌈count / restart_interval⌉]
//! [body: (varint len)(bytes) × count]
//! ```
//!
//! Every `restart_interval`-th string is a restart point whose body offset is
//! recorded, so a seek jumps to the nearest restart at or before the target
//! and skips at most `restart_interval - 1` entries. Strings are stored whole,
//! and the decoder hands out slices of the block without copying.

use super::{assert_seekable, BlockBuilder, BlockDecoder, DecoderState, HEADER_RESERVE};
use crate::config::WriterOptions;
use crate::error::{BlockError, Result};
use crate::header::BlockHeader;
use crate::varint::{self, varint_len};
use tracing::{debug, error, trace, warn};

const RESTART_ENTRY_LEN: usize = 4;

/// Length prefix for a string, or `None` when it is too long to store
fn encodable_len(len: usize) -> Option<u32> {
    u32::try_from(len).ok()
}

/// Accumulates byte strings for one string block
#[derive(Debug, Clone)]
pub struct StringBlockBuilder {
    max_block_bytes: usize,
    restart_interval: usize,
    /// Encoded entries
    body: Vec<u8>,
    /// Body offset of every restart point
    restarts: Vec<usize>,
    count: usize,
    buffer: Vec<u8>,
}

impl StringBlockBuilder {
    pub fn new(options: &WriterOptions) -> Self {
        StringBlockBuilder {
            max_block_bytes: options.max_block_bytes,
            restart_interval: options.restart_interval.max(1),
            body: Vec::new(),
            restarts: Vec::new(),
            count: 0,
            buffer: Vec::new(),
        }
    }

    /// Encoded size of the next entry, restart table slot included
    fn entry_cost(&self, position: usize, len: u32) -> usize {
        let restart = if position % self.restart_interval == 0 {
            RESTART_ENTRY_LEN
        } else {
            0
        };
        restart + varint_len(len) + len as usize
    }
}

impl BlockBuilder for StringBlockBuilder {
    type Item<'v> = &'v [u8];

    fn add<'v>(&mut self, values: &[Self::Item<'v>]) -> usize {
        let mut size = self.estimated_size();
        let mut taken = 0;

        for value in values {
            let position = self.count + taken;
            let Some(len) = encodable_len(value.len()) else {
                error!(
                    "String of {} bytes at position {} exceeds the block format limit",
                    value.len(),
                    position
                );
                break;
            };
            let cost = self.entry_cost(position, len);
            if position > 0 && size + cost > self.max_block_bytes {
                break;
            }
            size += cost;
            taken += 1;
        }

        for value in &values[..taken] {
            if self.count % self.restart_interval == 0 {
                self.restarts.push(self.body.len());
            }
            varint::encode_varint32(value.len() as u32, &mut self.body);
            self.body.extend_from_slice(value);
            self.count += 1;
        }

        taken
    }

    fn count(&self) -> usize {
        self.count
    }

    fn estimated_size(&self) -> usize {
        HEADER_RESERVE + self.restarts.len() * RESTART_ENTRY_LEN + self.body.len()
    }

    fn is_full(&self) -> bool {
        self.count > 0 && self.estimated_size() + self.entry_cost(self.count, 0) > self.max_block_bytes
    }

    fn reset(&mut self) {
        self.body.clear();
        self.restarts.clear();
        self.count = 0;
        self.buffer.clear();
    }

    fn finish(&mut self, ordinal_base: u32) -> Result<&[u8]> {
        let count = u32::try_from(self.count)
            .ok()
            .filter(|count| ordinal_base.checked_add(*count).is_some())
            .ok_or(BlockError::OrdinalOverflow {
                base: ordinal_base,
                count: self.count,
            })?;

        let restart_interval = u32::try_from(self.restart_interval).map_err(|_| {
            BlockError::InvalidConfig(format!(
                "restart_interval must fit in u32 (got {})",
                self.restart_interval
            ))
        })?;
        if u32::try_from(self.body.len()).is_err() {
            return Err(BlockError::InvalidConfig(format!(
                "string block body of {} bytes needs max_block_bytes within u32",
                self.body.len()
            )));
        }

        self.buffer.clear();
        self.buffer.reserve(self.estimated_size());
        BlockHeader::new(count, ordinal_base, restart_interval).encode_into(&mut self.buffer);
        for &offset in &self.restarts {
            // offset <= body length, checked above
            self.buffer.extend_from_slice(&(offset as u32).to_le_bytes());
        }
        self.buffer.extend_from_slice(&self.body);

        debug!(
            "Sealed string block: {} values from ordinal {} in {} bytes ({} restarts)",
            count,
            ordinal_base,
            self.buffer.len(),
            self.restarts.len()
        );

        Ok(&self.buffer)
    }
}

/// Reads a string block, yielding slices that borrow the block bytes
#[derive(Debug, Clone)]
pub struct StringBlockDecoder<'a> {
    data: &'a [u8],
    state: DecoderState,
    header: BlockHeader,
    /// Body offset of every restart point
    restarts: Vec<usize>,
    body: &'a [u8],
    cursor: usize,
    /// Body offset of the entry at `cursor`
    offset: usize,
}

impl<'a> StringBlockDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        StringBlockDecoder {
            data,
            state: DecoderState::Unparsed,
            header: BlockHeader::default(),
            restarts: Vec::new(),
            body: &[],
            cursor: 0,
            offset: 0,
        }
    }

    /// Parsed header (all zeros until `parse_header` succeeds)
    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    fn parse(&self) -> Result<(BlockHeader, Vec<usize>, &'a [u8])> {
        let data = self.data;
        let (header, header_len) = BlockHeader::decode(data)?;
        let count = header.count as usize;
        let interval = header.restart_interval as usize;

        if count > 0 && interval == 0 {
            return Err(BlockError::CorruptHeader(
                "string block has a zero restart interval".to_string(),
            ));
        }

        let num_restarts = if count == 0 { 0 } else { count.div_ceil(interval) };
        let rest = &data[header_len..];
        let table_len = num_restarts
            .checked_mul(RESTART_ENTRY_LEN)
            .filter(|len| *len <= rest.len())
            .ok_or(BlockError::Truncated {
                needed: header_len.saturating_add(num_restarts.saturating_mul(RESTART_ENTRY_LEN)),
                available: data.len(),
            })?;

        let (table, body) = rest.split_at(table_len);
        let restarts: Vec<usize> = table
            .chunks_exact(RESTART_ENTRY_LEN)
            .map(|entry| u32::from_le_bytes([entry[0], entry[1], entry[2], entry[3]]) as usize)
            .collect();

        // Walk every entry once so reads never hit malformed bytes later
        let mut offset = 0;
        for index in 0..count {
            if index % interval == 0 && restarts[index / interval] != offset {
                return Err(BlockError::CorruptBody(format!(
                    "restart {} points at {} but entry {} starts at {}",
                    index / interval,
                    restarts[index / interval],
                    index,
                    offset
                )));
            }

            let (len, prefix) = varint::decode_varint32(&body[offset..])?;
            let end = offset + prefix + len as usize;
            if end > body.len() {
                return Err(BlockError::Truncated {
                    needed: header_len + table_len + end,
                    available: data.len(),
                });
            }
            offset = end;
        }

        if offset != body.len() {
            return Err(BlockError::CorruptBody(format!(
                "{} trailing bytes after last string",
                body.len() - offset
            )));
        }

        Ok((header, restarts, body))
    }

    /// Entry starting at body `offset` and the offset of the one after it
    fn entry_at(&self, offset: usize) -> (&'a [u8], usize) {
        let body = self.body;
        let (len, prefix) = varint::read_varint32(&body[offset..]);
        let start = offset + prefix;
        let end = start + len as usize;
        (&body[start..end], end)
    }
}

impl<'a> BlockDecoder for StringBlockDecoder<'a> {
    type Value = &'a [u8];

    fn parse_header(&mut self) -> Result<()> {
        match self.state {
            DecoderState::Ready => return Ok(()),
            DecoderState::Failed => return Err(BlockError::DecoderFailed),
            DecoderState::Unparsed => {}
        }

        match self.parse() {
            Ok((header, restarts, body)) => {
                debug!(
                    "Parsed string block: {} values from ordinal {}, {} restarts, {} body bytes",
                    header.count,
                    header.ordinal_base,
                    restarts.len(),
                    body.len()
                );
                self.header = header;
                self.restarts = restarts;
                self.body = body;
                self.state = DecoderState::Ready;
                Ok(())
            }
            Err(e) => {
                warn!("Rejected string block of {} bytes: {}", self.data.len(), e);
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

    fn get_next_values(&mut self, n: usize, out: &mut Vec<&'a [u8]>) -> usize {
        if self.state != DecoderState::Ready {
            return 0;
        }

        let to_produce = n.min(self.count() - self.cursor);
        out.reserve(to_produce);

        for _ in 0..to_produce {
            let (value, next) = self.entry_at(self.offset);
            out.push(value);
            self.offset = next;
        }

        self.cursor += to_produce;
        to_produce
    }

    fn seek_to_position(&mut self, pos: usize) {
        assert_seekable(self.state, pos, self.count());

        let interval = self.header.restart_interval as usize;
        let restart = pos / interval;
        let restart_pos = restart * interval;

        // Skip forward from the current entry when it shares the restart run
        if !(restart_pos..=pos).contains(&self.cursor) {
            self.cursor = restart_pos;
            self.offset = self.restarts[restart];
        }

        while self.cursor < pos {
            let (_, next) = self.entry_at(self.offset);
            self.offset = next;
            self.cursor += 1;
        }

        trace!("String block seek to ordinal {}", self.ordinal_pos());
    }

    fn seek_to_start(&mut self) {
        if self.count() == 0 {
            assert!(
                self.state == DecoderState::Ready,
                "seek on a decoder in state {:?}",
                self.state
            );
            self.cursor = 0;
            self.offset = 0;
            return;
        }
        self.seek_to_position(0);
    }
}
