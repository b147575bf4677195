//! Block builders and decoders
//!
//! Two capabilities, each with an integer and a string implementation:
//!
//! - [`BlockBuilder`]: accumulate values under a byte budget, then seal them
//!   into an immutable block tagged with its first ordinal position.
//! - [`BlockDecoder`]: parse a sealed block and read it sequentially or by
//!   ordinal position.
//!
//! ```text
//! caller ──add()*──▶ builder ──finish(base)──▶ &[u8] ──▶ container
//! container ──bytes──▶ decoder ──parse_header()──▶ get_next_values() / seek_to_position()
//! ```

pub mod int_block;
pub mod string_block;

use crate::error::Result;

pub use int_block::{IntBlockBuilder, IntBlockDecoder};
pub use string_block::{StringBlockBuilder, StringBlockDecoder};

/// Space held back in every size estimate for the block header
pub(crate) const HEADER_RESERVE: usize = crate::group_varint::MAX_GROUP_LEN;

/// Accumulates values for a single block
pub trait BlockBuilder {
    /// Value type accepted by `add`
    type Item<'v>;

    /// Append a prefix of `values`, returning how many were taken
    ///
    /// Stops before the first value that would push the sealed size past the
    /// configured budget. An empty builder always takes at least one value
    /// unless that value cannot be encoded at all (a string of 4 GiB or more).
    /// Returns 0 for empty input, for such an unencodable value, or when the
    /// budget is already used up, and leaves the builder untouched.
    fn add<'v>(&mut self, values: &[Self::Item<'v>]) -> usize;

    /// Number of pending values
    fn count(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Upper bound on the size `finish` would produce right now
    fn estimated_size(&self) -> usize;

    /// True when not even the smallest possible value would fit
    fn is_full(&self) -> bool;

    /// Discard pending values and budget usage
    fn reset(&mut self);

    /// Seal pending values into a block starting at `ordinal_base`
    ///
    /// The returned bytes borrow the builder. Pending values are kept, so
    /// call `reset` before building the next block.
    fn finish(&mut self, ordinal_base: u32) -> Result<&[u8]>;
}

/// Decoder lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    /// Header not parsed yet
    Unparsed,
    /// Header parsed, values can be read
    Ready,
    /// Header parse failed; the decoder is permanently unusable
    Failed,
}

/// Reads values back out of a sealed block
pub trait BlockDecoder {
    /// Value type produced by `get_next_values`
    type Value;

    /// Parse and validate the block header
    ///
    /// On failure the decoder moves to [`DecoderState::Failed`] and every
    /// later call returns [`crate::BlockError::DecoderFailed`].
    fn parse_header(&mut self) -> Result<()>;

    fn state(&self) -> DecoderState;

    /// Number of values in the block (0 until parsed)
    fn count(&self) -> usize;

    /// Index of the next value to be returned
    fn cursor(&self) -> usize;

    fn has_next(&self) -> bool {
        self.state() == DecoderState::Ready && self.cursor() < self.count()
    }

    /// Ordinal position of the first value in the block
    fn ordinal_base(&self) -> u32;

    /// Ordinal position of the next value to be returned
    fn ordinal_pos(&self) -> u32 {
        // base + cursor <= base + count, which parse_header checked fits in u32
        self.ordinal_base() + self.cursor() as u32
    }

    /// Append up to `n` values to `out`, returning how many were produced
    ///
    /// Returns fewer than `n` at the end of the block, and 0 once exhausted
    /// or when the header has not been parsed successfully.
    fn get_next_values(&mut self, n: usize, out: &mut Vec<Self::Value>) -> usize;

    /// Position the cursor on `pos`
    ///
    /// # Panics
    ///
    /// Panics if the decoder is not ready or `pos >= count()`.
    fn seek_to_position(&mut self, pos: usize);

    /// Rewind to the first value; valid on empty blocks too
    fn seek_to_start(&mut self);
}

/// Read every remaining value from a parsed decoder
pub fn drain_all<D: BlockDecoder>(decoder: &mut D) -> Vec<D::Value> {
    let remaining = decoder.count().saturating_sub(decoder.cursor());
    let mut out = Vec::with_capacity(remaining);
    while decoder.has_next() {
        if decoder.get_next_values(remaining, &mut out) == 0 {
            break;
        }
    }
    out
}

pub(crate) fn assert_seekable(state: DecoderState, pos: usize, count: usize) {
    assert!(
        state == DecoderState::Ready,
        "seek on a decoder in state {:?}",
        state
    );
    assert!(
        pos < count,
        "seek position {} out of range for block of {} values",
        pos,
        count
    );
}
