//! Columnar Block Codecs
//!
//! Packs per-column values into size-bounded, independently decodable blocks,
//! each covering a contiguous range of ordinal positions (row indexes).
//!
//! ## Features
//!
//! - **Group-varint** packing of `u32` values, four per tag byte
//! - **Integer blocks** with sequential scan and O(1) positional seek
//! - **String blocks** with restart points and zero-copy reads
//! - **Byte budgets**: `add` takes only what fits, callers loop until done
//! - **Strict parsing**: malformed blocks are rejected up front, never panicked on
//!
//! ## Modules
//!
//! - [`error`] - Error types for block operations
//! - [`config`] - Writer options (block budget, restart interval)
//! - [`group_varint`] - Group-varint codec for four `u32` values
//! - [`varint`] - LEB128 varints for string lengths
//! - [`header`] - Header framing shared by both block kinds
//! - [`block`] - Builder/decoder traits and their implementations:
//!   - [`block::int_block`] - Integer blocks
//!   - [`block::string_block`] - String blocks
//!
//! ## Example Usage
//!
//! ```rust
//! use colblock::{BlockBuilder, BlockDecoder, IntBlockBuilder, IntBlockDecoder, WriterOptions};
//!
//! let options = WriterOptions::default();
//! let mut builder = IntBlockBuilder::new(&options);
//!
//! let values: Vec<u32> = (0..10).map(|i| i * 300).collect();
//! let mut remaining = &values[..];
//! while !remaining.is_empty() {
//!     let added = builder.add(remaining);
//!     assert!(added > 0);
//!     remaining = &remaining[added..];
//! }
//!
//! let block = builder.finish(1000).unwrap().to_vec();
//! builder.reset();
//!
//! let mut decoder = IntBlockDecoder::new(&block);
//! decoder.parse_header().unwrap();
//! assert_eq!(decoder.ordinal_pos(), 1000);
//!
//! decoder.seek_to_position(7);
//! let mut out = Vec::new();
//! assert_eq!(decoder.get_next_values(5, &mut out), 3);
//! assert_eq!(out, vec![2100, 2400, 2700]);
//! assert!(!decoder.has_next());
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Block                                        │
//! ├──────────────────────────────────────────────┤
//! │ Header group (count, base, restart, 0)       │
//! ├──────────────────────────────────────────────┤
//! │ Int:    group-varint groups of 4             │
//! │ String: restart table + length-prefixed data │
//! └──────────────────────────────────────────────┘
//! ```

pub mod block;
pub mod config;
pub mod error;
pub mod group_varint;
pub mod header;
pub mod varint;

pub use block::{
    drain_all, BlockBuilder, BlockDecoder, DecoderState, IntBlockBuilder, IntBlockDecoder,
    StringBlockBuilder, StringBlockDecoder,
};
pub use config::WriterOptions;
pub use error::{BlockError, Result};
pub use header::BlockHeader;
