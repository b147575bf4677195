//! Splitting a column across several budget-bounded blocks
//!
//! Drives builders the way an enclosing container does: add until the
//! builder stops taking values, seal with the next ordinal, record the range,
//! reset, repeat. Then reads rows back by ordinal position.

use colblock::{
    BlockBuilder, BlockDecoder, BlockHeader, IntBlockBuilder, IntBlockDecoder, StringBlockBuilder,
    StringBlockDecoder, WriterOptions,
};
use std::ops::Range;

struct SealedBlock {
    range: Range<u32>,
    bytes: Vec<u8>,
}

fn seal_column<B>(builder: &mut B, values: &[B::Item<'_>]) -> Vec<SealedBlock>
where
    B: BlockBuilder,
{
    let mut blocks = Vec::new();
    let mut next_ordinal = 0u32;
    let mut remaining = values;

    while !remaining.is_empty() {
        let added = builder.add(remaining);
        assert!(added > 0 || !builder.is_empty(), "empty builder refused a value");
        remaining = &remaining[added..];

        if added == 0 || remaining.is_empty() {
            let count = builder.count() as u32;
            let bytes = builder.finish(next_ordinal).unwrap().to_vec();
            blocks.push(SealedBlock {
                range: next_ordinal..next_ordinal + count,
                bytes,
            });
            next_ordinal += count;
            builder.reset();
        }
    }

    blocks
}

fn find_block(blocks: &[SealedBlock], ordinal: u32) -> &SealedBlock {
    let idx = blocks.partition_point(|b| b.range.end <= ordinal);
    &blocks[idx]
}

#[test]
fn test_int_column_across_blocks() {
    let values: Vec<u32> = (0..5000u32).map(|i| i * 31).collect();
    let options = WriterOptions::default().with_max_block_bytes(512);
    let mut builder = IntBlockBuilder::new(&options);

    let blocks = seal_column(&mut builder, &values);
    assert!(blocks.len() > 1);
    assert_eq!(blocks.last().unwrap().range.end, values.len() as u32);

    for block in &blocks {
        assert!(block.bytes.len() <= 512);
        let mut decoder = IntBlockDecoder::new(&block.bytes);
        decoder.parse_header().unwrap();
        assert_eq!(decoder.header().ordinal_range(), block.range);
    }

    for ordinal in (0..values.len() as u32).step_by(7) {
        let block = find_block(&blocks, ordinal);
        let mut decoder = IntBlockDecoder::new(&block.bytes);
        decoder.parse_header().unwrap();
        decoder.seek_to_position((ordinal - block.range.start) as usize);
        assert_eq!(decoder.ordinal_pos(), ordinal);

        let mut out = Vec::new();
        decoder.get_next_values(1, &mut out);
        assert_eq!(out[0], values[ordinal as usize]);
    }
}

#[test]
fn test_string_column_across_blocks() {
    let owned: Vec<String> = (0..3000).map(|i| format!("row {:05} payload", i)).collect();
    let values: Vec<&[u8]> = owned.iter().map(|s| s.as_bytes()).collect();
    let options = WriterOptions::default()
        .with_max_block_bytes(1024)
        .with_restart_interval(8);
    let mut builder = StringBlockBuilder::new(&options);

    let blocks = seal_column(&mut builder, &values);
    assert!(blocks.len() > 1);

    let mut decoded = Vec::new();
    for block in &blocks {
        assert!(block.bytes.len() <= 1024);
        let mut decoder = StringBlockDecoder::new(&block.bytes);
        decoder.parse_header().unwrap();
        assert_eq!(decoder.ordinal_pos(), block.range.start);
        decoded.extend(colblock::drain_all(&mut decoder));
    }
    assert_eq!(decoded, values);

    let ordinal = 2222;
    let block = find_block(&blocks, ordinal);
    let mut decoder = StringBlockDecoder::new(&block.bytes);
    decoder.parse_header().unwrap();
    decoder.seek_to_position((ordinal - block.range.start) as usize);
    let mut out = Vec::new();
    decoder.get_next_values(1, &mut out);
    assert_eq!(out[0], b"row 02222 payload");
}

#[test]
fn test_header_range_matches_seal() {
    let mut builder = IntBlockBuilder::new(&WriterOptions::default());
    builder.add(&[5, 6, 7]);
    let block = builder.finish(40).unwrap().to_vec();

    let (header, _) = BlockHeader::decode(&block).unwrap();
    assert_eq!(header.ordinal_range(), 40..43);
}
