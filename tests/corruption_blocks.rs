//! Block corruption detection tests
//!
//! Verifies that decoders reject truncated or damaged blocks with an error
//! instead of panicking, and that a rejected decoder stays unusable.

use colblock::{
    BlockBuilder, BlockDecoder, BlockError, DecoderState, IntBlockBuilder, IntBlockDecoder,
    StringBlockBuilder, StringBlockDecoder, WriterOptions,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn int_block() -> Vec<u8> {
    let values: Vec<u32> = (0..37u32).map(|i| i.wrapping_mul(0x9E37_79B9)).collect();
    let mut builder = IntBlockBuilder::new(&WriterOptions::default());
    builder.add(&values);
    builder.finish(1000).unwrap().to_vec()
}

fn string_block() -> Vec<u8> {
    let owned: Vec<String> = (0..37).map(|i| format!("entry-{}", i * i)).collect();
    let values: Vec<&[u8]> = owned.iter().map(|s| s.as_bytes()).collect();
    let options = WriterOptions::default().with_restart_interval(4);
    let mut builder = StringBlockBuilder::new(&options);
    builder.add(&values);
    builder.finish(1000).unwrap().to_vec()
}

/// Parse `block`; on success read it fully and seek to every position
fn exercise<D: BlockDecoder>(mut decoder: D) -> bool {
    if decoder.parse_header().is_err() {
        assert_eq!(decoder.state(), DecoderState::Failed);
        assert!(!decoder.has_next());
        assert!(matches!(
            decoder.parse_header(),
            Err(BlockError::DecoderFailed)
        ));
        return false;
    }

    let count = decoder.count();
    assert_eq!(colblock::drain_all(&mut decoder).len(), count);
    for pos in 0..count {
        decoder.seek_to_position(pos);
        let mut out = Vec::new();
        assert_eq!(decoder.get_next_values(1, &mut out), 1);
    }
    true
}

#[test]
fn test_every_truncation_is_rejected() {
    let block = int_block();
    for len in 0..block.len() {
        assert!(
            !exercise(IntBlockDecoder::new(&block[..len])),
            "int block prefix of {} bytes parsed",
            len
        );
    }

    let block = string_block();
    for len in 0..block.len() {
        assert!(
            !exercise(StringBlockDecoder::new(&block[..len])),
            "string block prefix of {} bytes parsed",
            len
        );
    }
}

#[test]
fn test_trailing_garbage_is_rejected() {
    let mut block = int_block();
    block.extend_from_slice(&[0xAA, 0xBB]);
    let mut decoder = IntBlockDecoder::new(&block);
    assert!(matches!(
        decoder.parse_header(),
        Err(BlockError::CorruptBody(_))
    ));

    let mut block = string_block();
    block.push(0);
    let mut decoder = StringBlockDecoder::new(&block);
    assert!(matches!(
        decoder.parse_header(),
        Err(BlockError::CorruptBody(_))
    ));
}

#[test]
fn test_single_bit_flips_never_panic() {
    let mut rng = StdRng::seed_from_u64(2012);

    for block in [int_block(), string_block()] {
        let total_bits = block.len() * 8;
        for _ in 0..500 {
            let mut damaged = block.clone();
            let bit = rng.gen_range(0..total_bits);
            damaged[bit / 8] ^= 1 << (bit % 8);

            exercise(IntBlockDecoder::new(&damaged));
            exercise(StringBlockDecoder::new(&damaged));
        }
    }
}

#[test]
fn test_random_bytes_never_panic() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..2000 {
        let len = rng.gen_range(0..64);
        let data: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
        exercise(IntBlockDecoder::new(&data));
        exercise(StringBlockDecoder::new(&data));
    }
}

#[test]
fn test_header_claims_too_many_values() {
    let mut block = Vec::new();
    colblock::BlockHeader::new(u32::MAX - 10, 0, 0).encode_into(&mut block);
    block.extend_from_slice(&[0; 5]);

    let mut decoder = IntBlockDecoder::new(&block);
    assert!(matches!(
        decoder.parse_header(),
        Err(BlockError::Truncated { .. })
    ));
}

#[test]
fn test_reads_on_failed_decoder_return_nothing() {
    let mut decoder = StringBlockDecoder::new(&[0xFF]);
    assert!(decoder.parse_header().is_err());
    assert_eq!(decoder.count(), 0);
    assert_eq!(decoder.get_next_values(10, &mut Vec::new()), 0);
}
