#![no_main]
use arbitrary::Arbitrary;
use colblock::{
    BlockBuilder, BlockDecoder, IntBlockBuilder, IntBlockDecoder, StringBlockBuilder,
    StringBlockDecoder, WriterOptions,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    ints: Vec<u32>,
    strings: Vec<Vec<u8>>,
    max_block_bytes: u16,
    restart_interval: u8,
    ordinal_base: u32,
}

fuzz_target!(|input: Input| {
    let options = WriterOptions::default()
        .with_max_block_bytes((input.max_block_bytes as usize).max(34))
        .with_restart_interval((input.restart_interval as usize).max(1));
    let base = input.ordinal_base / 2;

    let mut builder = IntBlockBuilder::new(&options);
    let taken = builder.add(&input.ints);
    let block = builder.finish(base).unwrap().to_vec();
    assert!(block.len() <= options.max_block_bytes || taken == 1);

    let mut decoder = IntBlockDecoder::new(&block);
    decoder.parse_header().unwrap();
    assert_eq!(colblock::drain_all(&mut decoder), &input.ints[..taken]);

    let strings: Vec<&[u8]> = input.strings.iter().map(|s| s.as_slice()).collect();
    let mut builder = StringBlockBuilder::new(&options);
    let taken = builder.add(&strings);
    let block = builder.finish(base).unwrap().to_vec();

    let mut decoder = StringBlockDecoder::new(&block);
    decoder.parse_header().unwrap();
    assert_eq!(colblock::drain_all(&mut decoder), &strings[..taken]);
});
