#![no_main]
use colblock::{BlockDecoder, StringBlockDecoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut decoder = StringBlockDecoder::new(data);
    if decoder.parse_header().is_err() {
        return;
    }

    let count = decoder.count();
    let values = colblock::drain_all(&mut decoder);
    assert_eq!(values.len(), count);

    for pos in (0..count).rev().step_by(3) {
        decoder.seek_to_position(pos);
        let mut out = Vec::new();
        decoder.get_next_values(1, &mut out);
        assert_eq!(out[0], values[pos]);
    }
});
