#![no_main]
use colblock::{BlockDecoder, IntBlockDecoder};
use libfuzzer_sys::fuzz_target;

// Arbitrary bytes must either be rejected by parse_header or decode cleanly
fuzz_target!(|data: &[u8]| {
    let mut decoder = IntBlockDecoder::new(data);
    if decoder.parse_header().is_err() {
        return;
    }

    let count = decoder.count();
    assert_eq!(colblock::drain_all(&mut decoder).len(), count);

    if count > 0 {
        let mut out = Vec::new();
        decoder.seek_to_position(count / 2);
        assert_eq!(decoder.get_next_values(count, &mut out), count - count / 2);
    }
});
