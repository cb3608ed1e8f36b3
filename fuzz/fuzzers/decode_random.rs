#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate b64dec;

use b64dec::decode::{DecodeConfig, GroupDecoder};
use std::ops::ControlFlow;

fuzz_target!(|data: &[u8]| {
    let strict = data.first().map_or(false, |b| b & 1 == 1);
    let decoder = GroupDecoder::new(DecodeConfig::new().with_decode_allow_trailing_bits(!strict));

    // The data probably isn't valid base64 input, but as long as it returns an error instead
    // of crashing, that's correct behavior.
    let _ = b64dec::decode(data);

    let mut out = Vec::new();
    let report =
        b64dec::stream::decode_stream(data, &mut out, &decoder, |_| ControlFlow::Continue(()))
            .unwrap();

    assert_eq!(report.bytes_written, out.len());
    assert!(out.len() <= report.groups * 3);
});
