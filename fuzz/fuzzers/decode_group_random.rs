#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate b64dec;

fuzz_target!(|data: [u8; 4]| {
    match b64dec::decode_group(&data) {
        Ok(chunk) => {
            assert!((1..=3).contains(&chunk.len()));
            // only alphabet members can decode
            assert!(data.iter().all(|&b| b64dec::alphabet::STANDARD.is_member(b)));
        }
        Err(_) => {}
    }
    // decoding is a pure function of the group
    assert_eq!(b64dec::decode_group(&data), b64dec::decode_group(&data));
});
