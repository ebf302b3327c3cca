#![no_main]
use libfuzzer_sys::fuzz_target;
use oauth_encoding::{decode, encode};

fuzz_target!(|data: &str| {
    let encoded = encode(data);
    assert_eq!(decode(&encoded).unwrap(), data);

    // Arbitrary input either decodes or fails cleanly.
    let _ = decode(data);
});
