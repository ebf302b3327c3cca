#![no_main]
use libfuzzer_sys::fuzz_target;
use oauth_encoding::normalize_url;

fuzz_target!(|data: &str| {
    let Ok(once) = normalize_url(data) else {
        return;
    };

    // Normalization is idempotent: we cannot normalize beyond a
    // normalized URL.
    assert_eq!(normalize_url(&once).unwrap(), once);
});
