#![no_main]

use codewise_git::blame::{parse_blame, render_blame};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let shares = parse_blame(text);
        let _ = render_blame("fuzz.rs", &shares);
    }
});
