#![no_main]

use codewise_lgpd::{MARKUP_CHARS, normalize_line, parse_verdict};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = parse_verdict(text);
        for line in text.lines() {
            let normalized = normalize_line(line);
            assert!(!normalized.chars().any(|c| MARKUP_CHARS.contains(&c)));
        }
    }
});
