#![no_main]

use codewise_git::parser::{parse_log, patch_commit_hash};
use codewise_git::truncate::truncate_chars;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        for commit in parse_log(text) {
            let _ = commit.listing_lines();
        }
        let _ = patch_commit_hash(text);
        let cut = truncate_chars(text, data.len() / 2);
        assert!(text.starts_with(cut));
    }
});
