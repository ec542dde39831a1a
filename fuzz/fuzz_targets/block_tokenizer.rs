#![no_main]

use html_block::TokenizerConfig;
use html_block::chunker::{ChunkPlan, run_one_shot, run_plan};
use libfuzzer_sys::fuzz_target;

const MAX_INPUT_BYTES: usize = 4 * 1024;

fuzz_target!(|data: &[u8]| {
    let Some((&split_seed, rest)) = data.split_first() else {
        return;
    };
    let Ok(input) = std::str::from_utf8(rest) else {
        return;
    };
    if input.len() > MAX_INPUT_BYTES {
        return;
    }
    let config = TokenizerConfig::default();
    let whole = run_one_shot(input, &config);
    if whole.error.is_none() {
        assert!(
            whole.complete || whole.trailing.is_empty(),
            "trailing text without a complete block"
        );
    }

    let size = usize::from(split_seed % 16) + 1;
    let chunked = run_plan(input, &ChunkPlan::fixed(size), &config);
    if whole.error.is_some() {
        assert_eq!(chunked.error, whole.error, "error kind differs at size={size}");
    } else {
        assert_eq!(chunked, whole, "chunked run differs at size={size}");
    }
});
