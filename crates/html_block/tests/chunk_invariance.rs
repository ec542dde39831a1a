use html_block::TokenizerConfig;
use html_block::chunker::{build_chunk_plans, run_one_shot, run_plan};
use html_block::perf_fixtures::{make_blocks, make_script};

mod common;

use common::{CaseFilter, env_u64, error_label, load_golden_cases};

fn fuzz_settings() -> (usize, u64) {
    let mut runs = env_u64("HTML_BLOCK_CHUNK_FUZZ_RUNS", 16) as usize;
    if std::env::var("CI").is_ok() && runs == 0 {
        runs = 1;
    }
    let seed = env_u64("HTML_BLOCK_CHUNK_FUZZ_SEED", 0xC0FFEE);
    (runs, seed)
}

#[test]
fn golden_cases_are_chunk_invariant() {
    let filter = CaseFilter::from_env();
    let (runs, seed) = fuzz_settings();
    let config = TokenizerConfig::default();
    for case in load_golden_cases() {
        if !filter.matches(&case.id) {
            continue;
        }
        let whole = run_one_shot(&case.input, &config);
        if let Some(html) = &case.html {
            assert_eq!(&whole.output, html, "one-shot html mismatch in '{}'", case.id);
        }
        for plan in build_chunk_plans(&case.input, runs, seed) {
            let actual = run_plan(&case.input, &plan.plan, &config);
            if whole.error.is_some() {
                assert_eq!(
                    actual.error.as_ref().map(error_label),
                    whole.error.as_ref().map(error_label),
                    "error kind differs in '{}' [{}]",
                    case.id,
                    plan.label
                );
                continue;
            }
            assert_eq!(
                actual, whole,
                "chunked run differs in '{}' [{}]\nchunks: {:?}",
                case.id,
                plan.label,
                plan.plan.chunks(&case.input)
            );
        }
    }
}

#[test]
fn large_inputs_are_chunk_invariant() {
    let (runs, seed) = fuzz_settings();
    let config = TokenizerConfig::default();
    for input in [make_blocks(12), make_script(40)] {
        let whole = run_one_shot(&input, &config);
        assert!(whole.complete, "fixture did not complete");
        assert!(whole.error.is_none());
        for plan in build_chunk_plans(&input, runs, seed) {
            let actual = run_plan(&input, &plan.plan, &config);
            assert_eq!(actual, whole, "chunked run differs [{}]", plan.label);
        }
    }
}

#[test]
fn disabled_comment_rewrite_is_chunk_invariant() {
    let config = TokenizerConfig {
        rewrite_comment_dashes: false,
    };
    let input = "<!-- a - b --- c -->tail";
    let whole = run_one_shot(input, &config);
    assert_eq!(whole.output, "<!-- a - b --- c -->");
    assert_eq!(whole.trailing, "tail");
    for plan in build_chunk_plans(input, 8, 1) {
        assert_eq!(run_plan(input, &plan.plan, &config), whole, "[{}]", plan.label);
    }
}
