//! Chunk plans and runners for streaming parity checks.
//!
//! Provides deterministic chunk plans plus seeded fuzz plans so chunk-boundary
//! coverage is reproducible in CI. Chunks are always cut on UTF-8 char
//! boundaries since the tokenizer is fed `&str`.

use crate::{BlockErrorKind, BlockTokenizer, TokenizerConfig};
use std::fmt;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ChunkPlan {
    Fixed { size: usize },
    Boundaries { indices: Vec<usize> },
}

impl fmt::Display for ChunkPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkPlan::Fixed { size } => write!(f, "fixed size={size}"),
            ChunkPlan::Boundaries { indices } => {
                write!(f, "boundaries count={} indices={indices:?}", indices.len())
            }
        }
    }
}

impl ChunkPlan {
    pub fn fixed(size: usize) -> Self {
        Self::Fixed { size }
    }

    pub fn boundaries(indices: impl Into<Vec<usize>>) -> Self {
        Self::Boundaries {
            indices: indices.into(),
        }
    }

    /// Split `input` into chunks following this plan. Cut points that do not
    /// fall on a char boundary are moved forward to the next one.
    pub fn chunks<'a>(&self, input: &'a str) -> Vec<&'a str> {
        let mut points = match self {
            ChunkPlan::Fixed { size } => {
                assert!(*size > 0, "chunk size must be > 0");
                (1..)
                    .map(|n| n * size)
                    .take_while(|&at| at < input.len())
                    .collect::<Vec<_>>()
            }
            ChunkPlan::Boundaries { indices } => indices.clone(),
        };
        for point in &mut points {
            while *point < input.len() && !input.is_char_boundary(*point) {
                *point += 1;
            }
        }
        points.retain(|&at| at > 0 && at < input.len());
        points.sort_unstable();
        points.dedup();

        let mut out = Vec::with_capacity(points.len() + 1);
        let mut start = 0;
        for at in points {
            out.push(&input[start..at]);
            start = at;
        }
        if start < input.len() {
            out.push(&input[start..]);
        }
        out
    }
}

#[derive(Clone, Debug)]
pub struct ChunkPlanCase {
    pub label: String,
    pub plan: ChunkPlan,
}

/// Build deterministic + fuzz chunk plans for the given input.
///
/// - Deterministic includes fixed sizes and boundary-aware splits around
///   `<`, `>`, `-`, `]` and `!`.
/// - Fuzz plans are seeded for CI reproducibility.
pub fn build_chunk_plans(input: &str, fuzz_runs: usize, fuzz_seed: u64) -> Vec<ChunkPlanCase> {
    let mut plans = Vec::new();

    for size in [1usize, 2, 3, 4, 8, 16, 32, 64] {
        plans.push(ChunkPlanCase {
            label: format!("fixed size={size}"),
            plan: ChunkPlan::fixed(size),
        });
    }

    let markers = marker_boundaries(input);
    if !markers.is_empty() {
        plans.push(ChunkPlanCase {
            label: format!("marker-boundaries count={}", markers.len()),
            plan: ChunkPlan::boundaries(markers.clone()),
        });
    }

    if fuzz_runs > 0 {
        let mut candidates = char_boundaries(input);
        candidates.extend(markers);
        candidates.sort_unstable();
        candidates.dedup();
        for i in 0..fuzz_runs {
            let seed = fuzz_seed.wrapping_add(i as u64);
            let mut rng = Lcg::new(seed);
            let plan = if candidates.is_empty() {
                ChunkPlan::fixed(1)
            } else {
                let max = candidates.len().clamp(1, 32);
                let mut picks = candidates.clone();
                rng.shuffle(&mut picks);
                picks.truncate(1 + rng.gen_range(max));
                ChunkPlan::boundaries(picks)
            };
            plans.push(ChunkPlanCase {
                label: format!("fuzz boundaries seed=0x{seed:016x}"),
                plan,
            });
        }
    }

    plans
}

/// Every internal char boundary of `input`.
pub fn char_boundaries(input: &str) -> Vec<usize> {
    input
        .char_indices()
        .map(|(idx, _)| idx)
        .filter(|&idx| idx != 0)
        .collect()
}

fn marker_boundaries(input: &str) -> Vec<usize> {
    let bytes = input.as_bytes();
    let mut out = Vec::new();
    for (i, b) in bytes.iter().enumerate() {
        if matches!(b, b'<' | b'>' | b'-' | b']' | b'!') {
            out.push(i);
            if i + 1 < bytes.len() {
                out.push(i + 1);
            }
        }
    }
    out.retain(|&at| at > 0);
    out.sort_unstable();
    out.dedup();
    out
}

/// What a caller observes after feeding a block.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FeedOutcome {
    pub output: String,
    pub complete: bool,
    pub first_tag: Option<String>,
    /// Remainder plus any chunks left unfed after completion.
    pub trailing: String,
    pub error: Option<BlockErrorKind>,
}

pub fn run_one_shot(input: &str, config: &TokenizerConfig) -> FeedOutcome {
    run_chunks(&[input], config)
}

pub fn run_plan(input: &str, plan: &ChunkPlan, config: &TokenizerConfig) -> FeedOutcome {
    run_chunks(&plan.chunks(input), config)
}

/// Feed `chunks` in order, stopping at completion or at the first error.
pub fn run_chunks(chunks: &[&str], config: &TokenizerConfig) -> FeedOutcome {
    let mut tokenizer = BlockTokenizer::with_config(config.clone());
    let mut error = None;
    let mut fed = 0;
    for chunk in chunks {
        fed += 1;
        if let Err(err) = tokenizer.feed(chunk) {
            error = Some(err.kind);
            break;
        }
        if tokenizer.is_complete() {
            break;
        }
    }
    let mut trailing = if error.is_some() {
        String::new()
    } else {
        tokenizer.unconsumed_remainder().to_string()
    };
    if error.is_none() {
        for chunk in &chunks[fed..] {
            trailing.push_str(chunk);
        }
    }
    FeedOutcome {
        output: tokenizer.consumed_output().to_string(),
        complete: tokenizer.is_complete(),
        first_tag: tokenizer.first_tag_name().map(str::to_string),
        trailing,
        error,
    }
}

/// Assert that every plan from [`build_chunk_plans`], and a split at every
/// single char boundary, matches one-shot feeding.
///
/// Outputs are only compared for inputs that do not fail: where a failure
/// surfaces depends on how much input was buffered, but the kind must match.
pub fn assert_chunk_parity(input: &str, config: &TokenizerConfig, fuzz_runs: usize, seed: u64) {
    let expected = run_one_shot(input, config);
    let check = |label: &str, actual: FeedOutcome| {
        if expected.error.is_some() {
            assert_eq!(
                actual.error, expected.error,
                "error kind differs for {label}\ninput={input:?}"
            );
            return;
        }
        assert_eq!(
            actual, expected,
            "chunked run differs from one-shot for {label}\ninput={input:?}"
        );
    };
    for case in build_chunk_plans(input, fuzz_runs, seed) {
        check(&case.label, run_plan(input, &case.plan, config));
    }
    for at in char_boundaries(input) {
        let (head, tail) = input.split_at(at);
        check(&format!("split at={at}"), run_chunks(&[head, tail], config));
    }
}

struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }

    fn gen_range(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        (self.next_u64() >> 32) as usize % upper
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        if items.len() < 2 {
            return;
        }
        for i in (1..items.len()).rev() {
            let j = self.gen_range(i + 1);
            items.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_plan_respects_char_boundaries() {
        let chunks = ChunkPlan::fixed(1).chunks("aé<");
        assert_eq!(chunks, vec!["a", "é", "<"]);
    }

    #[test]
    fn boundaries_are_normalized() {
        let chunks = ChunkPlan::boundaries(vec![3, 0, 1, 1, 99]).chunks("<p>x");
        assert_eq!(chunks, vec!["<", "p>", "x"]);
    }

    #[test]
    fn fuzz_plans_are_reproducible() {
        let input = "<div><!-- a - b --></div>";
        let a = build_chunk_plans(input, 4, 7);
        let b = build_chunk_plans(input, 4, 7);
        let a: Vec<_> = a.into_iter().map(|c| c.plan).collect();
        let b: Vec<_> = b.into_iter().map(|c| c.plan).collect();
        assert_eq!(a, b);
    }
}
