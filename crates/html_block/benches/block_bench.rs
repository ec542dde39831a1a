use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use html_block::perf_fixtures::{make_blocks, make_script};
use html_block::{BlockTokenizer, read_block};

const SMALL_BLOCKS: usize = 64;
const LARGE_BLOCKS: usize = 20_000;
const SCRIPT_LINES: usize = 20_000;

fn make_comment_adversarial(bytes: usize) -> String {
    let mut body = String::with_capacity(bytes + 32);
    body.push_str("<!--");
    while body.len() < bytes {
        body.push_str("- -- --- -");
    }
    body.push_str("-->");
    body
}

fn feed_one_shot(input: &str) -> usize {
    let mut tokenizer = BlockTokenizer::new();
    tokenizer
        .feed(input)
        .expect("bench fixture should tokenize");
    tokenizer.consumed_output().len()
}

fn bench_one_shot_small(c: &mut Criterion) {
    let input = make_blocks(SMALL_BLOCKS);
    c.bench_function("bench_one_shot_small", |b| {
        b.iter(|| black_box(feed_one_shot(black_box(&input))));
    });
}

fn bench_one_shot_large(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    c.bench_function("bench_one_shot_large", |b| {
        b.iter(|| black_box(feed_one_shot(black_box(&input))));
    });
}

fn bench_line_by_line_large(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    c.bench_function("bench_line_by_line_large", |b| {
        b.iter(|| {
            let mut lines = black_box(&input).split_inclusive('\n');
            let block = read_block(&mut lines).expect("bench fixture should read");
            black_box(block.html.len());
        });
    });
}

fn bench_script_line_by_line(c: &mut Criterion) {
    let input = make_script(SCRIPT_LINES);
    c.bench_function("bench_script_line_by_line", |b| {
        b.iter(|| {
            let mut lines = black_box(&input).split_inclusive('\n');
            let block = read_block(&mut lines).expect("bench fixture should read");
            black_box(block.html.len());
        });
    });
}

fn bench_streaming_chunked(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    let chunk_sizes = [1usize, 2, 3, 7, 64, 128, 256, 1024];
    c.bench_function("bench_streaming_chunked", |b| {
        b.iter_batched(
            BlockTokenizer::new,
            |mut tokenizer| {
                let mut offset = 0usize;
                let mut size_idx = 0usize;
                while offset < input.len() && !tokenizer.is_complete() {
                    let size = chunk_sizes[size_idx % chunk_sizes.len()];
                    let mut end = (offset + size).min(input.len());
                    while !input.is_char_boundary(end) {
                        end += 1;
                    }
                    tokenizer
                        .feed(&input[offset..end])
                        .expect("streaming tokenizer should accept chunks");
                    offset = end;
                    size_idx += 1;
                }
                black_box(tokenizer.consumed_output().len());
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_comment_hyphen_adversarial(c: &mut Criterion) {
    let input = make_comment_adversarial(512 * 1024);
    c.bench_function("bench_comment_hyphen_adversarial", |b| {
        b.iter(|| black_box(feed_one_shot(black_box(&input))));
    });
}

criterion_group!(
    benches,
    bench_one_shot_small,
    bench_one_shot_large,
    bench_line_by_line_large,
    bench_script_line_by_line,
    bench_streaming_chunked,
    bench_comment_hyphen_adversarial
);
criterion_main!(benches);
