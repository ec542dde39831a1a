//! Driving a tokenizer from a line-oriented input source.

use crate::error::{BlockError, BlockErrorKind};
use crate::tokenizer::{BlockTokenizer, HtmlBlock, TokenizerConfig};

/// Supplies successive text fragments, normally one line each with its line
/// terminator kept.
pub trait LineSource {
    fn next_line(&mut self) -> Option<String>;
}

impl<I> LineSource for I
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    fn next_line(&mut self) -> Option<String> {
        self.next().map(|line| line.as_ref().to_string())
    }
}

/// Read one markup block from `source` with the default configuration.
pub fn read_block<S: LineSource + ?Sized>(source: &mut S) -> Result<HtmlBlock, BlockError> {
    read_block_with_config(source, TokenizerConfig::default())
}

/// Feed lines from `source` until one complete block has been read.
///
/// Lines are fed until the tokenizer reports a complete block; lines after the
/// completing one are left in `source`.
pub fn read_block_with_config<S: LineSource + ?Sized>(
    source: &mut S,
    config: TokenizerConfig,
) -> Result<HtmlBlock, BlockError> {
    let mut tokenizer = BlockTokenizer::with_config(config);
    let mut lines = 0usize;
    loop {
        let Some(line) = source.next_line() else {
            let err = tokenizer.error(BlockErrorKind::UnexpectedEnd);
            log::debug!(target: "html_block.source", "block failed after {lines} lines: {err}");
            return Err(err);
        };
        lines += 1;
        if let Err(err) = tokenizer.feed(&line) {
            log::debug!(target: "html_block.source", "block failed after {lines} lines: {err}");
            return Err(err);
        }
        if tokenizer.is_complete() {
            break;
        }
    }
    let mut block = tokenizer.into_block();
    block.lines_consumed = lines;
    log::debug!(
        target: "html_block.source",
        "read block <{}> over {lines} lines ({} bytes, {} trailing)",
        block.first_tag.as_deref().unwrap_or(""),
        block.html.len(),
        block.trailing.len()
    );
    Ok(block)
}

/// Read the block at the start of `input`, split into lines.
///
/// Everything after the block, including lines that never had to be fed, ends
/// up in [`HtmlBlock::trailing`].
pub fn tokenize_block(input: &str) -> Result<HtmlBlock, BlockError> {
    let mut lines = input.split_inclusive('\n');
    let mut block = read_block(&mut lines)?;
    for line in lines {
        block.trailing.push_str(line);
    }
    Ok(block)
}
