//! Streaming reader for one block of embedded HTML-like markup.
//!
//! A [`BlockTokenizer`] is fed text line by line until it has read exactly one
//! balanced top-level element (or comment), sanitizing as it goes:
//! `img`, `hr` and `br` are written as `<name attrs />`, comment interiors are
//! made safe for strict comment parsers, and `script`/`style` bodies are wrapped
//! in CDATA markers. Text after the block is handed back untouched.

#[cfg(any(test, feature = "test-harness"))]
pub mod chunker;
pub mod perf_fixtures;

mod error;
mod source;
mod tokenizer;

pub use crate::error::{BlockError, BlockErrorKind};
pub use crate::source::{LineSource, read_block, read_block_with_config, tokenize_block};
pub use crate::tokenizer::{
    BlockTokenizer, HtmlBlock, TokenizerConfig, TokenizerState, TokenizerStats,
};
