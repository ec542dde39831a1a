//! Incremental tokenizer for one block of embedded markup.
//!
//! The tokenizer is fed text in chunks (normally one line at a time) and stops
//! as soon as one complete, balanced top-level element has been read. Tags
//! named in the sanitize set come out in canonical self-closing form and
//! script/style bodies are wrapped in synthetic CDATA markers.
//!
//! Invariants:
//! - Chunk-equivalence: feeding input in one chunk or many chunks yields the same
//!   output, finished flag and trailing text (trailing text being the remainder
//!   plus any input the caller did not feed after completion).
//! - Empty carry-over: after `feed` returns, the unconsumed buffer is empty unless
//!   the tokenizer is finished. Fragments that may start a marker or tag are held
//!   in state-owned buffers, not in the unconsumed buffer.
//! - Failure is final: once `feed` has returned an error the instance must be
//!   discarded.

use crate::error::{BlockError, BlockErrorKind};
use classify::{
    CDATA_CLOSE, CDATA_OPEN, COMMENT_CLOSE, COMMENT_OPEN, ElementToken, ScriptToken, TagMatch,
    classify_element, classify_script_body, find_cdata_close, find_comment_close, trailing_run,
};
use emit::{
    is_sanitized, is_script_style, script_style_cdata_end, script_style_cdata_start,
};

pub(crate) mod classify;
mod emit;
mod states;

pub use states::TokenizerState;

/// Configuration for the tokenizer.
#[derive(Clone, Debug)]
pub struct TokenizerConfig {
    /// Space out lone hyphens inside comments so strict comment parsers
    /// downstream accept the output.
    pub rewrite_comment_dashes: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            rewrite_comment_dashes: true,
        }
    }
}

/// Minimal tokenizer instrumentation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenizerStats {
    pub steps: u64,
    pub state_transitions: u64,
    /// Comment openers and tags consumed at top level.
    pub tokens_consumed: u64,
    pub bytes_fed: u64,
}

/// Result of one completed block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HtmlBlock {
    /// Sanitized markup.
    pub html: String,
    pub first_tag: Option<String>,
    /// Text after the block that belongs to whatever parsing resumes next.
    pub trailing: String,
    /// Number of lines fed to the tokenizer, when read from a line source.
    pub lines_consumed: usize,
}

enum Advance {
    By(usize),
    /// Replace everything up to `consumed` bytes past the cursor with `front`.
    Splice { consumed: usize, front: String },
}

/// Streaming tokenizer for one markup block.
#[derive(Clone, Debug, Default)]
pub struct BlockTokenizer {
    config: TokenizerConfig,
    state: TokenizerState,
    buffer: String,
    cursor: usize,
    output: String,
    open_tags: Vec<String>,
    first_tag: Option<String>,
    partial_tag: String,
    held: String,
    failed: bool,
    stats: TokenizerStats,
}

impl BlockTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TokenizerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Prepend `chunk` to the unconsumed buffer and consume tokens until the
    /// buffer is empty or one complete block has been read.
    ///
    /// Once finished, whatever follows the block stays in
    /// [`unconsumed_remainder`](Self::unconsumed_remainder) and must not be fed
    /// back into this tokenizer.
    pub fn feed(&mut self, chunk: &str) -> Result<(), BlockError> {
        assert!(
            !self.failed,
            "BlockTokenizer::feed called after a failed feed; the instance must be discarded"
        );
        debug_assert!(
            self.buffer.is_empty() || self.is_finished(),
            "unconsumed buffer must be empty between feeds unless finished"
        );
        self.stats.bytes_fed = self.stats.bytes_fed.saturating_add(chunk.len() as u64);

        let mut next = std::mem::take(&mut self.held);
        next.push_str(chunk);
        next.push_str(&self.buffer);
        self.buffer = next;
        self.cursor = 0;

        while self.cursor < self.buffer.len() {
            self.stats.steps = self.stats.steps.saturating_add(1);
            let buffer = std::mem::take(&mut self.buffer);
            let step = self.step(&buffer[self.cursor..]);
            self.buffer = buffer;
            match step {
                Ok(Advance::By(len)) => self.cursor += len,
                Ok(Advance::Splice { consumed, front }) => {
                    self.buffer
                        .replace_range(..self.cursor + consumed, &front);
                    self.cursor = 0;
                }
                Err(kind) => return Err(self.fail(kind)),
            }
            if self.is_complete() {
                break;
            }
        }

        self.buffer.drain(..self.cursor);
        self.cursor = 0;
        Ok(())
    }

    /// Back at top level with no open elements.
    pub fn is_finished(&self) -> bool {
        self.state == TokenizerState::InElement && self.open_tags.is_empty()
    }

    /// Finished after reading at least one comment or tag, i.e. a whole block
    /// has been read. A fresh tokenizer is finished but not complete.
    pub fn is_complete(&self) -> bool {
        self.is_finished() && self.stats.tokens_consumed > 0
    }

    /// Sanitized markup accepted so far.
    pub fn consumed_output(&self) -> &str {
        &self.output
    }

    /// Text left unprocessed by the last `feed`; only non-empty once finished.
    pub fn unconsumed_remainder(&self) -> &str {
        &self.buffer[self.cursor..]
    }

    pub fn first_tag_name(&self) -> Option<&str> {
        self.first_tag.as_deref()
    }

    pub fn state(&self) -> TokenizerState {
        self.state
    }

    /// Currently open elements, outermost first.
    pub fn open_tags(&self) -> &[String] {
        &self.open_tags
    }

    pub fn stats(&self) -> TokenizerStats {
        self.stats
    }

    /// Consume the tokenizer, returning the block read so far. The remainder
    /// becomes the block's trailing text.
    pub fn into_block(mut self) -> HtmlBlock {
        let trailing = self.buffer.split_off(self.cursor);
        HtmlBlock {
            html: self.output,
            first_tag: self.first_tag,
            trailing,
            lines_consumed: 0,
        }
    }

    /// Build an error carrying the current tokenizer context.
    ///
    /// Held fragments precede the unconsumed buffer in the input, so they lead
    /// the reported remainder.
    pub(crate) fn error(&self, kind: BlockErrorKind) -> BlockError {
        let rest = &self.buffer[self.cursor..];
        let mut remainder =
            String::with_capacity(self.partial_tag.len() + self.held.len() + rest.len());
        remainder.push_str(&self.partial_tag);
        remainder.push_str(&self.held);
        remainder.push_str(rest);
        BlockError {
            kind,
            state: self.state,
            consumed: self.output.clone(),
            remainder,
            open_tags: self.open_tags.clone(),
        }
    }

    fn fail(&mut self, kind: BlockErrorKind) -> BlockError {
        self.failed = true;
        let err = self.error(kind);
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "html_block.tokenizer", "failed: {err}");
        err
    }

    fn transition_to(&mut self, next: TokenizerState) {
        if self.state == next {
            return;
        }
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(
            target: "html_block.tokenizer",
            "state {:?} -> {:?} open={:?}",
            self.state,
            next,
            self.open_tags
        );
        self.state = next;
        self.stats.state_transitions = self.stats.state_transitions.saturating_add(1);
    }

    fn step(&mut self, rest: &str) -> Result<Advance, BlockErrorKind> {
        match self.state {
            TokenizerState::InElement => self.step_element(rest),
            TokenizerState::InTag => Ok(self.step_tag(rest)),
            TokenizerState::InComment => Ok(self.step_comment(rest)),
            TokenizerState::InCData => Ok(self.step_cdata(rest)),
            TokenizerState::InScriptStyle => self.step_script_style(rest),
        }
    }

    fn step_element(&mut self, rest: &str) -> Result<Advance, BlockErrorKind> {
        match classify_element(rest) {
            ElementToken::CommentStart => {
                self.count_token();
                self.emit(COMMENT_OPEN);
                self.transition_to(TokenizerState::InComment);
                Ok(Advance::By(COMMENT_OPEN.len()))
            }
            ElementToken::Tag(tag) => {
                self.handle_tag(&tag)?;
                self.count_token();
                Ok(Advance::By(tag.len()))
            }
            ElementToken::CDataStart { len } => {
                self.emit(&rest[..len]);
                self.transition_to(TokenizerState::InCData);
                Ok(Advance::By(len))
            }
            ElementToken::PartialTagStart => {
                self.partial_tag.push_str(rest);
                self.transition_to(TokenizerState::InTag);
                Ok(Advance::By(rest.len()))
            }
            ElementToken::PlainTextRun { len } => {
                self.emit(&rest[..len]);
                Ok(Advance::By(len))
            }
            ElementToken::EndOfInput => Ok(Advance::By(0)),
            ElementToken::Unrecognized => Err(BlockErrorKind::MalformedMarkup),
        }
    }

    fn step_tag(&mut self, rest: &str) -> Advance {
        let Some(gt) = memchr::memchr(b'>', rest.as_bytes()) else {
            self.partial_tag.push_str(rest);
            if !self.partial_tag.starts_with(COMMENT_OPEN)
                && !self.partial_tag.starts_with(CDATA_OPEN)
            {
                return Advance::By(rest.len());
            }
            // The fragment turned out to open a comment or CDATA section, which
            // need no `>` to be recognized.
            let front = std::mem::take(&mut self.partial_tag);
            self.transition_to(TokenizerState::InElement);
            return Advance::Splice {
                consumed: rest.len(),
                front,
            };
        };
        self.partial_tag.push_str(&rest[..=gt]);
        let front = std::mem::take(&mut self.partial_tag);
        self.transition_to(TokenizerState::InElement);
        Advance::Splice {
            consumed: gt + 1,
            front,
        }
    }

    fn step_comment(&mut self, rest: &str) -> Advance {
        if let Some(end) = find_comment_close(rest) {
            self.emit_comment_body(&rest[..end]);
            self.emit(COMMENT_CLOSE);
            self.transition_to(TokenizerState::InElement);
            return Advance::By(end + COMMENT_CLOSE.len());
        }
        // A trailing hyphen run may belong to a longer run or to `-->`.
        let keep = trailing_run(rest, b'-');
        let (body, tail) = rest.split_at(rest.len() - keep);
        self.emit_comment_body(body);
        self.held.push_str(tail);
        Advance::By(rest.len())
    }

    fn step_cdata(&mut self, rest: &str) -> Advance {
        if let Some(end) = find_cdata_close(rest) {
            let next = match self.open_tags.last() {
                Some(top) if is_script_style(top) => TokenizerState::InScriptStyle,
                _ => TokenizerState::InElement,
            };
            self.emit(&rest[..end]);
            if next != TokenizerState::InScriptStyle {
                self.emit(CDATA_CLOSE);
            }
            self.transition_to(next);
            return Advance::By(end + CDATA_CLOSE.len());
        }
        let keep = trailing_run(rest, b']').min(2);
        let (body, tail) = rest.split_at(rest.len() - keep);
        self.emit(body);
        self.held.push_str(tail);
        Advance::By(rest.len())
    }

    fn step_script_style(&mut self, rest: &str) -> Result<Advance, BlockErrorKind> {
        let open = self.open_tags.last().map(String::as_str).unwrap_or_default();
        match classify_script_body(rest, open) {
            ScriptToken::CDataStart { len } => {
                let marker = &rest[..len];
                if self.output_ends_with_cdata_open() {
                    let lead = len - CDATA_OPEN.len();
                    self.emit(&marker[..lead]);
                } else {
                    self.emit(marker);
                }
                self.transition_to(TokenizerState::InCData);
                Ok(Advance::By(len))
            }
            ScriptToken::CloseTag(tag) => {
                if !self.output_ends_with_cdata_close() {
                    self.emit(script_style_cdata_end(tag.name));
                }
                self.transition_to(TokenizerState::InElement);
                self.handle_tag(&tag)?;
                Ok(Advance::By(tag.len()))
            }
            ScriptToken::Verbatim { len } | ScriptToken::Text { len } => {
                self.emit(&rest[..len]);
                Ok(Advance::By(len))
            }
            ScriptToken::Partial => {
                self.held.push_str(rest);
                Ok(Advance::By(rest.len()))
            }
            ScriptToken::EndOfInput => Ok(Advance::By(0)),
        }
    }

    fn handle_tag(&mut self, tag: &TagMatch<'_>) -> Result<(), BlockErrorKind> {
        if self.first_tag.is_none() {
            self.first_tag = Some(tag.name.to_string());
        }

        if is_sanitized(tag.name) {
            self.emit_sanitized(tag);
            return Ok(());
        }

        if tag.closing {
            match self.open_tags.last() {
                None => {
                    return Err(BlockErrorKind::UnbalancedClose {
                        tag: tag.name.to_string(),
                    });
                }
                Some(open) if open != tag.name => {
                    return Err(BlockErrorKind::MismatchedClose {
                        open: open.clone(),
                        found: tag.name.to_string(),
                    });
                }
                Some(_) => {}
            }
            self.emit(tag.text);
            self.open_tags.pop();
            return Ok(());
        }

        self.emit(tag.text);
        if !tag.self_closing() {
            self.open_tags.push(tag.name.to_string());
        }
        let marker = self
            .open_tags
            .last()
            .filter(|top| is_script_style(top))
            .map(|top| script_style_cdata_start(top));
        if let Some(marker) = marker {
            self.emit(marker);
            self.transition_to(TokenizerState::InScriptStyle);
        }
        Ok(())
    }

    fn count_token(&mut self) {
        self.stats.tokens_consumed = self.stats.tokens_consumed.saturating_add(1);
    }
}
