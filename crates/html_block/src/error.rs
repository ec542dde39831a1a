//! Errors raised while reading a markup block.
//!
//! Every error is fatal for the tokenizer that produced it; the context fields
//! capture enough of the tokenizer to explain the failure to a user.

use crate::tokenizer::TokenizerState;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BlockErrorKind {
    #[error("malformed markup: no token matches the remaining input")]
    MalformedMarkup,
    #[error("closing tag </{tag}> with no open element")]
    UnbalancedClose { tag: String },
    #[error("closing tag </{found}> does not match open <{open}>")]
    MismatchedClose { open: String, found: String },
    /// The line source ran out before the block was complete.
    #[error("input ended before the markup block was complete")]
    UnexpectedEnd,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} (state={state:?}, open tags={open_tags:?})")]
pub struct BlockError {
    pub kind: BlockErrorKind,
    pub state: TokenizerState,
    /// Sanitized output accepted before the failure.
    pub consumed: String,
    /// Unconsumed input at the failure, starting with the offending token.
    pub remainder: String,
    pub open_tags: Vec<String>,
}

impl BlockError {
    /// Multi-line dump for malformed-input diagnostics. Text read so far and
    /// the unread remainder are quoted with a leading `|` on every line.
    pub fn report(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Error: {}\n", self.kind));
        out.push_str(&format!("state={:?}\n", self.state));
        out.push_str(&format!("Tag stack = {:?}\n", self.open_tags));
        out.push_str("Before:\n");
        push_quoted(&mut out, &self.consumed);
        out.push_str("After:\n");
        push_quoted(&mut out, &self.remainder);
        out
    }
}

fn push_quoted(out: &mut String, text: &str) {
    for line in text.lines() {
        out.push('|');
        out.push_str(line);
        out.push('\n');
    }
}
