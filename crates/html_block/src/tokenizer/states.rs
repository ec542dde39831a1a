//! Tokenizer state machine definitions.

/// Lexical context the tokenizer is currently in.
///
/// Completion is not a state: a tokenizer is finished when it is back in
/// `InElement` with no open elements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TokenizerState {
    /// Top-level markup: text, tags, comment and CDATA openers.
    #[default]
    InElement,
    /// Holding a tag whose closing `>` has not arrived yet.
    InTag,
    InComment,
    InCData,
    /// Inside the raw body of a `script` or `style` element.
    InScriptStyle,
}
