//! Pure prefix classification of the unconsumed buffer.
//!
//! Every function here looks at the front of a buffer and reports what is there
//! without touching tokenizer state, so each transition can be tested on its own.
//! Scanning is byte-oriented; all structural bytes are ASCII, so every offset
//! returned lands on a UTF-8 char boundary.

use memchr::{memchr, memmem};

pub(crate) const COMMENT_OPEN: &str = "<!--";
pub(crate) const COMMENT_CLOSE: &str = "-->";
pub(crate) const CDATA_OPEN: &str = "<![CDATA[";
pub(crate) const CDATA_CLOSE: &str = "]]>";

/// A complete `<[/]name attrs>` tag at the front of a buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TagMatch<'a> {
    /// Full tag text, `<` through `>`.
    pub(crate) text: &'a str,
    pub(crate) closing: bool,
    pub(crate) name: &'a str,
    /// Raw attribute text after the name and its whitespace, up to `>`.
    pub(crate) attributes: &'a str,
}

impl<'a> TagMatch<'a> {
    pub(crate) fn len(&self) -> usize {
        self.text.len()
    }

    pub(crate) fn self_closing(&self) -> bool {
        self.attributes.ends_with('/')
    }

    /// Attribute text with a trailing self-closing `/` removed.
    pub(crate) fn attributes_without_slash(&self) -> &'a str {
        self.attributes
            .strip_suffix('/')
            .unwrap_or(self.attributes)
    }
}

/// Tokens recognized at top level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ElementToken<'a> {
    CommentStart,
    Tag(TagMatch<'a>),
    /// Optional leading whitespace plus `<![CDATA[`; `len` covers both.
    CDataStart { len: usize },
    /// `<` with no `>` anywhere in the buffer.
    PartialTagStart,
    PlainTextRun { len: usize },
    EndOfInput,
    Unrecognized,
}

/// Tokens recognized inside a script/style body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ScriptToken<'a> {
    CDataStart { len: usize },
    /// Closing tag for the element whose body we are in.
    CloseTag(TagMatch<'a>),
    /// A `<` that starts neither the closing tag nor a CDATA opener.
    Verbatim { len: usize },
    /// The buffer is a prefix of a CDATA opener or of the closing tag and more
    /// input is needed to decide.
    Partial,
    Text { len: usize },
    EndOfInput,
}

pub(crate) fn classify_element(buf: &str) -> ElementToken<'_> {
    if buf.is_empty() {
        return ElementToken::EndOfInput;
    }
    if buf.starts_with(COMMENT_OPEN) {
        return ElementToken::CommentStart;
    }
    if let Some(tag) = match_tag(buf) {
        return ElementToken::Tag(tag);
    }
    if let Some(len) = match_cdata_open(buf) {
        return ElementToken::CDataStart { len };
    }
    let bytes = buf.as_bytes();
    if bytes[0] == b'<' {
        if memchr(b'>', bytes).is_none() {
            return ElementToken::PartialTagStart;
        }
        return ElementToken::Unrecognized;
    }
    let len = memchr(b'<', bytes).unwrap_or(bytes.len());
    ElementToken::PlainTextRun { len }
}

/// Classify the front of a script/style body whose element is `open`.
///
/// Only a CDATA opener and `</open ...>` are structural here; any other `<` is
/// body text.
pub(crate) fn classify_script_body<'a>(buf: &'a str, open: &str) -> ScriptToken<'a> {
    if buf.is_empty() {
        return ScriptToken::EndOfInput;
    }
    if let Some(len) = match_cdata_open(buf) {
        return ScriptToken::CDataStart { len };
    }
    let bytes = buf.as_bytes();
    if bytes[0] != b'<' {
        let len = memchr(b'<', bytes).unwrap_or(bytes.len());
        return ScriptToken::Text { len };
    }
    let Some(after_slash) = buf.strip_prefix("</") else {
        if CDATA_OPEN.starts_with(buf) {
            return ScriptToken::Partial;
        }
        return ScriptToken::Verbatim { len: 1 };
    };
    if after_slash.len() < open.len() && open.starts_with(after_slash) {
        return ScriptToken::Partial;
    }
    match after_slash.strip_prefix(open) {
        Some(tail) if !tail.bytes().next().is_some_and(is_name_byte) => match match_tag(buf) {
            Some(tag) => ScriptToken::CloseTag(tag),
            None => ScriptToken::Partial,
        },
        _ => ScriptToken::Verbatim { len: 1 },
    }
}

/// Match `<`, optional `/`, a word-character name, optional whitespace, then
/// attribute text running to the first `>`.
pub(crate) fn match_tag(buf: &str) -> Option<TagMatch<'_>> {
    let bytes = buf.as_bytes();
    if bytes.first() != Some(&b'<') {
        return None;
    }
    let mut i = 1;
    let closing = bytes.get(i) == Some(&b'/');
    if closing {
        i += 1;
    }
    let name_start = i;
    while i < bytes.len() && is_name_byte(bytes[i]) {
        i += 1;
    }
    if i == name_start {
        return None;
    }
    let name_end = i;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    let gt = i + memchr(b'>', &bytes[i..])?;
    Some(TagMatch {
        text: &buf[..=gt],
        closing,
        name: &buf[name_start..name_end],
        attributes: &buf[i..gt],
    })
}

/// Length of optional leading whitespace plus a CDATA opener, if present.
pub(crate) fn match_cdata_open(buf: &str) -> Option<usize> {
    let lead = buf.len() - buf.trim_start_matches(|c: char| c.is_ascii_whitespace()).len();
    buf[lead..]
        .starts_with(CDATA_OPEN)
        .then_some(lead + CDATA_OPEN.len())
}

pub(crate) fn find_comment_close(buf: &str) -> Option<usize> {
    memmem::find(buf.as_bytes(), COMMENT_CLOSE.as_bytes())
}

pub(crate) fn find_cdata_close(buf: &str) -> Option<usize> {
    memmem::find(buf.as_bytes(), CDATA_CLOSE.as_bytes())
}

/// Number of trailing `byte`s in `buf`.
pub(crate) fn trailing_run(buf: &str, byte: u8) -> usize {
    buf.as_bytes()
        .iter()
        .rev()
        .take_while(|&&b| b == byte)
        .count()
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
