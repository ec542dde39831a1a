//! Output emission helpers.

use crate::tokenizer::BlockTokenizer;
use crate::tokenizer::classify::{CDATA_CLOSE, CDATA_OPEN, TagMatch};
use memchr::memchr;

/// Tags always rewritten to `<name attrs />`.
const SANITIZED_TAGS: [&str; 3] = ["img", "hr", "br"];

pub(crate) fn is_sanitized(name: &str) -> bool {
    SANITIZED_TAGS.contains(&name)
}

/// Elements whose bodies are wrapped in synthetic CDATA markers.
pub(crate) fn is_script_style(name: &str) -> bool {
    matches!(name, "script" | "style")
}

pub(crate) fn script_style_cdata_start(name: &str) -> &'static str {
    if name == "script" {
        "//<![CDATA[\n"
    } else {
        "/*<![CDATA[*/\n"
    }
}

pub(crate) fn script_style_cdata_end(name: &str) -> &'static str {
    if name == "script" {
        "\n//]]>"
    } else {
        "\n/*]]>*/"
    }
}

/// Append `body`, inserting a space after every hyphen that is not part of a
/// run of two or more hyphens.
pub(crate) fn push_comment_body(out: &mut String, body: &str) {
    let bytes = body.as_bytes();
    let mut flushed = 0;
    let mut i = 0;
    while let Some(rel) = memchr(b'-', &bytes[i..]) {
        let start = i + rel;
        let mut end = start + 1;
        while end < bytes.len() && bytes[end] == b'-' {
            end += 1;
        }
        if end - start == 1 {
            out.push_str(&body[flushed..end]);
            out.push(' ');
            flushed = end;
        }
        i = end;
    }
    out.push_str(&body[flushed..]);
}

impl BlockTokenizer {
    pub(super) fn emit(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "html_block.tokenizer", "emit {:?} in {:?}", text, self.state);
        self.output.push_str(text);
    }

    pub(super) fn emit_comment_body(&mut self, body: &str) {
        if self.config.rewrite_comment_dashes {
            push_comment_body(&mut self.output, body);
        } else {
            self.output.push_str(body);
        }
    }

    /// Emit the canonical self-closing form of a sanitized tag.
    pub(super) fn emit_sanitized(&mut self, tag: &TagMatch<'_>) {
        let attributes = tag.attributes_without_slash().trim();
        self.output.push('<');
        self.output.push_str(tag.name);
        if !attributes.is_empty() {
            self.output.push(' ');
            self.output.push_str(attributes);
        }
        self.output.push_str(" />");
    }

    pub(super) fn output_ends_with_cdata_open(&self) -> bool {
        self.output.trim_end().ends_with(CDATA_OPEN)
    }

    pub(super) fn output_ends_with_cdata_close(&self) -> bool {
        self.output.trim_end().ends_with(CDATA_CLOSE)
    }
}
