pub const BLOCK_TEMPLATE: &str =
    "<div class=box>\n<span>hello - world</span><img src=x>\n<!-- note -->\n</div>\n";

pub const SCRIPT_TEMPLATE: &str = "var a = b < c && d > e;\n";

/// One `<section>` block wrapping `blocks` copies of [`BLOCK_TEMPLATE`].
pub fn make_blocks(blocks: usize) -> String {
    let mut html = String::with_capacity(BLOCK_TEMPLATE.len() * blocks + 32);
    html.push_str("<section>\n");
    for _ in 0..blocks {
        html.push_str(BLOCK_TEMPLATE);
    }
    html.push_str("</section>\n");
    html
}

/// One `<script>` block with `lines` lines of body.
pub fn make_script(lines: usize) -> String {
    let mut html = String::with_capacity(SCRIPT_TEMPLATE.len() * lines + 32);
    html.push_str("<script>\n");
    for _ in 0..lines {
        html.push_str(SCRIPT_TEMPLATE);
    }
    html.push_str("</script>\n");
    html
}
