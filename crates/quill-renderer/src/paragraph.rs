//! Paragraph wrapper.
//!
//! Splits on blank lines. A chunk that already starts with a block-level
//! element (or is a code-block placeholder) passes through untouched; any
//! other chunk becomes one paragraph with its lines joined by `<br>`.

use std::sync::LazyLock;

use regex::Regex;

use crate::protect::CODE_BLOCK_PREFIX;

static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n").expect("invalid blank line regex"));

static BLOCK_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<(?:h[1-6]|ul|ol|blockquote|pre|hr|table|div|figure)\b")
        .expect("invalid block tag regex")
});

const P_OPEN: &str = r#"<p class="my-4 leading-relaxed text-slate-300">"#;

/// Wrap free text in paragraphs; join chunks with a newline.
pub(crate) fn wrap(text: &str) -> String {
    BLANK_LINES
        .split(text)
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| {
            if is_block(chunk) {
                chunk.to_owned()
            } else {
                let lines: Vec<&str> = chunk
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .collect();
                format!("{P_OPEN}{}</p>", lines.join("<br>"))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_block(chunk: &str) -> bool {
    chunk.starts_with(CODE_BLOCK_PREFIX) || BLOCK_START.is_match(chunk)
}
