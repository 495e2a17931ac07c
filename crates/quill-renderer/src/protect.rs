//! Protector and restorer for code.
//!
//! [`extract`] runs before every other stage. It swaps fenced code blocks, then
//! inline code spans, for placeholder tokens and keeps the rendered HTML aside
//! in [`Fragments`]. Later stages only ever see the tokens, so nothing they do
//! can touch code content. [`Fragments::restore`] puts the HTML back at the end.
//!
//! Tokens are built from private-use characters, which escaped text never
//! contains. Authors typing those characters themselves get undefined output.

use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::code_block::CodeBlock;
use crate::fence::{FenceTracker, parse_fence_info};
use crate::util::escape_html;

const OPEN: char = '\u{E000}';
const CLOSE: char = '\u{E001}';

/// Start of every code-block placeholder.
pub(crate) const CODE_BLOCK_PREFIX: &str = "\u{E000}B";

static DOUBLE_BACKTICK_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"``([^\n]+?)``").expect("invalid inline code regex"));

static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`\n]+)`").expect("invalid inline code regex"));

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("\u{E000}[BI][0-9]+\u{E001}").expect("invalid placeholder regex")
});

const INLINE_CODE_CLASS: &str =
    "rounded bg-slate-800 px-1.5 py-0.5 font-mono text-sm text-pink-300";

/// What a placeholder stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlaceholderKind {
    CodeBlock,
    InlineCode,
    /// Finished link or image markup, held back from inline styling.
    Markup,
}

/// A reserved token standing in for one rendered fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Placeholder {
    pub kind: PlaceholderKind,
    pub index: usize,
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.kind {
            PlaceholderKind::CodeBlock => 'B',
            PlaceholderKind::InlineCode => 'I',
            PlaceholderKind::Markup => 'M',
        };
        write!(f, "{OPEN}{tag}{}{CLOSE}", self.index)
    }
}

/// Rendered fragments in creation order, keyed by their placeholder token.
#[derive(Debug, Default)]
pub(crate) struct Fragments {
    items: Vec<(String, String)>,
}

impl Fragments {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Store `html` and return the placeholder that stands for it.
    pub(crate) fn push(&mut self, kind: PlaceholderKind, html: String) -> Placeholder {
        let placeholder = Placeholder {
            kind,
            index: self.items.len(),
        };
        self.items.push((placeholder.to_string(), html));
        placeholder
    }

    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    /// Substitute placeholders in `text` without consuming the fragments.
    ///
    /// Used where a stage needs to look at the real content of a line (heading
    /// slugs) before the final restore.
    #[must_use]
    pub(crate) fn expand(&self, text: &str) -> String {
        if !text.contains(OPEN) {
            return text.to_owned();
        }
        PLACEHOLDER
            .replace_all(text, |caps: &Captures| {
                let token = &caps[0];
                self.items
                    .iter()
                    .find(|(t, _)| t == token)
                    .map_or_else(|| token.to_owned(), |(_, html)| html.clone())
            })
            .into_owned()
    }

    /// Replace each placeholder with its fragment, in creation order, once each.
    #[must_use]
    pub(crate) fn restore(self, mut html: String) -> String {
        for (token, fragment) in self.items {
            html = html.replacen(&token, &fragment, 1);
        }
        html
    }
}

/// Output of [`extract`].
#[derive(Debug)]
pub(crate) struct Protected {
    /// Input with code replaced by placeholders.
    pub text: String,
    pub fragments: Fragments,
    pub warnings: Vec<String>,
}

/// Swap code blocks and inline code for placeholders.
///
/// Expects `\n` line endings. Each code-block placeholder ends up alone on a
/// line with blank lines around it, so later line-based stages see it as its
/// own block. An unterminated fence is left as literal text and reported in
/// the warnings.
pub(crate) fn extract(text: &str, default_language: &str, copy_buttons: bool) -> Protected {
    let mut fragments = Fragments::new();
    let mut warnings = Vec::new();

    let text = extract_code_blocks(
        text,
        default_language,
        copy_buttons,
        &mut fragments,
        &mut warnings,
    );
    let blocks = fragments.len();
    let text = extract_inline_code(&text, &mut fragments);

    tracing::debug!(
        code_blocks = blocks,
        inline_code = fragments.len() - blocks,
        "Protected code"
    );

    Protected {
        text,
        fragments,
        warnings,
    }
}

fn extract_code_blocks(
    text: &str,
    default_language: &str,
    copy_buttons: bool,
    fragments: &mut Fragments,
    warnings: &mut Vec<String>,
) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut tracker = FenceTracker::new();
    let mut opening_line = 0;
    let mut opening = "";
    let mut info = String::new();
    let mut body: Vec<&str> = Vec::new();

    for (line_no, line) in text.split('\n').enumerate() {
        if tracker.in_fence() {
            if tracker.close(line) {
                let (language, attrs) = parse_fence_info(&info);
                let language = if language.is_empty() {
                    default_language.to_owned()
                } else {
                    language
                };
                let block = CodeBlock {
                    language,
                    attrs,
                    source: body.join("\n"),
                };
                let placeholder =
                    fragments.push(PlaceholderKind::CodeBlock, block.to_html(copy_buttons));
                out.push(String::new());
                out.push(placeholder.to_string());
                out.push(String::new());
                body.clear();
            } else {
                body.push(line);
            }
        } else if tracker.open(line) {
            opening_line = line_no;
            opening = line;
            info = tracker.info().unwrap_or_default().to_owned();
        } else {
            out.push(line.to_owned());
        }
    }

    if tracker.in_fence() {
        warnings.push(format!(
            "Unterminated code fence opened on line {}; rendered as text",
            opening_line + 1
        ));
        tracing::debug!(line = opening_line + 1, "Unterminated code fence");
        out.push(opening.to_owned());
        out.extend(body.into_iter().map(str::to_owned));
    }

    out.join("\n")
}

fn extract_inline_code(text: &str, fragments: &mut Fragments) -> String {
    if !text.contains('`') {
        return text.to_owned();
    }
    let mut render = |content: &str| {
        let html = format!(
            r#"<code class="{INLINE_CODE_CLASS}">{}</code>"#,
            escape_html(content)
        );
        fragments.push(PlaceholderKind::InlineCode, html).to_string()
    };
    let text = DOUBLE_BACKTICK_CODE.replace_all(text, |caps: &Captures| {
        let content = &caps[1];
        // One space of padding lets the code itself start or end with a backtick
        let content = content
            .strip_prefix(' ')
            .and_then(|c| c.strip_suffix(' '))
            .unwrap_or(content);
        render(content)
    });
    INLINE_CODE
        .replace_all(&text, |caps: &Captures| render(&caps[1]))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn protect(text: &str) -> Protected {
        extract(text, "text", true)
    }

    #[test]
    fn test_placeholder_display() {
        let placeholder = Placeholder {
            kind: PlaceholderKind::CodeBlock,
            index: 3,
        };
        assert_eq!(placeholder.to_string(), "\u{E000}B3\u{E001}");
        assert!(placeholder.to_string().starts_with(CODE_BLOCK_PREFIX));
    }

    #[test]
    fn test_code_block_becomes_isolated_placeholder() {
        let protected = protect("before\n```python\nprint(1)\n```\nafter");
        assert_eq!(protected.text, "before\n\n\u{E000}B0\u{E001}\n\nafter");
        assert_eq!(protected.fragments.len(), 1);
        assert!(protected.warnings.is_empty());
    }

    #[test]
    fn test_code_block_language_defaults() {
        let protected = extract("```\nx\n```", "bash", false);
        let html = protected.fragments.restore(protected.text);
        assert!(html.contains(r#"<code class="language-bash">"#));
    }

    #[test]
    fn test_code_block_content_is_not_inline_code() {
        let protected = protect("```\nlet s = `x`;\n```");
        assert_eq!(protected.fragments.len(), 1);
        let html = protected.fragments.restore(protected.text);
        assert!(html.contains("let s = `x`;"));
    }

    #[test]
    fn test_unterminated_fence_stays_literal() {
        let protected = protect("intro\n```rust\nfn main() {}");
        assert_eq!(protected.text, "intro\n```rust\nfn main() {}");
        assert_eq!(protected.fragments.len(), 0);
        assert_eq!(
            protected.warnings,
            vec!["Unterminated code fence opened on line 2; rendered as text".to_owned()]
        );
    }

    #[test]
    fn test_inline_code_is_escaped() {
        let protected = protect("use `a<b>c` here");
        assert_eq!(protected.text, "use \u{E000}I0\u{E001} here");
        let html = protected.fragments.restore(protected.text);
        assert_eq!(
            html,
            format!(r#"use <code class="{INLINE_CODE_CLASS}">a&lt;b&gt;c</code> here"#)
        );
    }

    #[test]
    fn test_double_backtick_inline_code() {
        let protected = protect("``a`b`` and `c`");
        assert_eq!(protected.fragments.len(), 2);
        let html = protected.fragments.restore(protected.text);
        assert!(html.contains(">a`b</code>"));
        assert!(html.contains(">c</code>"));
    }

    #[test]
    fn test_double_backtick_padding_is_trimmed() {
        let html = {
            let protected = protect("`` `tick` ``");
            protected.fragments.restore(protected.text)
        };
        assert!(html.contains(">`tick`</code>"));
    }

    #[test]
    fn test_expand_keeps_fragments() {
        let protected = protect("# Using `foo`");
        assert_eq!(
            protected.fragments.expand(&protected.text),
            format!(r#"# Using <code class="{INLINE_CODE_CLASS}">foo</code>"#)
        );
        assert_eq!(protected.fragments.len(), 1);
    }

    #[test]
    fn test_restore_replaces_each_token_once() {
        let mut fragments = Fragments::new();
        let a = fragments.push(PlaceholderKind::InlineCode, "A".to_owned());
        let b = fragments.push(PlaceholderKind::InlineCode, "B".to_owned());
        let text = format!("{b} {a} {a}");
        assert_eq!(fragments.restore(text), format!("B A {a}"));
    }
}
