//! HTML for a fenced code block: header label, optional copy button, highlighted body.

use std::collections::HashMap;
use std::fmt::Write;

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

use crate::copy_script::{COPY_FUNCTION_NAME, PAYLOAD_ATTRIBUTE};
use crate::highlight::highlight;
use crate::util::escape_html;

/// A fenced code block as written by the author.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeBlock {
    /// Language tag from the fence, lowercased (`text` when absent).
    pub language: String,
    /// `key=value` attributes from the fence info string.
    pub attrs: HashMap<String, String>,
    /// Raw code between the fences.
    pub source: String,
}

impl CodeBlock {
    /// Label for the block header: the `title` attribute, else the language.
    #[must_use]
    pub fn label(&self) -> &str {
        self.attrs
            .get("title")
            .map_or(self.language.as_str(), String::as_str)
    }

    /// Render the block to a self-contained HTML fragment.
    #[must_use]
    pub fn to_html(&self, copy_button: bool) -> String {
        let language = escape_html(&self.language);
        let mut html = String::with_capacity(self.source.len() * 2 + 256);
        html.push_str(r#"<div class="code-block my-4 overflow-hidden rounded-lg border border-slate-700 bg-slate-900">"#);
        html.push_str(
            r#"<div class="flex items-center justify-between border-b border-slate-700 bg-slate-800 px-4 py-2 text-xs text-slate-400">"#,
        );
        html.push_str(r#"<span class="font-mono">"#);
        html.push_str(&escape_html(self.label()));
        html.push_str("</span>");
        if copy_button {
            let _ = write!(
                html,
                r#"<button type="button" class="copy-code-btn rounded px-2 py-1 text-slate-300 hover:bg-slate-700" {PAYLOAD_ATTRIBUTE}="{}" onclick="{COPY_FUNCTION_NAME}(this)">Copy</button>"#,
                encode_payload(&self.source)
            );
        }
        html.push_str("</div>");
        html.push_str(r#"<pre class="overflow-x-auto p-4 text-sm leading-relaxed"><code class="language-"#);
        html.push_str(&language);
        html.push_str(r#"">"#);
        html.push_str(&highlight(&self.source, &self.language));
        html.push_str("</code></pre></div>");
        html
    }
}

/// Percent-encode code for the `data-code` attribute.
///
/// Everything but ASCII alphanumerics is encoded, so the value never needs
/// attribute escaping and `decodeURIComponent` restores it exactly.
#[must_use]
pub fn encode_payload(source: &str) -> String {
    utf8_percent_encode(source, NON_ALPHANUMERIC).to_string()
}
