//! Regex-pass syntax highlighter for fenced code blocks.
//!
//! The pass order is fixed:
//!
//! 1. HTML-escape the raw code
//! 2. comments
//! 3. strings
//! 4. keywords
//! 5. types
//! 6. numbers
//! 7. function-call sites, then operators
//! 8. dialect passes (markup tags/attributes, stylesheet properties, data keys)
//! 9. brackets
//!
//! Earlier passes win: a pass only sees text no earlier pass has claimed, so
//! comments must run before strings (a quote inside a comment is not a string)
//! and strings before brackets (a bracket inside a string is not a bracket).
//!
//! Languages without a [`SyntaxConfig`] are escaped and returned unhighlighted.

mod languages;
mod tokens;

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::util::escape_text;
pub use languages::{Dialect, SyntaxConfig, aliases_for, supported_languages, syntax_config};
pub use tokens::TokenClass;
use tokens::TokenBuffer;

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+(?:\.\d+)?\b").expect("invalid number regex"));

static CALL_SITE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Za-z_][A-Za-z0-9_]*)\(").expect("invalid call regex"));

static BRACKETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[()\[\]{}]").expect("invalid bracket regex"));

static MARKUP_BRACKETS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&lt;/?|/?&gt;|[()\[\]{}]").expect("invalid markup bracket regex")
});

static MARKUP_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&lt;/?([A-Za-z][A-Za-z0-9:._-]*)").expect("invalid tag regex")
});

static MARKUP_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s([A-Za-z_:@][A-Za-z0-9:._-]*)=").expect("invalid attribute regex")
});

static STYLESHEET_PROPERTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[\s{;])(-{0,2}[A-Za-z][A-Za-z-]*)\s*:\s").expect("invalid property regex")
});

static DATA_BARE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:-[ \t]+)?([A-Za-z_][A-Za-z0-9_.-]*)[ \t]*:(?:[ \t]|$)")
        .expect("invalid key regex")
});

/// Compiled regexes for one language.
struct LanguageRules {
    config: &'static SyntaxConfig,
    comments: Option<Regex>,
    strings: Option<Regex>,
    keywords: Option<Regex>,
    types: Option<Regex>,
    operators: Option<Regex>,
}

static RULES: LazyLock<HashMap<&'static str, LanguageRules>> = LazyLock::new(|| {
    supported_languages()
        .into_iter()
        .filter_map(syntax_config)
        .map(|config| (config.name, LanguageRules::compile(config)))
        .collect()
});

impl LanguageRules {
    fn compile(config: &'static SyntaxConfig) -> Self {
        Self {
            config,
            comments: alternation(config.comment_markers.iter().map(|m| comment_pattern(m))),
            strings: alternation(string_patterns(config.string_delimiters)),
            keywords: word_set(config.keywords),
            types: word_set(config.types),
            operators: alternation(operator_patterns(config.operators)),
        }
    }
}

/// Highlight `code` for `language`, returning escaped HTML with `<span>` tokens.
///
/// The result never contains raw `<`, `>` or `&` from the input; unescaping the
/// text content yields `code` exactly.
#[must_use]
pub fn highlight(code: &str, language: &str) -> String {
    let escaped = escape_text(code);
    let Some(rules) = syntax_config(language).and_then(|config| RULES.get(config.name)) else {
        tracing::debug!(language, "No syntax config, rendering code unhighlighted");
        return escaped;
    };

    let mut buffer = TokenBuffer::new(escaped);

    if let Some(re) = &rules.comments {
        buffer.claim(re, TokenClass::Comment);
    }
    if let Some(re) = &rules.strings {
        buffer.claim(re, TokenClass::String);
    }
    if let Some(re) = &rules.keywords {
        buffer.claim(re, TokenClass::Keyword);
    }
    if let Some(re) = &rules.types {
        buffer.claim(re, TokenClass::Type);
    }
    buffer.claim(&NUMBER, TokenClass::Number);
    buffer.claim_group(&CALL_SITE, 1, TokenClass::Function);
    if let Some(re) = &rules.operators {
        buffer.claim(re, TokenClass::Operator);
    }

    match rules.config.dialect {
        Dialect::Code => {}
        Dialect::Markup => {
            buffer.claim_group(&MARKUP_TAG, 1, TokenClass::Tag);
            buffer.claim_group(&MARKUP_ATTRIBUTE, 1, TokenClass::Attribute);
        }
        Dialect::Stylesheet => {
            buffer.claim_group(&STYLESHEET_PROPERTY, 1, TokenClass::Property);
        }
        Dialect::Data => {
            buffer.retag_before_colon(TokenClass::String, TokenClass::Key);
            buffer.claim_group(&DATA_BARE_KEY, 1, TokenClass::Key);
        }
    }

    if rules.config.dialect == Dialect::Markup {
        buffer.claim(&MARKUP_BRACKETS, TokenClass::Bracket);
    } else {
        buffer.claim(&BRACKETS, TokenClass::Bracket);
    }

    buffer.into_html()
}

/// Build a regex matching any of `patterns`, or `None` if there are none.
fn alternation(patterns: impl IntoIterator<Item = String>) -> Option<Regex> {
    let patterns: Vec<String> = patterns.into_iter().collect();
    if patterns.is_empty() {
        return None;
    }
    Some(Regex::new(&patterns.join("|")).expect("invalid generated highlight regex"))
}

/// Whole-word match against a fixed word list.
fn word_set(words: &[&str]) -> Option<Regex> {
    if words.is_empty() {
        return None;
    }
    let words: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();
    let pattern = format!(r"\b(?:{})\b", words.join("|"));
    Some(Regex::new(&pattern).expect("invalid generated word regex"))
}

/// Pattern for one comment marker, written against escaped text.
fn comment_pattern(marker: &str) -> String {
    let close = match marker {
        "/*" => Some("*/"),
        "<!--" => Some("-->"),
        _ => None,
    };
    let open = regex::escape(&escape_text(marker));
    match close {
        // An unterminated block comment runs to the end of the code
        Some(close) => format!(r"{open}[\s\S]*?(?:{}|\z)", regex::escape(&escape_text(close))),
        None => format!(r"{open}[^\n]*"),
    }
}

/// Patterns for string delimiters, longest delimiter first so `"""` beats `"`.
fn string_patterns(delimiters: &[&str]) -> Vec<String> {
    let mut delimiters: Vec<&str> = delimiters.to_vec();
    delimiters.sort_by_key(|d| std::cmp::Reverse(d.len()));
    delimiters
        .into_iter()
        .map(|delim| {
            let q = regex::escape(delim);
            if delim.len() >= 3 {
                format!(r"{q}[\s\S]*?{q}")
            } else if delim == "`" {
                format!(r"{q}(?:\\[\s\S]|[^{q}\\])*{q}")
            } else {
                format!(r"{q}(?:\\.|[^{q}\\\n])*{q}")
            }
        })
        .collect()
}

/// Operator patterns against escaped text, longest first.
fn operator_patterns(operators: &[&str]) -> Vec<String> {
    let mut operators: Vec<String> = operators.iter().map(|op| escape_text(op)).collect();
    operators.sort_by_key(|op| std::cmp::Reverse(op.len()));
    operators.iter().map(|op| regex::escape(op)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::{strip_tags, unescape_html};
    use pretty_assertions::assert_eq;

    fn span(class: TokenClass, text: &str) -> String {
        format!(r#"<span class="{}">{text}</span>"#, class.css_class())
    }

    #[test]
    fn test_unknown_language_is_escaped_only() {
        assert_eq!(highlight("a < b && c", "text"), "a &lt; b &amp;&amp; c");
        assert_eq!(highlight("if (x) {}", "nope"), "if (x) {}");
    }

    #[test]
    fn test_keywords_and_calls() {
        let html = highlight("def solve(n):", "python");
        assert!(html.contains(&span(TokenClass::Keyword, "def")));
        assert!(html.contains(&span(TokenClass::Function, "solve")));
        assert!(html.contains(&span(TokenClass::Bracket, "(")));
    }

    #[test]
    fn test_comment_wins_over_keywords_and_strings() {
        let html = highlight("x = 1 # if \"quoted\"", "python");
        assert!(html.contains(&span(TokenClass::Comment, "# if \"quoted\"")));
        assert!(!html.contains(&span(TokenClass::Keyword, "if")));
    }

    #[test]
    fn test_string_protects_brackets() {
        let html = highlight(r#"print("(not a call)")"#, "python");
        assert!(html.contains(&span(TokenClass::String, r#""(not a call)""#)));
        assert!(!html.contains(&span(TokenClass::Function, "call")));
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        let html = highlight(r#"s = "a\"b" + c"#, "javascript");
        assert!(html.contains(&span(TokenClass::String, r#""a\"b""#)));
    }

    #[test]
    fn test_triple_quoted_string_spans_lines() {
        let html = highlight("doc = \"\"\"line one\nline two\"\"\"", "python");
        assert!(html.contains(&span(TokenClass::String, "\"\"\"line one\nline two\"\"\"")));
    }

    #[test]
    fn test_template_string() {
        let html = highlight("const s = `hi ${name}`;", "js");
        assert!(html.contains(&span(TokenClass::String, "`hi ${name}`")));
        assert!(html.contains(&span(TokenClass::Keyword, "const")));
    }

    #[test]
    fn test_block_comment() {
        let html = highlight("/* a\nb */ int x;", "c");
        assert!(html.contains(&span(TokenClass::Comment, "/* a\nb */")));
        assert!(html.contains(&span(TokenClass::Type, "int")));
    }

    #[test]
    fn test_unterminated_block_comment_runs_to_end() {
        let html = highlight("int x; /* open", "c");
        assert!(html.contains(&span(TokenClass::Comment, "/* open")));
    }

    #[test]
    fn test_numbers() {
        let html = highlight("let x = 3.14;", "rust");
        assert!(html.contains(&span(TokenClass::Number, "3.14")));
    }

    #[test]
    fn test_number_inside_identifier_is_not_a_number() {
        let html = highlight("let h1 = 0;", "rust");
        assert!(!html.contains(&span(TokenClass::Number, "1")));
    }

    #[test]
    fn test_operators_are_escaped_forms() {
        let html = highlight("a && b", "rust");
        assert!(html.contains(&span(TokenClass::Operator, "&amp;&amp;")));
    }

    #[test]
    fn test_rust_lifetime_is_not_a_string() {
        let html = highlight("fn f<'a>(x: &'a str) {}", "rust");
        assert!(!html.contains("hl-string"));
    }

    #[test]
    fn test_markup_tags_and_attributes() {
        let html = highlight(r#"<a href="/x">link</a>"#, "html");
        assert!(html.contains(&span(TokenClass::Tag, "a")));
        assert!(html.contains(&span(TokenClass::Attribute, "href")));
        assert!(html.contains(&span(TokenClass::String, r#""/x""#)));
        assert!(html.contains(&span(TokenClass::Bracket, "&lt;/")));
        assert!(html.contains(&span(TokenClass::Bracket, "&gt;")));
    }

    #[test]
    fn test_markup_comment() {
        let html = highlight("<!-- note --><p>", "xml");
        assert!(html.contains(&span(TokenClass::Comment, "&lt;!-- note --&gt;")));
    }

    #[test]
    fn test_stylesheet_properties() {
        let html = highlight("a:hover {\n  color: red;\n  margin: 4px;\n}", "css");
        assert!(html.contains(&span(TokenClass::Property, "color")));
        assert!(html.contains(&span(TokenClass::Property, "margin")));
        assert!(!html.contains(&span(TokenClass::Property, "a")));
    }

    #[test]
    fn test_json_keys() {
        let html = highlight(r#"{"flag": "CTF{x}", "points": 100}"#, "json");
        assert!(html.contains(&span(TokenClass::Key, r#""flag""#)));
        assert!(html.contains(&span(TokenClass::String, r#""CTF{x}""#)));
        assert!(html.contains(&span(TokenClass::Key, r#""points""#)));
        assert!(html.contains(&span(TokenClass::Number, "100")));
    }

    #[test]
    fn test_yaml_bare_keys() {
        let html = highlight("name: web\nports:\n  - 80", "yaml");
        assert!(html.contains(&span(TokenClass::Key, "name")));
        assert!(html.contains(&span(TokenClass::Key, "ports")));
        assert!(html.contains(&span(TokenClass::Number, "80")));
    }

    #[test]
    fn test_text_content_round_trips() {
        let samples = [
            ("python", "def f(a, b):\n    return a < b and \"x\" # done\n"),
            ("html", "<div class=\"a\">&amp; <b>bold</b></div>"),
            ("rust", "fn main() { let v: Vec<u8> = vec![1, 2]; }"),
            ("json", r#"{"a": [1, 2, {"b": null}]}"#),
            ("text", "<script>alert(1)</script>"),
        ];
        for (language, code) in samples {
            let html = highlight(code, language);
            assert_eq!(unescape_html(&strip_tags(&html)), code, "language {language}");
        }
    }
}
