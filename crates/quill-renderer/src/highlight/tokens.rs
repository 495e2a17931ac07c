//! Piece buffer that highlighting passes split into classified tokens.
//!
//! Each pass only looks at [`Piece::Plain`] text, so a later pass never sees
//! text an earlier pass already claimed (a keyword inside a comment stays a
//! comment, a bracket inside a string stays a string).

use regex::Regex;

/// Token classes emitted by the highlighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Comment,
    String,
    Keyword,
    Type,
    Number,
    Function,
    Operator,
    Bracket,
    Tag,
    Attribute,
    Property,
    Key,
}

impl TokenClass {
    /// CSS classes for the token span (stable `hl-*` hook plus utility classes).
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Comment => "hl-comment text-slate-500 italic",
            Self::String => "hl-string text-emerald-400",
            Self::Keyword => "hl-keyword text-purple-400 font-semibold",
            Self::Type => "hl-type text-amber-300",
            Self::Number => "hl-number text-orange-400",
            Self::Function => "hl-function text-sky-400",
            Self::Operator => "hl-operator text-pink-400",
            Self::Bracket => "hl-bracket text-slate-400",
            Self::Tag => "hl-tag text-rose-400",
            Self::Attribute => "hl-attribute text-amber-200",
            Self::Property => "hl-property text-cyan-300",
            Self::Key => "hl-key text-cyan-300",
        }
    }
}

/// A run of already-escaped code text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Piece {
    /// Not yet claimed by any pass.
    Plain(String),
    /// Claimed by a pass.
    Token(TokenClass, String),
}

/// Escaped code split into plain and classified pieces.
#[derive(Debug)]
pub(crate) struct TokenBuffer {
    pieces: Vec<Piece>,
}

impl TokenBuffer {
    /// Start from escaped code; everything is plain.
    pub(crate) fn new(escaped: String) -> Self {
        Self {
            pieces: vec![Piece::Plain(escaped)],
        }
    }

    /// Claim every match of `re` in plain text as `class`.
    pub(crate) fn claim(&mut self, re: &Regex, class: TokenClass) {
        self.claim_group(re, 0, class);
    }

    /// Claim capture group `group` of every match; the rest of the match stays plain.
    pub(crate) fn claim_group(&mut self, re: &Regex, group: usize, class: TokenClass) {
        let mut pieces = Vec::with_capacity(self.pieces.len());
        for piece in self.pieces.drain(..) {
            match piece {
                Piece::Plain(text) => split_plain(&text, re, group, class, &mut pieces),
                token @ Piece::Token(..) => pieces.push(token),
            }
        }
        self.pieces = pieces;
    }

    /// Reclassify `from` tokens that are directly followed by a `:` in plain text.
    ///
    /// Used for data languages, where quoted keys are strings until we see the colon.
    pub(crate) fn retag_before_colon(&mut self, from: TokenClass, to: TokenClass) {
        for i in 0..self.pieces.len().saturating_sub(1) {
            let followed_by_colon = matches!(
                &self.pieces[i + 1],
                Piece::Plain(next) if next.trim_start().starts_with(':')
            );
            if followed_by_colon
                && let Piece::Token(class, _) = &mut self.pieces[i]
                && *class == from
            {
                *class = to;
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Render to HTML: plain text as-is, tokens wrapped in `<span>`.
    pub(crate) fn into_html(self) -> String {
        let mut out = String::new();
        for piece in self.pieces {
            match piece {
                Piece::Plain(text) => out.push_str(&text),
                Piece::Token(class, text) => {
                    out.push_str(r#"<span class=""#);
                    out.push_str(class.css_class());
                    out.push_str(r#"">"#);
                    out.push_str(&text);
                    out.push_str("</span>");
                }
            }
        }
        out
    }
}

fn split_plain(text: &str, re: &Regex, group: usize, class: TokenClass, out: &mut Vec<Piece>) {
    let mut last = 0;
    for caps in re.captures_iter(text) {
        let Some(m) = caps.get(group) else {
            continue;
        };
        if m.is_empty()
            || m.start() < last
            || splits_entity(text, m.start())
            || splits_entity(text, m.end())
        {
            continue;
        }
        if m.start() > last {
            out.push(Piece::Plain(text[last..m.start()].to_owned()));
        }
        out.push(Piece::Token(class, m.as_str().to_owned()));
        last = m.end();
    }
    if last < text.len() {
        out.push(Piece::Plain(text[last..].to_owned()));
    }
}

/// Whether byte offset `pos` falls strictly inside an escape entity.
fn splits_entity(text: &str, pos: usize) -> bool {
    let bytes = text.as_bytes();
    ["&amp;", "&lt;", "&gt;"].iter().any(|entity| {
        (1..entity.len()).any(|k| pos >= k && bytes[pos - k..].starts_with(entity.as_bytes()))
    })
}
