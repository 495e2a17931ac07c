//! List reconstructor.
//!
//! One forward pass over lines. Consecutive item lines become one `<ul>` or
//! `<ol>`; switching marker type closes the open list and opens the other
//! kind; any other line closes the open list. Indentation is ignored, so there
//! is no nesting. Ordered numerals are dropped (the browser renumbers).
//!
//! Each list is emitted with a blank line on both sides so it forms its own
//! block for the paragraph wrapper.

use std::sync::LazyLock;

use regex::Regex;

static UNORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*[-*+][ \t]+(.+)$").expect("invalid list regex"));

static ORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*\d+[.)][ \t]+(.+)$").expect("invalid list regex"));

const UL_OPEN: &str = r#"<ul class="my-4 ml-6 list-disc space-y-1">"#;
const OL_OPEN: &str = r#"<ol class="my-4 ml-6 list-decimal space-y-1">"#;
const LI_OPEN: &str = r#"<li class="leading-relaxed">"#;

/// Which list, if any, is open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ListState {
    None,
    Unordered,
    Ordered,
}

impl ListState {
    fn close(self, out: &mut Vec<String>) {
        match self {
            Self::None => {}
            Self::Unordered => {
                out.push("</ul>".to_owned());
                out.push(String::new());
            }
            Self::Ordered => {
                out.push("</ol>".to_owned());
                out.push(String::new());
            }
        }
    }

    fn open(self, out: &mut Vec<String>) {
        match self {
            Self::None => {}
            Self::Unordered => {
                out.push(String::new());
                out.push(UL_OPEN.to_owned());
            }
            Self::Ordered => {
                out.push(String::new());
                out.push(OL_OPEN.to_owned());
            }
        }
    }
}

/// Group list item lines into list elements.
pub(crate) fn reconstruct(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();

    let state = text.split('\n').fold(ListState::None, |state, line| {
        let (next, item) = if let Some(caps) = UNORDERED_ITEM.captures(line) {
            (ListState::Unordered, caps.get(1).map(|m| m.as_str()))
        } else if let Some(caps) = ORDERED_ITEM.captures(line) {
            (ListState::Ordered, caps.get(1).map(|m| m.as_str()))
        } else {
            (ListState::None, None)
        };

        if next != state {
            state.close(&mut out);
            next.open(&mut out);
        }
        match item {
            Some(item) => out.push(format!("{LI_OPEN}{item}</li>")),
            None => out.push(line.to_owned()),
        }
        next
    });
    state.close(&mut out);

    out.join("\n")
}
