//! Block transformer: headings, rules, quotes, checkboxes, media, inline styles.
//!
//! Input: text with code already swapped for placeholders.
//! Output: the same text with these constructs rewritten to HTML. Headings,
//! horizontal rules, blockquotes, checkbox rows, block math, standalone images
//! and footnote definitions are surrounded by blank lines so the paragraph
//! wrapper sees each one as its own block.
//!
//! Rule order matters. Headings go first so `#` lines cannot turn into
//! anything else. Checkboxes go before the list stage sees `- ` lines. Images
//! go before links. Bold-italic goes before bold, bold before italic and
//! underline before single-underscore italic. Finished links and images are
//! held back behind placeholders while inline styles run, so emphasis markers
//! inside a URL stay literal.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::protect::{Fragments, Placeholder, PlaceholderKind};
use crate::util::{escape_html, slugify, strip_tags, unescape_html};

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(#{1,6})[ \t]+(.+?)[ \t]*$").expect("invalid heading regex"));

static HORIZONTAL_RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:-{3,}|\*{3,}|_{3,})[ \t]*$").expect("invalid rule regex")
});

static BLOCKQUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^>[ \t]?(.*)$").expect("invalid blockquote regex"));

static BLOCKQUOTE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(<blockquote [^\n]*</blockquote>)$").expect("invalid blockquote regex")
});

static CHECKBOX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*[-*+][ \t]+\[([ xX])\][ \t]+(.+)$").expect("invalid checkbox regex")
});

static FOOTNOTE_DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\[\^([^\]\s]+)\]:[ \t]+(.+)$").expect("invalid footnote regex")
});

static FOOTNOTE_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\^([^\]\s]+)\]").expect("invalid footnote regex"));

/// `$$` alone on a line through the next lone `$$`, or `$$...$$` filling a line.
static BLOCK_MATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^[ \t]*\$\$(?:[ \t]*\n(.+?)\n[ \t]*\$\$|([^$\n]+)\$\$)[ \t]*$")
        .expect("invalid block math regex")
});

static INLINE_MATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\$([^$\n]+?)\$\$|\$([^\s$][^$\n]*?[^\s$]|[^\s$])\$")
        .expect("invalid inline math regex")
});

static STANDALONE_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^[ \t]*!\[([^\]\n]*)\]\(([^)\s]+)(?:[ \t]+"([^"\n]*)")?\)[ \t]*$"#)
        .expect("invalid image regex")
});

static IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"!\[([^\]\n]*)\]\(([^)\s]+)(?:[ \t]+"([^"\n]*)")?\)"#).expect("invalid image regex")
});

static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[([^\]\n]+)\]\(([^)\s]+)(?:[ \t]+"([^"\n]*)")?\)"#).expect("invalid link regex")
});

static KEYBOARD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\[\]\n]+)\]\]").expect("invalid kbd regex"));

static HIGHLIGHT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"==([^=\n]+?)==").expect("invalid highlight regex"));

static BOLD_ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*\*([^*\n]+?)\*\*\*").expect("invalid emphasis regex"));

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*\n]+?)\*\*").expect("invalid emphasis regex"));

static UNDERLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b__([^_\n]+?)__\b").expect("invalid emphasis regex"));

static STRIKETHROUGH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"~~([^~\n]+?)~~").expect("invalid emphasis regex"));

static ITALIC_STAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*\s][^*\n]*?)\*").expect("invalid emphasis regex"));

static ITALIC_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b_([^_\n]+?)_\b").expect("invalid emphasis regex"));

const HR_HTML: &str = r#"<hr class="my-8 border-slate-700">"#;
const BLOCKQUOTE_OPEN: &str =
    r#"<blockquote class="my-4 border-l-4 border-indigo-500 bg-slate-800/50 py-2 pl-4 italic text-slate-300">"#;
const LINK_CLASS: &str = "text-indigo-400 underline hover:text-indigo-300";
const TASK_DONE: &str = r#"<span class="task-box flex h-4 w-4 items-center justify-center rounded border border-indigo-500 bg-indigo-500 text-[10px] leading-none text-white">✓</span>"#;
const TASK_OPEN: &str = r#"<span class="task-box h-4 w-4 rounded border border-slate-500"></span>"#;

/// One heading, as listed in the table of contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Heading text without markup.
    pub title: String,
    /// Anchor ID for linking (empty when anchors are disabled).
    pub id: String,
}

/// Switches for the block transformer.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BlockOptions {
    pub heading_anchors: bool,
    pub external_links_new_tab: bool,
}

/// Output of [`transform`].
#[derive(Debug)]
pub(crate) struct Blocks {
    pub text: String,
    pub toc: Vec<TocEntry>,
}

/// Apply every block and inline rule, in order.
pub(crate) fn transform(text: &str, options: BlockOptions, fragments: &Fragments) -> Blocks {
    let mut headings = HeadingIds::default();
    let mut toc = Vec::new();
    let mut markup = Markup::default();

    let text = HEADING.replace_all(text, |caps: &Captures| {
        let level = u8::try_from(caps[1].len()).unwrap_or(6);
        let content = &caps[2];
        let title = plain_title(&fragments.expand(content));
        let id = if options.heading_anchors {
            headings.unique(&title)
        } else {
            String::new()
        };
        let id_attr = if id.is_empty() {
            String::new()
        } else {
            format!(r#" id="{id}""#)
        };
        toc.push(TocEntry { level, title, id });
        format!(
            "\n\n<h{level}{id_attr} class=\"{}\">{content}</h{level}>\n\n",
            heading_class(level)
        )
    });

    let text = HORIZONTAL_RULE.replace_all(&text, format!("\n\n{HR_HTML}\n\n").as_str());
    let text = blockquotes(&text);
    let text = CHECKBOX.replace_all(&text, |caps: &Captures| {
        let (state, marker) = if &caps[1] == " " {
            ("open", TASK_OPEN)
        } else {
            ("done", TASK_DONE)
        };
        format!(
            "\n\n<div class=\"task-item my-1 flex items-center gap-2\" data-task=\"{state}\">{marker}<span>{}</span></div>\n\n",
            &caps[2]
        )
    });
    let text = FOOTNOTE_DEFINITION.replace_all(&text, |caps: &Captures| {
        let id = escape_html(&caps[1]);
        format!(
            "\n\n<div id=\"fn-{id}\" class=\"footnote mt-2 text-sm text-slate-400\"><sup>{id}</sup> {} <a href=\"#fnref-{id}\" class=\"{LINK_CLASS}\">↩</a></div>\n\n",
            &caps[2]
        )
    });
    let text = BLOCK_MATH.replace_all(&text, |caps: &Captures| {
        let math = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
        format!(
            "\n\n<div class=\"math-block my-4 overflow-x-auto text-center font-mono\">{}</div>\n\n",
            math.trim()
        )
    });

    let text = STANDALONE_IMAGE.replace_all(&text, |caps: &Captures| {
        let html = figure(&caps[1], &caps[2], caps.get(3).map(|m| m.as_str()));
        format!("\n\n{}\n\n", markup.hold(html))
    });
    let text = IMAGE.replace_all(&text, |caps: &Captures| {
        markup.hold(image_tag(&caps[1], &caps[2], caps.get(3).map(|m| m.as_str())))
    });
    let text = LINK.replace_all(&text, |caps: &Captures| {
        markup.hold(link(
            &caps[1],
            &caps[2],
            caps.get(3).map(|m| m.as_str()),
            options.external_links_new_tab,
        ))
    });

    let text = KEYBOARD.replace_all(
        &text,
        r#"<kbd class="rounded border border-slate-600 bg-slate-800 px-1.5 py-0.5 font-mono text-xs">$1</kbd>"#,
    );
    let text = inline_styles(&text);
    let text = INLINE_MATH.replace_all(&text, |caps: &Captures| {
        let math = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
        format!(r#"<span class="math-inline font-mono">{math}</span>"#)
    });
    let text = FOOTNOTE_REFERENCE.replace_all(&text, |caps: &Captures| {
        let id = escape_html(&caps[1]);
        format!(r##"<sup id="fnref-{id}"><a href="#fn-{id}" class="{LINK_CLASS}">{id}</a></sup>"##)
    });

    tracing::debug!(
        headings = toc.len(),
        held = markup.len(),
        "Transformed blocks"
    );

    Blocks {
        text: markup.release(text.into_owned()),
        toc,
    }
}

/// Highlight, emphasis, strike and underline.
fn inline_styles(text: &str) -> String {
    let text = HIGHLIGHT.replace_all(
        text,
        r#"<mark class="rounded bg-yellow-300/30 px-1 text-yellow-100">$1</mark>"#,
    );
    let text = BOLD_ITALIC.replace_all(&text, "<strong><em>$1</em></strong>");
    let text = BOLD.replace_all(&text, r#"<strong class="font-semibold text-white">$1</strong>"#);
    let text = UNDERLINE.replace_all(&text, "<u>$1</u>");
    let text = STRIKETHROUGH.replace_all(&text, r#"<del class="text-slate-500">$1</del>"#);
    let text = ITALIC_STAR.replace_all(&text, "<em>$1</em>");
    ITALIC_UNDERSCORE
        .replace_all(&text, "<em>$1</em>")
        .into_owned()
}

/// Rewrite `>` lines and merge consecutive quotes into one element.
fn blockquotes(text: &str) -> String {
    if !text.contains('>') {
        return text.to_owned();
    }
    let quoted = BLOCKQUOTE.replace_all(text, format!("{BLOCKQUOTE_OPEN}$1</blockquote>").as_str());
    let merged = quoted.replace(&format!("</blockquote>\n{BLOCKQUOTE_OPEN}"), "<br>");
    BLOCKQUOTE_BLOCK
        .replace_all(&merged, "\n\n$1\n\n")
        .into_owned()
}

fn heading_class(level: u8) -> &'static str {
    match level {
        1 => "mt-8 mb-4 text-3xl font-bold text-white",
        2 => "mt-8 mb-3 text-2xl font-bold text-white",
        3 => "mt-6 mb-3 text-xl font-semibold text-white",
        4 => "mt-6 mb-2 text-lg font-semibold text-slate-100",
        5 => "mt-4 mb-2 text-base font-semibold text-slate-200",
        _ => "mt-4 mb-2 text-sm font-semibold uppercase tracking-wide text-slate-300",
    }
}

/// Heading text as a reader sees it: no tags, entities decoded, markers dropped.
fn plain_title(content: &str) -> String {
    let text = unescape_html(&strip_tags(content));
    let text = text.replace("**", "").replace("~~", "").replace("==", "");
    text.trim().to_owned()
}

/// Assigns each heading a document-unique ID.
#[derive(Debug, Default)]
struct HeadingIds {
    issued: HashSet<String>,
}

impl HeadingIds {
    /// Slug of `title`, suffixed `-1`, `-2`, ... until no earlier heading has it.
    fn unique(&mut self, title: &str) -> String {
        let mut base_id = slugify(title);
        if base_id.is_empty() {
            base_id = "section".to_owned();
        }
        let mut id = base_id.clone();
        let mut suffix = 0;
        while self.issued.contains(&id) {
            suffix += 1;
            id = format!("{base_id}-{suffix}");
        }
        self.issued.insert(id.clone());
        id
    }
}

/// Finished link and image HTML, parked behind placeholders.
#[derive(Debug, Default)]
struct Markup {
    items: Vec<String>,
}

impl Markup {
    fn hold(&mut self, html: String) -> String {
        let token = Self::token(self.items.len());
        self.items.push(html);
        token
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    /// Put the markup back. Newest first, so a link wrapping an image token
    /// is restored before the image inside it.
    fn release(self, mut text: String) -> String {
        for (index, html) in self.items.into_iter().enumerate().rev() {
            text = text.replacen(&Self::token(index), &html, 1);
        }
        text
    }

    fn token(index: usize) -> String {
        Placeholder {
            kind: PlaceholderKind::Markup,
            index,
        }
        .to_string()
    }
}

fn title_attr(title: Option<&str>) -> String {
    title.map_or_else(String::new, |t| format!(r#" title="{}""#, escape_html(t)))
}

fn image_tag(alt: &str, src: &str, title: Option<&str>) -> String {
    format!(
        r#"<img src="{}" alt="{}"{} loading="lazy" class="inline-block max-w-full rounded">"#,
        escape_html(src),
        escape_html(alt),
        title_attr(title)
    )
}

fn figure(alt: &str, src: &str, title: Option<&str>) -> String {
    let caption = if alt.is_empty() {
        String::new()
    } else {
        format!(
            r#"<figcaption class="mt-2 text-center text-sm text-slate-400">{}</figcaption>"#,
            escape_html(alt)
        )
    };
    format!(
        r#"<figure class="my-6"><img src="{}" alt="{}"{} loading="lazy" class="mx-auto max-w-full rounded-lg">{caption}</figure>"#,
        escape_html(src),
        escape_html(alt),
        title_attr(title)
    )
}

fn link(text: &str, href: &str, title: Option<&str>, new_tab: bool) -> String {
    let external = href.starts_with("http://") || href.starts_with("https://");
    let target = if new_tab && external {
        r#" target="_blank" rel="noopener noreferrer""#
    } else {
        ""
    };
    format!(
        r#"<a href="{}"{}{target} class="{LINK_CLASS}">{}</a>"#,
        escape_html(href),
        title_attr(title),
        inline_styles(text)
    )
}
