//! The rendering pipeline.

use crate::block::{self, BlockOptions, TocEntry};
use crate::{list, paragraph, protect, table};

/// Result of rendering one document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderResult {
    /// Rendered HTML fragment.
    pub html: String,
    /// Table of contents entries, in document order.
    pub toc: Vec<TocEntry>,
    /// Warnings generated during rendering (e.g., unterminated code fences).
    pub warnings: Vec<String>,
}

/// Rendering switches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Language tag for fences that declare none.
    pub default_language: String,
    /// Emit a copy button on each code block.
    pub copy_buttons: bool,
    /// Emit `id` anchors on headings.
    pub heading_anchors: bool,
    /// Open `http(s)` links in a new tab.
    pub external_links_new_tab: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            default_language: "text".to_owned(),
            copy_buttons: true,
            heading_anchors: true,
            external_links_new_tab: true,
        }
    }
}

/// Markdown-to-HTML renderer.
///
/// Holds only options, so one instance can serve any number of threads.
///
/// # Pipeline
///
/// 1. Protect: code blocks (highlighted) and inline code become placeholders
/// 2. Blocks: headings, rules, quotes, checkboxes, media, inline styles
/// 3. Lists
/// 4. Tables
/// 5. Paragraphs
/// 6. Restore placeholders
///
/// # Example
///
/// ```
/// use quill_renderer::Renderer;
///
/// let result = Renderer::new().render("# Hello\n\n**Bold** text");
/// assert!(result.html.contains("<h1"));
/// assert_eq!(result.toc[0].id, "hello");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    /// Create a renderer with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all options at once.
    #[must_use]
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the language used for fences without a language tag.
    #[must_use]
    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.options.default_language = language.into();
        self
    }

    /// Enable or disable copy buttons on code blocks.
    #[must_use]
    pub fn with_copy_buttons(mut self, enabled: bool) -> Self {
        self.options.copy_buttons = enabled;
        self
    }

    /// Enable or disable heading `id` anchors.
    #[must_use]
    pub fn with_heading_anchors(mut self, enabled: bool) -> Self {
        self.options.heading_anchors = enabled;
        self
    }

    /// Enable or disable `target="_blank"` on external links.
    #[must_use]
    pub fn with_external_links_new_tab(mut self, enabled: bool) -> Self {
        self.options.external_links_new_tab = enabled;
        self
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render a document.
    ///
    /// Never fails: malformed constructs come out as literal text, and anything
    /// worth telling the author about is listed in [`RenderResult::warnings`].
    #[must_use]
    pub fn render(&self, source: &str) -> RenderResult {
        let source = source.replace("\r\n", "\n");

        let protected = protect::extract(
            &source,
            &self.options.default_language,
            self.options.copy_buttons,
        );
        let mut warnings = protected.warnings;

        let blocks = block::transform(
            &protected.text,
            BlockOptions {
                heading_anchors: self.options.heading_anchors,
                external_links_new_tab: self.options.external_links_new_tab,
            },
            &protected.fragments,
        );
        let listed = list::reconstruct(&blocks.text);
        let tables = table::transform(&listed);
        warnings.extend(tables.warnings);
        let wrapped = paragraph::wrap(&tables.text);
        let html = protected.fragments.restore(wrapped);

        tracing::debug!(
            bytes_in = source.len(),
            bytes_out = html.len(),
            warnings = warnings.len(),
            "Rendered document"
        );

        RenderResult {
            html,
            toc: blocks.toc,
            warnings,
        }
    }
}

/// Render with default options and return only the HTML.
#[must_use]
pub fn render_markdown(source: &str) -> String {
    Renderer::new().render(source).html
}
