//! Markdown-to-HTML renderer for user-authored content.
//!
//! This crate turns markdown-like text (challenge descriptions, write-ups,
//! curriculum steps, posts) into an HTML fragment styled with utility classes,
//! and provides the companion copy-code script a page embeds once.
//!
//! # Architecture
//!
//! [`Renderer`] runs a fixed sequence of pure string stages. Code is pulled out
//! first and replaced with placeholders, so markdown rules never see it; code
//! blocks are highlighted by [`highlight()`] at that point. The placeholders
//! are swapped back for the finished HTML as the very last step.
//!
//! Ordinary text is emitted as raw HTML and is not sanitized. Only code content
//! is escaped. Callers that accept untrusted input must sanitize the output.
//!
//! # Example
//!
//! ```
//! use quill_renderer::{Renderer, copy_script_tag};
//!
//! let result = Renderer::new().render("## Setup\n\n```bash\necho hi\n```");
//! let page = format!("{}\n{}", result.html, copy_script_tag());
//! assert!(page.contains("copyCode(this)"));
//! ```

mod block;
mod code_block;
mod copy_script;
mod fence;
pub mod highlight;
mod list;
mod paragraph;
mod protect;
mod renderer;
mod table;
mod util;

pub use block::TocEntry;
pub use code_block::{CodeBlock, encode_payload};
pub use copy_script::{
    COPIED_LABEL, COPIED_RESET_MS, COPY_FUNCTION_NAME, copy_script, copy_script_tag,
};
pub use highlight::{TokenClass, highlight, supported_languages};
pub use renderer::{RenderOptions, RenderResult, Renderer, render_markdown};
pub use util::{escape_html, slugify};
