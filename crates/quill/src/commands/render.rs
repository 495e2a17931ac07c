//! `quill render` command implementation.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use quill_config::{CliSettings, Config, PageConfig};
use quill_renderer::{Renderer, copy_script_tag, escape_html};

use crate::commands::write_stdout;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render (default: stdin).
    file: Option<PathBuf>,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Wrap the fragment in a complete HTML page with the copy script.
    #[arg(long)]
    standalone: bool,

    /// Language for code fences without one (overrides config).
    #[arg(short = 'l', long)]
    default_language: Option<String>,

    /// Disable copy buttons on code blocks.
    #[arg(long)]
    no_copy_buttons: bool,

    /// Disable heading anchors.
    #[arg(long)]
    no_heading_anchors: bool,

    /// Reject inputs larger than this many bytes (overrides config).
    #[arg(long)]
    max_bytes: Option<u64>,

    /// Path to configuration file (default: auto-discover quill.toml).
    #[arg(short, long, env = "QUILL_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output (pipeline debug logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            default_language: self.default_language.clone(),
            copy_buttons: self.no_copy_buttons.then_some(false),
            heading_anchors: self.no_heading_anchors.then_some(false),
            max_bytes: self.max_bytes,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        tracing::info!(
            config = ?config.config_path,
            max_bytes = config.input.max_bytes,
            "Loaded configuration"
        );

        let source = read_source(self.file.as_deref(), config.input.max_bytes)?;
        let result = Renderer::new()
            .with_options(config.render_options())
            .render(&source);

        let source_name = self
            .file
            .as_deref()
            .map_or_else(|| "<stdin>".to_owned(), |path| path.display().to_string());
        tracing::info!(
            source = %source_name,
            headings = result.toc.len(),
            warnings = result.warnings.len(),
            "Rendered document"
        );
        output.render_warnings(&source_name, &result.warnings);

        let html = if self.standalone {
            standalone_page(&result.html, &config.page)
        } else {
            result.html
        };

        match &self.output {
            Some(path) => {
                std::fs::write(path, &html)?;
                output.success(&format!("Wrote {} bytes to {}", html.len(), path.display()));
            }
            None => write_stdout(&html)?,
        }

        Ok(())
    }
}

/// Read the document from `file` or stdin, refusing more than `limit` bytes.
fn read_source(file: Option<&Path>, limit: u64) -> Result<String, CliError> {
    match file {
        Some(path) => {
            let size = std::fs::metadata(path)?.len();
            if size > limit {
                return Err(CliError::InputTooLarge { size, limit });
            }
            read_limited(std::fs::File::open(path)?, limit)
        }
        None => read_limited(std::io::stdin().lock(), limit),
    }
}

fn read_limited(reader: impl Read, limit: u64) -> Result<String, CliError> {
    let mut bytes = Vec::new();
    reader.take(limit.saturating_add(1)).read_to_end(&mut bytes)?;
    let size = bytes.len() as u64;
    if size > limit {
        return Err(CliError::InputTooLarge { size, limit });
    }
    String::from_utf8(bytes).map_err(|_| CliError::Validation("Input is not valid UTF-8".to_owned()))
}

/// Minimal HTML page around a rendered fragment.
fn standalone_page(fragment: &str, page: &PageConfig) -> String {
    let stylesheet = if page.stylesheet.is_empty() {
        String::new()
    } else {
        format!(
            "<link rel=\"stylesheet\" href=\"{}\">\n",
            escape_html(&page.stylesheet)
        )
    };
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n{stylesheet}</head>\n\
         <body class=\"bg-slate-950 text-slate-200\">\n\
         <main class=\"mx-auto max-w-3xl px-6 py-10\">\n{fragment}\n</main>\n\
         {script}\n</body>\n</html>\n",
        title = escape_html(&page.title),
        script = copy_script_tag(),
    )
}
