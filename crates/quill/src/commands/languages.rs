//! `quill languages` command implementation.

use quill_renderer::highlight::{aliases_for, supported_languages};

use crate::commands::write_stdout;
use crate::error::CliError;

/// Print every highlighted language with its aliases.
pub(crate) fn execute() -> Result<(), CliError> {
    write_stdout(&language_table())
}

/// One line per language: canonical name, then aliases if any.
fn language_table() -> String {
    let mut names = supported_languages();
    names.sort_unstable();
    names
        .into_iter()
        .map(|name| {
            let aliases = aliases_for(name);
            if aliases.is_empty() {
                name.to_owned()
            } else {
                format!("{name:<12} {}", aliases.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
