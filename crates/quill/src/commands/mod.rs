//! CLI command implementations.

pub(crate) mod copy_script;
pub(crate) mod languages;
pub(crate) mod render;

pub(crate) use copy_script::CopyScriptArgs;
pub(crate) use render::RenderArgs;

use std::io::Write;

use crate::error::CliError;

/// Write `content` to stdout, ending with a newline.
pub(crate) fn write_stdout(content: &str) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(content.as_bytes())?;
    if !content.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}
