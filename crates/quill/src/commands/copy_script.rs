//! `quill copy-script` command implementation.

use clap::Args;
use quill_renderer::{copy_script, copy_script_tag};

use crate::commands::write_stdout;
use crate::error::CliError;

/// Arguments for the copy-script command.
#[derive(Args)]
pub(crate) struct CopyScriptArgs {
    /// Wrap the script in a `<script>` element.
    #[arg(long)]
    tag: bool,
}

impl CopyScriptArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        if self.tag {
            write_stdout(&copy_script_tag())
        } else {
            write_stdout(copy_script())
        }
    }
}
