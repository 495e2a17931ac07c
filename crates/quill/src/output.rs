//! Colored terminal output utilities.

use console::{Style, Term};

/// Terminal output formatter for status messages (always stderr).
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
        }
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print renderer warnings (yellow), one per line, then a count.
    pub(crate) fn render_warnings(&self, source: &str, warnings: &[String]) {
        if warnings.is_empty() {
            return;
        }
        for warning in warnings {
            let line = format!("{source}: warning: {warning}");
            let _ = self.term.write_line(&self.yellow.apply_to(line).to_string());
        }
        let plural = if warnings.len() == 1 { "" } else { "s" };
        let summary = format!("{} warning{plural} in {source}", warnings.len());
        let _ = self.term.write_line(&self.yellow.apply_to(summary).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }
}
