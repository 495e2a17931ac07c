//! Table transformer.
//!
//! A table is a header row, a separator row made of pipes, dashes, colons and
//! spaces, then zero or more body rows containing a pipe. Leading and trailing
//! pipes are trimmed before splitting cells. Rows with a different cell count
//! than the header still render; they are reported as warnings.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

static SEPARATOR_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*\|?[ \t]*:?-+:?[ \t]*(?:\|[ \t]*:?-+:?[ \t]*)*\|?[ \t]*$")
        .expect("invalid table separator regex")
});

const TABLE_OPEN: &str = r#"<div class="my-6 overflow-x-auto"><table class="min-w-full border-collapse text-sm">"#;
const TH_CLASS: &str = "border-b border-slate-600 px-4 py-2 text-left font-semibold text-white";
const TD_CLASS: &str = "border-b border-slate-800 px-4 py-2 text-slate-300";

/// Column alignment from the separator row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Alignment {
    None,
    Left,
    Center,
    Right,
}

impl Alignment {
    fn from_separator(cell: &str) -> Self {
        match (cell.starts_with(':'), cell.ends_with(':')) {
            (true, true) => Self::Center,
            (true, false) => Self::Left,
            (false, true) => Self::Right,
            (false, false) => Self::None,
        }
    }

    fn style(self) -> &'static str {
        match self {
            Self::Left => r#" style="text-align:left""#,
            Self::Center => r#" style="text-align:center""#,
            Self::Right => r#" style="text-align:right""#,
            Self::None => "",
        }
    }
}

/// Output of [`transform`].
#[derive(Debug)]
pub(crate) struct Tables {
    pub text: String,
    pub warnings: Vec<String>,
}

/// Replace every header/separator/body group with a table.
pub(crate) fn transform(text: &str) -> Tables {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut warnings = Vec::new();
    let mut tables = 0;

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        let is_header = line.contains('|')
            && lines
                .get(i + 1)
                .is_some_and(|next| next.contains('|') && SEPARATOR_ROW.is_match(next));
        if !is_header {
            out.push(line.to_owned());
            i += 1;
            continue;
        }

        let header = split_row(line);
        let alignments: Vec<Alignment> = split_row(lines[i + 1])
            .iter()
            .map(|cell| Alignment::from_separator(cell))
            .collect();

        let mut body = Vec::new();
        let mut j = i + 2;
        while j < lines.len() && lines[j].contains('|') && !lines[j].trim().is_empty() {
            let row = split_row(lines[j]);
            if row.len() != header.len() {
                warnings.push(format!(
                    "Table row '{}' has {} cells, header has {}",
                    lines[j].trim(),
                    row.len(),
                    header.len()
                ));
            }
            body.push(row);
            j += 1;
        }

        tables += 1;
        out.push(String::new());
        out.push(render_table(&header, &alignments, &body));
        out.push(String::new());
        i = j;
    }

    tracing::debug!(tables, "Transformed tables");

    Tables {
        text: out.join("\n"),
        warnings,
    }
}

/// Split a row into trimmed cells, dropping the outer pipes.
fn split_row(line: &str) -> Vec<&str> {
    let trimmed = line.trim();
    let trimmed = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('|').unwrap_or(trimmed);
    trimmed.split('|').map(str::trim).collect()
}

fn render_table(header: &[&str], alignments: &[Alignment], body: &[Vec<&str>]) -> String {
    let align = |index: usize| {
        alignments
            .get(index)
            .copied()
            .unwrap_or(Alignment::None)
            .style()
    };

    let mut html = String::from(TABLE_OPEN);
    html.push_str("<thead><tr>");
    for (index, cell) in header.iter().enumerate() {
        let _ = write!(html, r#"<th class="{TH_CLASS}"{}>{cell}</th>"#, align(index));
    }
    html.push_str("</tr></thead><tbody>");
    for row in body {
        html.push_str(r#"<tr class="hover:bg-slate-800/50">"#);
        for (index, cell) in row.iter().enumerate() {
            let _ = write!(html, r#"<td class="{TD_CLASS}"{}>{cell}</td>"#, align(index));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table></div>");
    html
}
