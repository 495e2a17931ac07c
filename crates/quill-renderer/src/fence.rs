//! Code fence detection for the protector.
//!
//! Fences use backticks or tildes (three or more). The closing fence must use
//! the same character and be at least as long as the opening fence.

use std::collections::HashMap;

/// Opening fence found on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FenceOpen {
    /// Fence character (backtick or tilde).
    pub fence_char: char,
    /// Length of the opening run (minimum length for closing).
    pub fence_len: usize,
    /// Info string after the fence run, trimmed.
    pub info: String,
}

/// Tracks code fence state during line-by-line processing.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<FenceOpen>,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Check if currently inside a fenced code block.
    pub(crate) fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Start tracking from an opening line.
    ///
    /// Returns `false` (and leaves state unchanged) if the line is not an
    /// opening fence or a fence is already open.
    pub(crate) fn open(&mut self, line: &str) -> bool {
        if self.open.is_some() {
            return false;
        }
        self.open = detect_fence(line.trim_start());
        self.open.is_some()
    }

    /// Info string of the currently open fence.
    pub(crate) fn info(&self) -> Option<&str> {
        self.open.as_ref().map(|open| open.info.as_str())
    }

    /// Close the current fence if `line` is a valid closing fence.
    pub(crate) fn close(&mut self, line: &str) -> bool {
        let Some(open) = &self.open else {
            return false;
        };
        if is_closing_fence(line.trim_start(), open.fence_char, open.fence_len) {
            self.open = None;
            return true;
        }
        false
    }
}

/// Detect if a line starts a code fence.
fn detect_fence(trimmed: &str) -> Option<FenceOpen> {
    let first = trimmed.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }

    let count = trimmed.chars().take_while(|&c| c == first).count();
    if count < 3 {
        return None;
    }

    let info = trimmed[count..].trim();
    // A backtick info string may not contain backticks (that's inline code)
    if first == '`' && info.contains('`') {
        return None;
    }

    Some(FenceOpen {
        fence_char: first,
        fence_len: count,
        info: info.to_owned(),
    })
}

/// Check if a line is a valid closing fence.
///
/// The closing fence must:
/// - Use the same character as opening
/// - Be at least as long as opening
/// - Contain only fence characters (optionally followed by whitespace)
fn is_closing_fence(trimmed: &str, expected_char: char, min_len: usize) -> bool {
    let first = match trimmed.chars().next() {
        Some(c) if c == expected_char => c,
        _ => return false,
    };

    let count = trimmed.chars().take_while(|&c| c == first).count();
    if count < min_len {
        return false;
    }

    trimmed[count..].chars().all(char::is_whitespace)
}

/// Parse fence info string into language and attributes.
///
/// Format: `language [key=value ...]`. The language is lowercased.
#[must_use]
pub(crate) fn parse_fence_info(info: &str) -> (String, HashMap<String, String>) {
    let mut parts = info.split_whitespace();
    let language = parts.next().unwrap_or("").to_lowercase();

    let mut attrs = HashMap::new();
    for part in parts {
        if let Some((key, value)) = part.split_once('=') {
            let value = value.trim_matches('"').trim_matches('\'');
            attrs.insert(key.to_owned(), value.to_owned());
        }
    }

    (language, attrs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_fence_initially() {
        let tracker = FenceTracker::new();
        assert!(!tracker.in_fence());
        assert_eq!(tracker.info(), None);
    }

    #[test]
    fn test_backtick_fence() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.open("```rust"));
        assert!(tracker.in_fence());
        assert_eq!(tracker.info(), Some("rust"));

        assert!(!tracker.close("fn main() {}"));
        assert!(tracker.in_fence());

        assert!(tracker.close("```"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_tilde_fence() {
        let mut tracker = FenceTracker::new();
        assert!(tracker.open("~~~"));
        assert!(!tracker.close("```"));
        assert!(tracker.close("~~~"));
    }

    #[test]
    fn test_closing_fence_must_be_long_enough() {
        let mut tracker = FenceTracker::new();
        assert!(tracker.open("````md"));
        assert!(!tracker.close("```"));
        assert!(tracker.close("`````"));
    }

    #[test]
    fn test_closing_fence_rejects_trailing_text() {
        let mut tracker = FenceTracker::new();
        assert!(tracker.open("```"));
        assert!(!tracker.close("``` not a close"));
        assert!(tracker.close("```   "));
    }

    #[test]
    fn test_two_backticks_is_not_a_fence() {
        let mut tracker = FenceTracker::new();
        assert!(!tracker.open("``code``"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_inline_code_run_is_not_a_fence() {
        let mut tracker = FenceTracker::new();
        assert!(!tracker.open("```a``` b"));
    }

    #[test]
    fn test_indented_fence() {
        let mut tracker = FenceTracker::new();
        assert!(tracker.open("   ```python"));
        assert_eq!(tracker.info(), Some("python"));
    }

    #[test]
    fn test_parse_fence_info_language_only() {
        let (lang, attrs) = parse_fence_info("Rust");
        assert_eq!(lang, "rust");
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_parse_fence_info_with_attrs() {
        let (lang, attrs) = parse_fence_info("python title=solve.py");
        assert_eq!(lang, "python");
        assert_eq!(attrs.get("title"), Some(&"solve.py".to_owned()));
    }

    #[test]
    fn test_parse_fence_info_quoted_values() {
        let (lang, attrs) = parse_fence_info("bash title='setup.sh'");
        assert_eq!(lang, "bash");
        assert_eq!(attrs.get("title"), Some(&"setup.sh".to_owned()));
    }

    #[test]
    fn test_parse_fence_info_empty() {
        let (lang, attrs) = parse_fence_info("   ");
        assert_eq!(lang, "");
        assert!(attrs.is_empty());
    }
}
