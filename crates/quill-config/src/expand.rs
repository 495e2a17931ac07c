//! Environment variable expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// Returns the original string unchanged if no `${}` patterns are present.
/// Bare `$VAR` syntax is not expanded (only `${VAR}` with braces).
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    // Fast path: no expansion needed
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    if let Some(missing) = required_vars(value).find(|var| std::env::var(var).is_err()) {
        return Err(ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{missing}}} not set"),
        });
    }

    Ok(shellexpand::env_with_context_no_errors(value, |var| std::env::var(var).ok()).into_owned())
}

/// Names referenced as `${VAR}` without a default.
fn required_vars(value: &str) -> impl Iterator<Item = &str> {
    value
        .split("${")
        .skip(1)
        .filter_map(|rest| rest.split_once('}').map(|(inner, _)| inner))
        .filter(|inner| !inner.contains(":-"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expand_simple_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("QUILL_TEST_VAR_SIMPLE", "hello");
        }
        let result = expand_env("${QUILL_TEST_VAR_SIMPLE}", "test.field").unwrap();
        assert_eq!(result, "hello");
        unsafe {
            std::env::remove_var("QUILL_TEST_VAR_SIMPLE");
        }
    }

    #[test]
    fn test_expand_with_default_uses_value() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("QUILL_TEST_VAR_DEFAULT", "/custom.css");
        }
        let result = expand_env("${QUILL_TEST_VAR_DEFAULT:-/site.css}", "test.field").unwrap();
        assert_eq!(result, "/custom.css");
        unsafe {
            std::env::remove_var("QUILL_TEST_VAR_DEFAULT");
        }
    }

    #[test]
    fn test_expand_with_default_uses_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("QUILL_UNSET_VAR_TEST");
        }
        let result = expand_env("${QUILL_UNSET_VAR_TEST:-/site.css}", "test.field").unwrap();
        assert_eq!(result, "/site.css");
    }

    #[test]
    fn test_expand_with_empty_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("QUILL_EMPTY_DEFAULT_TEST");
        }
        let result = expand_env("${QUILL_EMPTY_DEFAULT_TEST:-}", "page.stylesheet").unwrap();
        assert_eq!(result, "");
    }

    #[test]
    fn test_expand_missing_var_error() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("QUILL_MISSING_VAR_TEST");
        }
        let err = expand_env("${QUILL_MISSING_VAR_TEST}", "page.title").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert_eq!(
            err.to_string(),
            "Environment variable error in page.title: ${QUILL_MISSING_VAR_TEST} not set"
        );
    }

    #[test]
    fn test_expand_literal_unchanged() {
        let result = expand_env("literal string", "test.field").unwrap();
        assert_eq!(result, "literal string");
    }

    #[test]
    fn test_bare_dollar_unchanged() {
        let result = expand_env("costs $5", "test.field").unwrap();
        assert_eq!(result, "costs $5");
    }

    #[test]
    fn test_expand_embedded_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("QUILL_HOST_TEST", "cdn.example.com");
        }
        let result = expand_env("https://${QUILL_HOST_TEST}/app.css", "test.url").unwrap();
        assert_eq!(result, "https://cdn.example.com/app.css");
        unsafe {
            std::env::remove_var("QUILL_HOST_TEST");
        }
    }

    #[test]
    fn test_required_vars() {
        let vars: Vec<&str> = required_vars("${A}/${B:-x}/${C}").collect();
        assert_eq!(vars, vec!["A", "C"]);
    }
}
