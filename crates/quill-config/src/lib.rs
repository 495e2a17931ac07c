//! Configuration management for Quill.
//!
//! Parses `quill.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `render.default_language`
//! - `page.title`
//! - `page.stylesheet`

mod expand;

use std::path::{Path, PathBuf};

use quill_renderer::RenderOptions;
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the language for fences without one.
    pub default_language: Option<String>,
    /// Override copy buttons flag.
    pub copy_buttons: Option<bool>,
    /// Override heading anchors flag.
    pub heading_anchors: Option<bool>,
    /// Override input size limit.
    pub max_bytes: Option<u64>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "quill.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rendering switches.
    pub render: RenderConfig,
    /// Input limits.
    pub input: InputConfig,
    /// Standalone page settings.
    pub page: PageConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Language tag for fences that declare none.
    pub default_language: String,
    /// Emit copy buttons on code blocks.
    pub copy_buttons: bool,
    /// Emit `id` anchors on headings.
    pub heading_anchors: bool,
    /// Open `http(s)` links in a new tab.
    pub external_links_new_tab: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let options = RenderOptions::default();
        Self {
            default_language: options.default_language,
            copy_buttons: options.copy_buttons,
            heading_anchors: options.heading_anchors,
            external_links_new_tab: options.external_links_new_tab,
        }
    }
}

/// Input limits.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Largest document the CLI will render, in bytes.
    pub max_bytes: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_bytes: 1024 * 1024,
        }
    }
}

/// Settings for `quill render --standalone`.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Page `<title>`.
    pub title: String,
    /// Stylesheet href; empty for none.
    pub stylesheet: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "Preview".to_owned(),
            stylesheet: String::new(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`page.stylesheet`").
        field: String,
        /// Error message (e.g., "${`QUILL_CSS`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `quill.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values. The result is validated last.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the final configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Renderer options from the `[render]` section.
    #[must_use]
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            default_language: self.render.default_language.clone(),
            copy_buttons: self.render.copy_buttons,
            heading_anchors: self.render.heading_anchors,
            external_links_new_tab: self.render.external_links_new_tab,
        }
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(language) = &settings.default_language {
            self.render.default_language.clone_from(language);
        }
        if let Some(copy_buttons) = settings.copy_buttons {
            self.render.copy_buttons = copy_buttons;
        }
        if let Some(heading_anchors) = settings.heading_anchors {
            self.render.heading_anchors = heading_anchors;
        }
        if let Some(max_bytes) = settings.max_bytes {
            self.input.max_bytes = max_bytes;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_render()?;
        self.validate_input()?;
        self.validate_page()?;
        Ok(())
    }

    fn validate_render(&self) -> Result<(), ConfigError> {
        let language = &self.render.default_language;
        if language.is_empty() {
            return Err(ConfigError::Validation(
                "render.default_language cannot be empty".to_owned(),
            ));
        }
        if language.chars().any(char::is_whitespace) {
            return Err(ConfigError::Validation(format!(
                "render.default_language cannot contain whitespace: {language:?}"
            )));
        }
        Ok(())
    }

    fn validate_input(&self) -> Result<(), ConfigError> {
        if self.input.max_bytes == 0 {
            return Err(ConfigError::Validation(
                "input.max_bytes must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_page(&self) -> Result<(), ConfigError> {
        let href = &self.page.stylesheet;
        if href.is_empty() {
            return Ok(());
        }
        let allowed = href.starts_with("http://")
            || href.starts_with("https://")
            || href.starts_with('/')
            || href.starts_with('.');
        if !allowed {
            return Err(ConfigError::Validation(format!(
                "page.stylesheet must be an http(s) URL or a path starting with / or .: {href}"
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.render.default_language =
            expand::expand_env(&self.render.default_language, "render.default_language")?;
        self.page.title = expand::expand_env(&self.page.title, "page.title")?;
        self.page.stylesheet = expand::expand_env(&self.page.stylesheet, "page.stylesheet")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.render.default_language, "text");
        assert!(config.render.copy_buttons);
        assert!(config.render.heading_anchors);
        assert!(config.render.external_links_new_tab);
        assert_eq!(config.input.max_bytes, 1_048_576);
        assert_eq!(config.page.title, "Preview");
        assert_eq!(config.page.stylesheet, "");
        assert!(config.config_path.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_render_config() {
        let toml = r#"
[render]
default_language = "bash"
copy_buttons = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.render.default_language, "bash");
        assert!(!config.render.copy_buttons);
        assert!(config.render.heading_anchors); // Default
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[render]
default_language = "python"
copy_buttons = true
heading_anchors = false
external_links_new_tab = false

[input]
max_bytes = 4096

[page]
title = "Write-up"
stylesheet = "/static/app.css"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.input.max_bytes, 4096);
        assert_eq!(config.page.title, "Write-up");
        assert_eq!(config.page.stylesheet, "/static/app.css");
        config.validate().unwrap();
    }

    #[test]
    fn test_render_options() {
        let toml = r#"
[render]
default_language = "rust"
heading_anchors = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.render_options(),
            RenderOptions {
                default_language: "rust".to_owned(),
                copy_buttons: true,
                heading_anchors: false,
                external_links_new_tab: true,
            }
        );
    }

    #[test]
    fn test_load_explicit_path() {
        let (_dir, path) = write_config("[page]\ntitle = \"Docs\"\n");
        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.page.title, "Docs");
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_path() {
        let result = Config::load(Some(Path::new("/nonexistent/quill.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let (_dir, path) = write_config("[render\n");
        let result = Config::load(Some(&path), None);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_applies_cli_settings() {
        let (_dir, path) = write_config("[render]\ncopy_buttons = true\n[input]\nmax_bytes = 10\n");
        let settings = CliSettings {
            copy_buttons: Some(false),
            max_bytes: Some(20),
            ..Default::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert!(!config.render.copy_buttons);
        assert_eq!(config.input.max_bytes, 20);
        assert!(config.render.heading_anchors); // Unchanged
    }

    #[test]
    fn test_cli_settings_are_validated() {
        let (_dir, path) = write_config("");
        let settings = CliSettings {
            max_bytes: Some(0),
            ..Default::default()
        };
        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("input.max_bytes"));
    }

    #[test]
    fn test_apply_cli_settings_default_language() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            default_language: Some("go".to_owned()),
            ..Default::default()
        });
        assert_eq!(config.render.default_language, "go");
        assert!(config.render.copy_buttons); // Unchanged
    }

    #[test]
    fn test_validate_default_language() {
        let mut config = Config::default();
        config.render.default_language = String::new();
        assert!(config.validate().is_err());

        config.render.default_language = "two words".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("whitespace"));
    }

    #[test]
    fn test_validate_stylesheet() {
        let mut config = Config::default();
        for ok in ["https://cdn.example.com/a.css", "/a.css", "./a.css", "../a.css"] {
            config.page.stylesheet = ok.to_owned();
            config.validate().unwrap();
        }
        config.page.stylesheet = "javascript:alert(1)".to_owned();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("page.stylesheet"));
    }

    #[test]
    fn test_load_expands_env_vars() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("QUILL_TEST_CSS", "https://cdn.example.com/quill.css");
        }
        let (_dir, path) = write_config("[page]\nstylesheet = \"${QUILL_TEST_CSS}\"\n");
        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.page.stylesheet, "https://cdn.example.com/quill.css");
        unsafe {
            std::env::remove_var("QUILL_TEST_CSS");
        }
    }

    #[test]
    fn test_load_env_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("QUILL_TEST_UNSET_CSS");
        }
        let (_dir, path) = write_config("[page]\nstylesheet = \"${QUILL_TEST_UNSET_CSS:-}\"\n");
        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.page.stylesheet, "");
    }

    #[test]
    fn test_load_missing_env_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("QUILL_TEST_MISSING_TITLE");
        }
        let (_dir, path) = write_config("[page]\ntitle = \"${QUILL_TEST_MISSING_TITLE}\"\n");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { ref field, .. } if field == "page.title"));
    }
}
