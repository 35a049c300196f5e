//! Configuration management for goatterm.
//!
//! Loads configuration from ${GOATTERM_HOME}/config.toml with sensible
//! defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default config template with comments, embedded at compile time.
const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("default_config.toml");

/// Built-in persona instruction, used when the config provides none.
const DEFAULT_PERSONA_PROMPT: &str = crate::prompt_str!("persona.md");

pub mod paths {
    //! Path resolution for goatterm configuration.
    //!
    //! GOATTERM_HOME resolution order:
    //! 1. GOATTERM_HOME environment variable (if set)
    //! 2. ~/.config/goatterm (default)

    use std::path::PathBuf;

    /// Returns the goatterm home directory.
    pub fn goatterm_home() -> PathBuf {
        if let Ok(home) = std::env::var("GOATTERM_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("goatterm"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        goatterm_home().join("config.toml")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The chat-completion model to use
    pub model: String,

    /// Sampling temperature for completions
    pub temperature: f64,

    /// Optional inline persona prompt
    pub persona_prompt: Option<String>,

    /// Optional path to a file containing the persona prompt
    pub persona_prompt_file: Option<String>,

    /// Optional API base URL (for test rigs or proxies)
    pub base_url: Option<String>,
}

impl Config {
    const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
    const DEFAULT_TEMPERATURE: f64 = 0.9;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Returns the effective persona prompt.
    ///
    /// Resolution order: file, inline, built-in persona. Blank overrides
    /// fall through to the built-in.
    pub fn effective_persona_prompt(&self) -> Result<String> {
        if let Some(path_str) = &self.persona_prompt_file {
            let path = Path::new(path_str);
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read persona prompt file: {}", path_str))?;
            let trimmed = content.trim();
            if !trimmed.is_empty() {
                return Ok(trimmed.to_string());
            }
        }

        let trimmed = self.persona_prompt.as_deref().unwrap_or("").trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }

        Ok(DEFAULT_PERSONA_PROMPT.trim().to_string())
    }

    /// Returns the effective base URL from config, if set.
    /// Empty strings are treated as unset.
    pub fn effective_base_url(&self) -> Option<&str> {
        self.base_url.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, DEFAULT_CONFIG_TEMPLATE)
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: Self::DEFAULT_MODEL.to_string(),
            temperature: Self::DEFAULT_TEMPERATURE,
            persona_prompt: None,
            persona_prompt_file: None,
            base_url: None,
        }
    }
}
