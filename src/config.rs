//! Configuration for buildmate, read from `buildmate.toml`.
//!
//! Settings are layered: file → environment → CLI. Every field has a
//! default, so running without a file works.
//!
//! # Configuration File Format
//!
//! ```toml
//! [service]
//! base_url = "http://127.0.0.1:3000"
//! timeout_secs = 15
//!
//! [pricing]
//! conversion_rate = 83.0
//! currency_symbol = "₹"
//!
//! [chat]
//! endpoint = "http://127.0.0.1:11434"
//! beginner_model = "deepseek-r1:14b"
//! recommend_model = "qwen2.5:14b"
//! # beginner_prompt_file = "prompts/beginner.md"
//! # recommend_prompt_file = "prompts/recommend.md"
//! ```
//!
//! # Lookup
//!
//! `--config <path>`, else `./buildmate.toml`, else
//! `<user config dir>/buildmate/buildmate.toml`, else built-in defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::chat::ChatMode;
use crate::pricing::Pricing;

pub const CONFIG_FILE_NAME: &str = "buildmate.toml";

pub const ENV_SERVICE_URL: &str = "BUILDMATE_SERVICE_URL";
pub const ENV_CHAT_ENDPOINT: &str = "BUILDMATE_CHAT_ENDPOINT";
pub const ENV_CONVERSION_RATE: &str = "BUILDMATE_CONVERSION_RATE";

/// Where candidate parts come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSection {
    /// Base URL of the compatibility service
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Chat backend and per-mode models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSection {
    /// Ollama server URL
    #[serde(default = "default_chat_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_beginner_model")]
    pub beginner_model: String,
    #[serde(default = "default_recommend_model")]
    pub recommend_model: String,
    /// Replaces the built-in beginner prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beginner_prompt_file: Option<PathBuf>,
    /// Replaces the built-in recommendation prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommend_prompt_file: Option<PathBuf>,
}

fn default_chat_endpoint() -> String {
    "http://127.0.0.1:11434".to_string()
}

fn default_beginner_model() -> String {
    "deepseek-r1:14b".to_string()
}

fn default_recommend_model() -> String {
    "qwen2.5:14b".to_string()
}

impl Default for ChatSection {
    fn default() -> Self {
        Self {
            endpoint: default_chat_endpoint(),
            beginner_model: default_beginner_model(),
            recommend_model: default_recommend_model(),
            beginner_prompt_file: None,
            recommend_prompt_file: None,
        }
    }
}

impl ChatSection {
    pub fn model_for(&self, mode: ChatMode) -> &str {
        match mode {
            ChatMode::Beginner => &self.beginner_model,
            ChatMode::Recommendation => &self.recommend_model,
        }
    }

    /// System prompt for `mode`: the configured file, else the built-in text.
    pub fn prompt_for(&self, mode: ChatMode) -> Result<String> {
        let file = match mode {
            ChatMode::Beginner => self.beginner_prompt_file.as_ref(),
            ChatMode::Recommendation => self.recommend_prompt_file.as_ref(),
        };
        match file {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read prompt file: {}", path.display())),
            None => Ok(mode.default_prompt().to_string()),
        }
    }
}

/// Root of `buildmate.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildmateToml {
    #[serde(default)]
    pub service: ServiceSection,
    #[serde(default)]
    pub pricing: Pricing,
    #[serde(default)]
    pub chat: ChatSection,
}

impl BuildmateToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse buildmate.toml")
    }

    /// Save configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize buildmate.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Apply `BUILDMATE_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides using `lookup` in place of the process environment.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_SERVICE_URL) {
            debug!(url = %url, "service URL from environment");
            self.service.base_url = url;
        }
        if let Some(endpoint) = lookup(ENV_CHAT_ENDPOINT) {
            debug!(endpoint = %endpoint, "chat endpoint from environment");
            self.chat.endpoint = endpoint;
        }
        if let Some(rate) = lookup(ENV_CONVERSION_RATE) {
            self.pricing.conversion_rate = rate
                .trim()
                .parse()
                .with_context(|| format!("{} must be a number, got '{}'", ENV_CONVERSION_RATE, rate))?;
        }
        Ok(())
    }

    /// Check for suspicious values. Returns human-readable warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !is_http_url(&self.service.base_url) {
            warnings.push(format!(
                "service.base_url '{}' should start with http:// or https://",
                self.service.base_url
            ));
        }
        if self.service.timeout_secs == 0 {
            warnings.push("service.timeout_secs is 0; every request would time out".to_string());
        }
        if !(self.pricing.conversion_rate.is_finite() && self.pricing.conversion_rate > 0.0) {
            warnings.push(format!(
                "pricing.conversion_rate must be positive, got {}",
                self.pricing.conversion_rate
            ));
        }
        if self.pricing.currency_symbol.trim().is_empty() {
            warnings.push("pricing.currency_symbol is empty".to_string());
        }
        if !is_http_url(&self.chat.endpoint) {
            warnings.push(format!(
                "chat.endpoint '{}' should start with http:// or https://",
                self.chat.endpoint
            ));
        }
        for (key, file) in [
            ("chat.beginner_prompt_file", &self.chat.beginner_prompt_file),
            ("chat.recommend_prompt_file", &self.chat.recommend_prompt_file),
        ] {
            if let Some(path) = file
                && !path.exists()
            {
                warnings.push(format!("{} '{}' does not exist", key, path.display()));
            }
        }

        warnings
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Default per-user config location.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("buildmate").join(CONFIG_FILE_NAME))
}

/// Find the config file to load: the explicit path if given, else the
/// first existing candidate.
pub fn locate_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }
    user_config_path().filter(|p| p.exists())
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct BuildmateConfig {
    /// File the settings came from, `None` when running on defaults
    pub source: Option<PathBuf>,
    pub toml: BuildmateToml,
    pub verbose: bool,
}

impl BuildmateConfig {
    /// Resolve configuration: file → environment → CLI overrides.
    pub fn load(explicit: Option<&Path>, service_url: Option<&str>, verbose: bool) -> Result<Self> {
        let source = locate_config(explicit);
        let mut toml = match &source {
            Some(path) => BuildmateToml::load(path)?,
            None => BuildmateToml::default(),
        };
        toml.apply_env()?;
        if let Some(url) = service_url {
            toml.service.base_url = url.to_string();
        }
        debug!(source = ?source, base_url = %toml.service.base_url, "configuration resolved");

        Ok(Self {
            source,
            toml,
            verbose,
        })
    }

    pub fn service_url(&self) -> &str {
        &self.toml.service.base_url
    }

    pub fn service_timeout(&self) -> Duration {
        Duration::from_secs(self.toml.service.timeout_secs)
    }

    pub fn pricing(&self) -> &Pricing {
        &self.toml.pricing
    }

    pub fn chat(&self) -> &ChatSection {
        &self.toml.chat
    }

    pub fn validate(&self) -> Vec<String> {
        self.toml.validate()
    }
}
