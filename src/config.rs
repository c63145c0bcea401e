use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    pub jira: Option<JiraConfig>,
}

/// Connection defaults from `config.toml`. Flags and environment win over these.
#[derive(Debug, Deserialize, Default)]
pub struct JiraConfig {
    pub url: Option<String>,
    pub context_path: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Connection parameters for one session against the Jira instance.
#[derive(Clone, PartialEq, Eq)]
pub struct Connection {
    pub url: String,
    pub context_path: String,
    pub username: String,
    pub password: String,
}

impl Connection {
    /// Site url joined with the optional context path, without a trailing slash.
    pub fn base_url(&self) -> String {
        let site = self.url.trim_end_matches('/');
        let context = self.context_path.trim_matches('/');
        if context.is_empty() {
            site.to_string()
        } else {
            format!("{site}/{context}")
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("url", &self.url)
            .field("context_path", &self.context_path)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn config_path() -> PathBuf {
    data_dir().join("config.toml")
}

pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".jira-assign")
}

pub fn load_config() -> Result<AppConfig> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: AppConfig =
        toml::from_str(&contents).with_context(|| "Failed to parse config.toml")?;
    Ok(config)
}

/// Reject a missing or empty required value with its user-facing message.
pub fn require(value: Option<String>, message: &'static str) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(message)),
    }
}

/// Optional text values count as absent when empty.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Split a comma-separated id list, dropping blanks and repeats while keeping
/// first-occurrence order.
pub fn parse_ticket_ids(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .filter(|id| seen.insert(*id))
        .map(String::from)
        .collect()
}
