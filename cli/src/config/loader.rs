//! Registry settings loader for the crammers CLI
//!
//! Environment variables (`HF_ENDPOINT`, `HF_TOKEN`, `HF_HUB_OFFLINE`,
//! `CRAMMERS_CACHE_DIR`) form the base. The first settings file found is
//! layered on top:
//! 1. --config file/dir (highest priority)
//! 2. Current working directory: ./crammers.json or ./.crammers/config.json
//! 3. XDG config: $XDG_CONFIG_HOME/crammers/config.json or ~/.config/crammers/config.json
//!
//! Flag overrides apply last.

use anyhow::{anyhow, Context, Result};
use crammers_core::HubSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Raw settings file format, every key optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSettings {
    /// Hub endpoint URL
    pub endpoint: Option<String>,
    /// Revision to resolve files from
    pub revision: Option<String>,
    /// Cache directory (`~` and `$VAR` are expanded)
    pub cache_dir: Option<String>,
    /// Access token (can be "env:VAR_NAME" for environment variable)
    pub token: Option<String>,
    /// Never touch the network
    pub offline: Option<bool>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// CLI settings loader
#[derive(Debug, Default)]
pub struct CliSettingsLoader {
    /// Override config file/directory path
    config_override: Option<PathBuf>,
    /// Flag overrides
    endpoint_override: Option<String>,
    cache_dir_override: Option<PathBuf>,
    offline_override: bool,
}

impl CliSettingsLoader {
    /// Create a new loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Set config file/directory override
    pub fn with_config_override(mut self, path: PathBuf) -> Self {
        self.config_override = Some(path);
        self
    }

    /// Set endpoint override
    pub fn with_endpoint_override(mut self, endpoint: String) -> Self {
        self.endpoint_override = Some(endpoint);
        self
    }

    /// Set cache directory override
    pub fn with_cache_dir_override(mut self, cache_dir: PathBuf) -> Self {
        self.cache_dir_override = Some(cache_dir);
        self
    }

    /// Force offline mode
    pub fn with_offline_override(mut self, offline: bool) -> Self {
        self.offline_override = offline;
        self
    }

    /// Load and resolve registry settings
    pub async fn load(&self) -> Result<HubSettings> {
        let raw = if let Some(override_path) = &self.config_override {
            Some(self.load_from_path(override_path).await.with_context(|| {
                format!(
                    "Failed to load config from override path: {}",
                    override_path.display()
                )
            })?)
        } else {
            self.search_and_load().await?
        };

        let mut settings = HubSettings::from_env();
        if let Some(raw) = raw {
            settings = apply_raw(settings, raw, |key| std::env::var(key).ok())?;
        }

        let settings = self.apply_overrides(settings);
        settings
            .validate()
            .context("Invalid registry settings")?;

        Ok(settings)
    }

    fn apply_overrides(&self, mut settings: HubSettings) -> HubSettings {
        if let Some(endpoint) = &self.endpoint_override {
            settings.endpoint = endpoint.clone();
        }
        if let Some(cache_dir) = &self.cache_dir_override {
            settings.cache_dir = cache_dir.clone();
        }
        if self.offline_override {
            settings.offline = true;
        }
        settings
    }

    /// Search for a settings file in priority order
    async fn search_and_load(&self) -> Result<Option<RawSettings>> {
        let cwd = std::env::current_dir()?;
        for candidate in [
            cwd.join("crammers.json"),
            cwd.join(".crammers").join("config.json"),
        ] {
            if candidate.exists() {
                return Ok(Some(self.load_file(&candidate).await?));
            }
        }

        if let Some(config_dir) = self.get_xdg_config_dir() {
            let config_path = config_dir.join("crammers").join("config.json");
            if config_path.exists() {
                return Ok(Some(self.load_file(&config_path).await?));
            }
        }

        Ok(None)
    }

    /// Load settings from a specific path (file or directory)
    async fn load_from_path(&self, path: &Path) -> Result<RawSettings> {
        if path.is_file() {
            self.load_file(path).await
        } else if path.is_dir() {
            let config_file = path.join("config.json");
            if config_file.exists() {
                self.load_file(&config_file).await
            } else {
                Err(anyhow!(
                    "No config.json found in directory: {}",
                    path.display()
                ))
            }
        } else {
            Err(anyhow!("Config path does not exist: {}", path.display()))
        }
    }

    /// Load a single settings file
    async fn load_file(&self, path: &Path) -> Result<RawSettings> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Get XDG config directory
    fn get_xdg_config_dir(&self) -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            Some(PathBuf::from(xdg_config))
        } else if let Ok(home) = std::env::var("HOME") {
            Some(PathBuf::from(home).join(".config"))
        } else {
            None
        }
    }
}

/// Layer a settings file over resolved settings
fn apply_raw<F>(mut settings: HubSettings, raw: RawSettings, lookup: F) -> Result<HubSettings>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(endpoint) = raw.endpoint {
        settings.endpoint = endpoint;
    }

    if let Some(revision) = raw.revision {
        settings.revision = revision;
    }

    if let Some(cache_dir) = raw.cache_dir {
        let expanded = shellexpand::full_with_context_no_errors(
            &cache_dir,
            || lookup("HOME"),
            |var| lookup(var),
        );
        settings.cache_dir = PathBuf::from(expanded.as_ref());
    }

    // Resolve token (handle env: prefix)
    if let Some(token) = raw.token {
        settings.token = Some(if let Some(var_name) = token.strip_prefix("env:") {
            lookup(var_name)
                .with_context(|| format!("Environment variable not found: {}", var_name))?
        } else {
            token
        });
    }

    if let Some(offline) = raw.offline {
        settings.offline = offline;
    }

    if let Some(secs) = raw.timeout_secs {
        settings.timeout = Duration::from_secs(secs);
    }

    Ok(settings)
}
