//! Hugging Face Hub backed registry with a local file cache

use super::{ModelDescriptor, ModelRegistry, TokenizerDescriptor};
use crate::error::{ConfigError, Error, RegistryError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default Hub endpoint
pub const DEFAULT_ENDPOINT: &str = "https://huggingface.co";

/// Default revision used when resolving repository files
pub const DEFAULT_REVISION: &str = "main";

const CONFIG_FILE: &str = "config.json";
const VOCAB_FILE: &str = "vocab.txt";

/// Resolved settings for [`HubRegistry`]
#[derive(Debug, Clone, PartialEq)]
pub struct HubSettings {
    /// Base URL of the Hub
    pub endpoint: String,
    /// Branch, tag or commit to resolve files from
    pub revision: String,
    /// Directory holding downloaded files
    pub cache_dir: PathBuf,
    /// Access token for gated or private repositories
    pub token: Option<String>,
    /// Only consult local directories and the cache
    pub offline: bool,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            revision: DEFAULT_REVISION.to_string(),
            cache_dir: Self::default_cache_dir(),
            token: None,
            offline: false,
            timeout: Duration::from_secs(30),
        }
    }
}

impl HubSettings {
    /// Get the default cache directory
    pub fn default_cache_dir() -> PathBuf {
        let mut path = dirs::cache_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("crammers");
        path.push("hub");
        path
    }

    /// Build settings from the process environment
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    ///
    /// Recognized keys: `HF_ENDPOINT`, `HF_TOKEN` (or the older
    /// `HUGGING_FACE_HUB_TOKEN`), `HF_HUB_OFFLINE` and `CRAMMERS_CACHE_DIR`.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(endpoint) = lookup("HF_ENDPOINT").filter(|v| !v.is_empty()) {
            settings.endpoint = endpoint;
        }
        settings.token = lookup("HF_TOKEN")
            .or_else(|| lookup("HUGGING_FACE_HUB_TOKEN"))
            .filter(|v| !v.is_empty());
        if let Some(offline) = lookup("HF_HUB_OFFLINE") {
            settings.offline = matches!(
                offline.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        if let Some(dir) = lookup("CRAMMERS_CACHE_DIR").filter(|v| !v.is_empty()) {
            settings.cache_dir = PathBuf::from(dir);
        }

        settings
    }

    /// Validate the settings before building a client
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "endpoint".to_string(),
                value: format!("{} (must start with http:// or https://)", self.endpoint),
            });
        }

        if self.revision.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "revision".to_string(),
                value: "<empty>".to_string(),
            });
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "timeout".to_string(),
                value: "0 (must be non-zero)".to_string(),
            });
        }

        Ok(())
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = revision.into();
        self
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Registry that reads `config.json` and `vocab.txt` from a local model
/// directory or from a Hub repository.
///
/// Hub files are cached under `{cache_dir}/{owner--repo}/{revision}/` and
/// reused on later lookups. Other processes may populate the same cache;
/// every write lands through a temporary file and an atomic rename.
pub struct HubRegistry {
    client: Client,
    settings: HubSettings,
}

impl HubRegistry {
    /// Create a new Hub registry
    pub fn new(settings: HubSettings) -> Result<Self> {
        settings.validate()?;

        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("crammers/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &HubSettings {
        &self.settings
    }

    /// Location of a repository file inside the cache
    pub fn cache_path(&self, repo_id: &str, file: &str) -> PathBuf {
        self.settings
            .cache_dir
            .join(repo_id.replace('/', "--"))
            .join(&self.settings.revision)
            .join(file)
    }

    fn file_url(&self, repo_id: &str, file: &str) -> String {
        format!(
            "{}/{}/resolve/{}/{}",
            self.settings.endpoint.trim_end_matches('/'),
            repo_id,
            self.settings.revision,
            file
        )
    }

    /// Read and parse one file for a model, from a local directory, the
    /// cache, or the Hub.
    ///
    /// A downloaded file is cached only after `parse` accepts it.
    async fn read_file<T, F>(&self, model_name: &str, file: &str, parse: F) -> Result<T>
    where
        F: Fn(&str) -> std::result::Result<T, String>,
    {
        let parse_text = |text: &str| -> Result<T> {
            parse(text).map_err(|reason| Error::from(RegistryError::lookup(model_name, reason)))
        };

        let local_dir = Path::new(model_name);
        if local_dir.is_dir() {
            let path = local_dir.join(file);
            debug!("Reading {} from local directory {:?}", file, local_dir);
            let text = tokio::fs::read_to_string(&path).await.map_err(|e| {
                RegistryError::lookup(model_name, format!("{}: {}", path.display(), e))
            })?;
            return parse_text(&text);
        }

        validate_repo_id(model_name)?;

        let cached = self.cache_path(model_name, file);
        if cached.is_file() {
            debug!("Cache hit for {}/{} at {:?}", model_name, file, cached);
            let text = tokio::fs::read_to_string(&cached).await.map_err(|e| {
                RegistryError::lookup(model_name, format!("{}: {}", cached.display(), e))
            })?;
            return parse_text(&text);
        }

        if self.settings.offline {
            return Err(RegistryError::lookup(
                model_name,
                format!("{} is not cached and offline mode is enabled", file),
            )
            .into());
        }

        let text = self.download(model_name, file).await?;
        let parsed = parse_text(&text)?;

        if let Err(e) = store_atomically(cached.clone(), text).await {
            warn!("Failed to cache {}/{} at {:?}: {}", model_name, file, cached, e);
        }

        Ok(parsed)
    }

    async fn download(&self, repo_id: &str, file: &str) -> Result<String> {
        let url = self.file_url(repo_id, file);
        info!("Fetching {}", url);

        let mut request = self.client.get(&url);
        if let Some(token) = &self.settings.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RegistryError::lookup(repo_id, format!("request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(RegistryError::lookup(
                repo_id,
                format!("{} not found on {}", file, self.settings.endpoint),
            )
            .into());
        }
        if !status.is_success() {
            return Err(
                RegistryError::lookup(repo_id, format!("HTTP {} for {}", status, url)).into(),
            );
        }

        response
            .text()
            .await
            .map_err(|e| RegistryError::lookup(repo_id, format!("failed to read body: {}", e)).into())
    }
}

#[async_trait]
impl ModelRegistry for HubRegistry {
    async fn fetch_tokenizer_descriptor(&self, model_name: &str) -> Result<TokenizerDescriptor> {
        self.read_file(model_name, VOCAB_FILE, |text| {
            let descriptor = TokenizerDescriptor::from_vocab_text(text);
            if descriptor.vocab_size == 0 {
                return Err("vocabulary is empty".to_string());
            }
            Ok(descriptor)
        })
        .await
    }

    async fn fetch_model_descriptor(&self, model_name: &str) -> Result<ModelDescriptor> {
        self.read_file(model_name, CONFIG_FILE, |text| {
            ModelDescriptor::from_json(text)
                .map_err(|e| format!("malformed {}: {}", CONFIG_FILE, e))
        })
        .await
    }

    fn name(&self) -> &str {
        "huggingface-hub"
    }
}

/// Reject names that cannot be Hub repository ids
fn validate_repo_id(model_name: &str) -> Result<()> {
    let valid = !model_name.is_empty()
        && model_name.split('/').count() <= 2
        && model_name
            .split('/')
            .all(|part| !part.is_empty() && part != "." && part != "..")
        && model_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/'));

    if valid {
        Ok(())
    } else {
        Err(RegistryError::lookup(model_name, "not a valid repository id or local directory").into())
    }
}

async fn store_atomically(path: PathBuf, contents: String) -> std::io::Result<()> {
    tokio::task::spawn_blocking(move || write_atomic(&path, contents.as_bytes()))
        .await
        .map_err(std::io::Error::other)?
}

/// Write through a sibling temp file so readers never observe a partial file
fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(contents)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
