//! Configuration for shelf.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (SHELF_HOME, SHELF_API_URL)
//! 2. Config file (.shelf/config.yaml)
//! 3. Defaults (~/.shelf, Google Books API)
//!
//! Config file discovery:
//! - Searches current directory and parents for .shelf/config.yaml
//! - `paths.home` in the config file is relative to the .shelf/ directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::BookDefaults;
use crate::library::LIBRARY_STORAGE_KEY;

/// Default catalog endpoint
pub const DEFAULT_API_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// Log filter used when `RUST_LOG` is unset; mutation `info!` logs stay quiet
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub storage: Option<StorageConfig>,
    #[serde(default)]
    pub catalog: Option<CatalogConfig>,
    #[serde(default)]
    pub defaults: Option<DefaultsConfig>,
    #[serde(default)]
    pub notifications: Option<NotificationsConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory (relative to the .shelf/ directory)
    pub home: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub api_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub max_results: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DefaultsConfig {
    pub author: Option<String>,
    pub cover_url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsConfig {
    pub emoji: Option<bool>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to shelf home (library state)
    pub home: PathBuf,
    /// Storage key of the library document
    pub storage_key: String,
    /// Catalog API settings
    pub catalog: CatalogSettings,
    /// Placeholders for missing book metadata
    pub defaults: BookDefaults,
    /// Decorate notices with emoji
    pub emoji: bool,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSettings {
    pub api_url: String,
    pub timeout_seconds: u64,
    pub max_results: Option<u32>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_seconds: 30,
            max_results: None,
        }
    }
}

impl CatalogSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl ResolvedConfig {
    /// Path of the library document for the file-backed storage
    pub fn library_path(&self) -> PathBuf {
        self.home.join(format!("{}.json", self.storage_key))
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".shelf").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's directory
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Merge a parsed config file over the defaults
fn apply_config_file(config: ConfigFile, shelf_dir: &Path, default_home: PathBuf) -> ResolvedConfig {
    let home = config
        .paths
        .home
        .as_deref()
        .map(|home| resolve_path(shelf_dir, home))
        .unwrap_or(default_home);

    let storage_key = config
        .storage
        .and_then(|s| s.key)
        .unwrap_or_else(|| LIBRARY_STORAGE_KEY.to_string());

    let mut catalog = CatalogSettings::default();
    if let Some(c) = config.catalog {
        if let Some(api_url) = c.api_url {
            catalog.api_url = api_url;
        }
        if let Some(timeout) = c.timeout_seconds {
            catalog.timeout_seconds = timeout;
        }
        catalog.max_results = c.max_results;
    }

    let mut defaults = BookDefaults::default();
    if let Some(d) = config.defaults {
        if let Some(author) = d.author {
            defaults.author = author;
        }
        if let Some(cover_url) = d.cover_url {
            defaults.cover_url = cover_url;
        }
        if let Some(description) = d.description {
            defaults.description = description;
        }
    }

    let emoji = config
        .notifications
        .and_then(|n| n.emoji)
        .unwrap_or(true);

    ResolvedConfig {
        home,
        storage_key,
        catalog,
        defaults,
        emoji,
        config_file: None,
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    // Default home directory
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".shelf");

    // Check for config file
    let config_file = find_config_file();

    let mut resolved = if let Some(ref config_path) = config_file {
        let config = load_config_file(config_path)?;
        let shelf_dir = config_path.parent().unwrap_or(Path::new("."));
        apply_config_file(config, shelf_dir, default_home)
    } else {
        ResolvedConfig {
            home: default_home,
            storage_key: LIBRARY_STORAGE_KEY.to_string(),
            catalog: CatalogSettings::default(),
            defaults: BookDefaults::default(),
            emoji: true,
            config_file: None,
        }
    };

    if let Ok(env_home) = std::env::var("SHELF_HOME") {
        resolved.home = PathBuf::from(env_home);
    }
    if let Ok(api_url) = std::env::var("SHELF_API_URL") {
        resolved.catalog.api_url = api_url;
    }
    resolved.config_file = config_file;

    Ok(resolved)
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}
