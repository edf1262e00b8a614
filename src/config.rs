//! Configuration for songscope.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (SONGSCOPE_HOME, SONGSCOPE_CATALOG)
//! 2. Config file (.songscope/config.yaml)
//! 3. Defaults (~/.songscope, legacy platform rooted at the home directory)
//!
//! Config file discovery:
//! - Searches current directory and parents for .songscope/config.yaml
//! - Paths in config file are relative to the project root (parent of .songscope/)
//!
//! Only the CLI reads this module; the query core takes everything it needs
//! as explicit arguments.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::{PlatformInfo, AUDIO_MIME_TYPE};

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub platform: Option<PlatformInfo>,
    #[serde(default)]
    pub indexer: Option<IndexerConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    /// Catalog database (relative to the project root)
    pub path: Option<String>,
    /// Fixed scope selector number -> volume name
    #[serde(default)]
    pub fixed_volumes: HashMap<u32, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexerConfig {
    /// Scanner command line; empty disables indexing requests
    #[serde(default)]
    pub command: Vec<String>,
    pub mime_type: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    /// Absolute path to songscope home
    pub home: PathBuf,
    /// Absolute path to the catalog database
    pub catalog_path: PathBuf,
    /// Fixed scope selector number -> volume name
    pub fixed_volumes: HashMap<u32, String>,
    /// Platform facts used for scope resolution
    pub platform: PlatformInfo,
    /// Indexing service settings
    pub indexer: IndexerSettings,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexerSettings {
    pub command: Vec<String>,
    pub mime_type: String,
    pub timeout_seconds: u64,
}

impl Default for IndexerSettings {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            mime_type: AUDIO_MIME_TYPE.to_string(),
            timeout_seconds: 30,
        }
    }
}

impl From<IndexerConfig> for IndexerSettings {
    fn from(config: IndexerConfig) -> Self {
        let defaults = Self::default();
        Self {
            command: config.command,
            mime_type: config.mime_type.unwrap_or(defaults.mime_type),
            timeout_seconds: config.timeout_seconds.unwrap_or(defaults.timeout_seconds),
        }
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".songscope").join("config.yaml");
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

/// Resolve a path that may be relative to the config file's project root
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Platform assumed when none is configured: one legacy store at `home`
fn default_platform() -> PlatformInfo {
    let root = dirs::home_dir()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    PlatformInfo::legacy(root)
}

/// Build the configuration from an optional config file and an environment
fn resolve_config(
    config_file: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".songscope");

    let home = env("SONGSCOPE_HOME")
        .map(PathBuf::from)
        .unwrap_or(default_home);

    let Some(config_path) = config_file else {
        let catalog_path = env("SONGSCOPE_CATALOG")
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join("catalog.db"));

        return Ok(ResolvedConfig {
            home,
            catalog_path,
            fixed_volumes: HashMap::new(),
            platform: default_platform(),
            indexer: IndexerSettings::default(),
            config_file: None,
        });
    };

    let config = load_config_file(&config_path)?;

    // Base directory is the parent of .songscope/ (i.e., grandparent of config.yaml)
    let base_dir = config_path
        .parent()
        .and_then(|p| p.parent())
        .unwrap_or(Path::new("."))
        .to_path_buf();

    let catalog_path = if let Some(env_catalog) = env("SONGSCOPE_CATALOG") {
        PathBuf::from(env_catalog)
    } else if let Some(ref path) = config.catalog.path {
        resolve_path(&base_dir, path)
    } else {
        home.join("catalog.db")
    };

    Ok(ResolvedConfig {
        home,
        catalog_path,
        fixed_volumes: config.catalog.fixed_volumes,
        platform: config.platform.unwrap_or_else(default_platform),
        indexer: config.indexer.map(Into::into).unwrap_or_default(),
        config_file: Some(config_path),
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    resolve_config(find_config_file(), |key| std::env::var(key).ok())
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}
