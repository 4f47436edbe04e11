use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::fetch::{RetryPolicy, DEFAULT_TTL_SECS};

pub const DEFAULT_BASE_URL: &str = "https://api.ransomware.live/v2";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
  pub api: ApiConfig,
  pub cache: CacheConfig,
  pub retry: RetryConfig,
  pub export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
  /// Base endpoint every request path is appended to
  pub base_url: String,
  /// Per-request timeout in seconds
  pub timeout_secs: u64,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_string(),
      timeout_secs: 10,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
  /// Disable to always hit the network (nothing is stored)
  pub enabled: bool,
  /// Database location (default: $XDG_DATA_HOME/rwlive/cache.db)
  pub path: Option<PathBuf>,
  /// Seconds a cached response stays fresh
  pub ttl_secs: u64,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      path: None,
      ttl_secs: DEFAULT_TTL_SECS,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
  pub max_attempts: u32,
  pub initial_backoff_secs: u64,
  pub max_backoff_secs: u64,
  /// Upper bound for server-provided Retry-After hints
  pub max_retry_after_secs: u64,
}

impl Default for RetryConfig {
  fn default() -> Self {
    let policy = RetryPolicy::default();
    Self {
      max_attempts: policy.max_attempts,
      initial_backoff_secs: policy.initial_backoff_secs,
      max_backoff_secs: policy.max_backoff_secs,
      max_retry_after_secs: policy.max_retry_after_secs,
    }
  }
}

impl From<&RetryConfig> for RetryPolicy {
  fn from(config: &RetryConfig) -> Self {
    RetryPolicy {
      max_attempts: config.max_attempts,
      initial_backoff_secs: config.initial_backoff_secs,
      max_backoff_secs: config.max_backoff_secs,
      max_retry_after_secs: config.max_retry_after_secs,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
  /// Where exported files are written (default: current directory)
  pub dir: Option<PathBuf>,
}

impl Config {
  /// Load configuration from file, falling back to defaults.
  ///
  /// Search order:
  /// 1. Explicit path if provided (must exist)
  /// 2. ./rwlive.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/rwlive/config.yaml
  ///
  /// The result is not validated; apply command-line overrides first, then
  /// call [`validate`](Self::validate).
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Self::default(),
    };

    Ok(config)
  }

  /// Apply command-line overrides on top of the loaded file.
  pub fn with_overrides(mut self, base_url: Option<String>, no_cache: bool) -> Self {
    if let Some(base_url) = base_url {
      self.api.base_url = base_url;
    }
    if no_cache {
      self.cache.enabled = false;
    }
    self
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("rwlive.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("rwlive").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
    // An empty file deserializes to null, which means "all defaults"
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    serde_yaml::from_str(contents)
  }

  /// Reject settings the fetch client cannot work with.
  pub fn validate(&self) -> Result<()> {
    self.base_url()?;

    if self.api.timeout_secs == 0 {
      return Err(eyre!("api.timeout_secs must be at least 1"));
    }
    if self.retry.max_attempts == 0 {
      return Err(eyre!("retry.max_attempts must be at least 1"));
    }
    if self.retry.initial_backoff_secs == 0 {
      return Err(eyre!("retry.initial_backoff_secs must be at least 1"));
    }
    if self.retry.initial_backoff_secs > self.retry.max_backoff_secs {
      return Err(eyre!(
        "retry.initial_backoff_secs ({}) exceeds retry.max_backoff_secs ({})",
        self.retry.initial_backoff_secs,
        self.retry.max_backoff_secs
      ));
    }

    Ok(())
  }

  pub fn base_url(&self) -> Result<Url> {
    Url::parse(&self.api.base_url)
      .map_err(|e| eyre!("Invalid api.base_url '{}': {}", self.api.base_url, e))
  }

  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.api.timeout_secs)
  }

  pub fn retry_policy(&self) -> RetryPolicy {
    RetryPolicy::from(&self.retry)
  }

  /// Resolved cache database location.
  pub fn cache_path(&self) -> Result<PathBuf> {
    match &self.cache.path {
      Some(p) => Ok(expand_home(p)),
      None => Ok(data_dir()?.join("cache.db")),
    }
  }

  /// Resolved export directory.
  pub fn export_dir(&self) -> PathBuf {
    self
      .export
      .dir
      .as_deref()
      .map(expand_home)
      .unwrap_or_else(|| PathBuf::from("."))
  }
}

/// Per-user data directory for the cache and logs.
pub fn data_dir() -> Result<PathBuf> {
  let data_dir = dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .ok_or_else(|| eyre!("Could not determine data directory"))?;

  Ok(data_dir.join("rwlive"))
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: &Path) -> PathBuf {
  match (path.strip_prefix("~"), dirs::home_dir()) {
    (Ok(rest), Some(home)) => home.join(rest),
    _ => path.to_path_buf(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.timeout(), Duration::from_secs(10));
    assert_eq!(config.cache.ttl_secs, 3600);
    assert!(config.cache.enabled);
    assert_eq!(config.retry_policy(), RetryPolicy::default());
    assert!(config.validate().is_ok());
  }

  #[test]
  fn test_partial_yaml_keeps_other_defaults() {
    let yaml = r#"
cache:
  ttl_secs: 600
retry:
  max_attempts: 3
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.cache.ttl_secs, 600);
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.retry.initial_backoff_secs, 1);
    assert_eq!(config.retry.max_backoff_secs, 60);
    assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
  }

  #[test]
  fn test_empty_yaml_is_default() {
    let config = Config::from_yaml("\n").unwrap();
    assert_eq!(config.retry.max_attempts, 5);
  }

  #[test]
  fn test_full_yaml() {
    let yaml = r#"
api:
  base_url: http://localhost:8080/v2
  timeout_secs: 3
cache:
  enabled: false
  path: /tmp/rwlive-test/cache.db
retry:
  max_attempts: 8
  initial_backoff_secs: 2
  max_backoff_secs: 30
  max_retry_after_secs: 45
export:
  dir: /tmp/exports
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert!(config.validate().is_ok());
    assert!(!config.cache.enabled);
    assert_eq!(
      config.cache_path().unwrap(),
      PathBuf::from("/tmp/rwlive-test/cache.db")
    );
    assert_eq!(config.export_dir(), PathBuf::from("/tmp/exports"));
    assert_eq!(config.base_url().unwrap().as_str(), "http://localhost:8080/v2");
    assert_eq!(
      config.retry_policy(),
      RetryPolicy {
        max_attempts: 8,
        initial_backoff_secs: 2,
        max_backoff_secs: 30,
        max_retry_after_secs: 45,
      }
    );
  }

  #[test]
  fn test_validation_rejects_bad_values() {
    let mut config = Config::default();
    config.retry.max_attempts = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.retry.initial_backoff_secs = 120;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.api.timeout_secs = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.api.base_url = "not a url".to_string();
    assert!(config.validate().is_err());
  }

  #[test]
  fn test_explicit_missing_file_is_an_error() {
    let result = Config::load(Some(Path::new("/definitely/not/here/rwlive.yaml")));
    assert!(result.is_err());
  }

  #[test]
  fn test_load_from_explicit_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("rwlive.yaml");
    std::fs::write(&path, "cache:\n  ttl_secs: 42\n").unwrap();

    let config = Config::load(Some(path.as_path())).unwrap();
    assert_eq!(config.cache.ttl_secs, 42);
  }

  #[test]
  fn test_base_url_flag_overrides_bad_file_value() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("rwlive.yaml");
    std::fs::write(&path, "api:\n  base_url: \"not a url\"\n").unwrap();

    let config = Config::load(Some(path.as_path())).unwrap();
    assert!(config.validate().is_err());

    let config = config.with_overrides(Some("https://api.example.test/v2".into()), true);
    assert!(config.validate().is_ok());
    assert_eq!(config.api.base_url, "https://api.example.test/v2");
    assert!(!config.cache.enabled);
  }

  #[test]
  fn test_expand_home() {
    if let Some(home) = dirs::home_dir() {
      assert_eq!(expand_home(Path::new("~/x/y.db")), home.join("x/y.db"));
    }
    assert_eq!(expand_home(Path::new("/abs/y.db")), PathBuf::from("/abs/y.db"));
  }
}
