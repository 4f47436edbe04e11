use thiserror::Error;

/// Errors raised by cache storage backends.
#[derive(Debug, Error)]
pub enum CacheError {
  #[error("cache database error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("cache i/o error: {0}")]
  Io(#[from] std::io::Error),

  #[error("failed to serialize payload: {0}")]
  Serialize(#[source] serde_json::Error),

  /// The stored payload for `key` is not valid JSON.
  #[error("corrupt cache entry for {key}: {source}")]
  CorruptEntry {
    key: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("cache lock poisoned")]
  Poisoned,
}

impl CacheError {
  pub fn is_corrupt(&self) -> bool {
    matches!(self, CacheError::CorruptEntry { .. })
  }
}
