//! Core traits and types for the caching system.

use serde_json::Value;

use super::error::CacheError;

/// A cached response payload together with its write time.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
  /// Canonical request key (the absolute request URL)
  pub key: String,
  /// The deserialized JSON payload
  pub payload: Value,
  /// When the entry was last written, in seconds since the Unix epoch
  pub inserted_at: i64,
}

impl CacheEntry {
  /// Whether the entry is still fresh at `now` for the given TTL (seconds).
  ///
  /// Freshness is strict: an entry written at `t0` is fresh up to
  /// `t0 + ttl - 1` and stale from `t0 + ttl` on.
  pub fn is_fresh(&self, now: i64, ttl_secs: u64) -> bool {
    let age = now.saturating_sub(self.inserted_at);
    i128::from(age) < i128::from(ttl_secs)
  }
}

/// Trait for cache storage backends.
///
/// Stores are raw key/value lookups: they never apply TTL logic and never
/// delete entries. Implementations must make `put` atomic, so a reader sees
/// either the old payload or the new one.
pub trait CacheStore: Send + Sync {
  /// Get the entry stored for `key`.
  ///
  /// Returns `CacheError::CorruptEntry` if the stored payload cannot be parsed.
  fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError>;

  /// Insert or replace the entry for `key`.
  fn put(&self, key: &str, payload: &Value, inserted_at: i64) -> Result<(), CacheError>;
}
