//! Cache storage implementations.

use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use super::error::CacheError;
use super::traits::{CacheEntry, CacheStore};

/// How long a writer waits on a lock held by another process.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Schema for the response cache.
const CACHE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS cache (
    key TEXT PRIMARY KEY,
    response TEXT NOT NULL,
    timestamp INTEGER NOT NULL
);
"#;

/// Storage implementation that doesn't cache anything.
/// Used when caching is disabled - all operations are no-ops.
pub struct NoopStore;

impl CacheStore for NoopStore {
  fn get(&self, _key: &str) -> Result<Option<CacheEntry>, CacheError> {
    Ok(None) // Always miss
  }

  fn put(&self, _key: &str, _payload: &Value, _inserted_at: i64) -> Result<(), CacheError> {
    Ok(()) // Discard
  }
}

/// SQLite-based cache storage implementation.
///
/// The connection sits behind a mutex so a single store can be shared by
/// concurrent fetches; each `get`/`put` holds the lock for one statement.
pub struct SqliteStore {
  conn: Mutex<Connection>,
}

impl SqliteStore {
  /// Open (or create) the cache database at `path`.
  ///
  /// Creates missing parent directories and the schema. Safe to call on
  /// every start; fails if the file exists but is not a usable database.
  pub fn open(path: &Path) -> Result<Self, CacheError> {
    if let Some(parent) = path.parent() {
      if !parent.as_os_str().is_empty() {
        std::fs::create_dir_all(parent)?;
      }
    }

    let conn = Connection::open(path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Self::with_connection(conn)
  }

  /// Open a private in-memory cache. Nothing survives the process.
  #[cfg(test)]
  pub fn open_in_memory() -> Result<Self, CacheError> {
    Self::with_connection(Connection::open_in_memory()?)
  }

  fn with_connection(conn: Connection) -> Result<Self, CacheError> {
    conn.execute_batch(CACHE_SCHEMA)?;
    Ok(Self {
      conn: Mutex::new(conn),
    })
  }

  fn lock(&self) -> Result<MutexGuard<'_, Connection>, CacheError> {
    self.conn.lock().map_err(|_| CacheError::Poisoned)
  }
}

impl CacheStore for SqliteStore {
  fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
    let conn = self.lock()?;

    let row: Option<(Vec<u8>, i64)> = conn
      .query_row(
        "SELECT response, timestamp FROM cache WHERE key = ?1",
        params![key],
        |row| {
          let response = match row.get_ref(0)? {
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => bytes.to_vec(),
            _ => Vec::new(),
          };
          Ok((response, row.get(1)?))
        },
      )
      .optional()?;

    let Some((response, inserted_at)) = row else {
      return Ok(None);
    };

    let payload =
      serde_json::from_slice(&response).map_err(|source| CacheError::CorruptEntry {
        key: key.to_string(),
        source,
      })?;

    Ok(Some(CacheEntry {
      key: key.to_string(),
      payload,
      inserted_at,
    }))
  }

  fn put(&self, key: &str, payload: &Value, inserted_at: i64) -> Result<(), CacheError> {
    let response = serde_json::to_string(payload).map_err(CacheError::Serialize)?;
    let conn = self.lock()?;

    // Single statement, so SQLite commits it atomically
    conn.execute(
      "INSERT INTO cache (key, response, timestamp) VALUES (?1, ?2, ?3)
       ON CONFLICT(key) DO UPDATE SET
         response = excluded.response,
         timestamp = excluded.timestamp",
      params![key, response, inserted_at],
    )?;

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use tempfile::TempDir;

  const KEY: &str = "https://api.example.test/v2/groups";

  fn create_test_store() -> (SqliteStore, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let store =
      SqliteStore::open(&temp_dir.path().join("cache.db")).expect("Failed to open store");
    (store, temp_dir)
  }

  fn row_count(store: &SqliteStore) -> i64 {
    let conn = store.lock().unwrap();
    conn
      .query_row("SELECT COUNT(*) FROM cache", [], |row| row.get(0))
      .unwrap()
  }

  #[test]
  fn test_put_then_get_round_trip() {
    let (store, _dir) = create_test_store();
    let payload = json!([{"victim": "Acme", "country": "US", "press": null}]);

    store.put(KEY, &payload, 1_700_000_000).unwrap();
    let entry = store.get(KEY).unwrap().expect("entry should exist");

    assert_eq!(entry.key, KEY);
    assert_eq!(entry.payload, payload);
    assert_eq!(entry.inserted_at, 1_700_000_000);
  }

  #[test]
  fn test_get_missing_key() {
    let (store, _dir) = create_test_store();
    assert!(store.get("nope").unwrap().is_none());
  }

  #[test]
  fn test_put_upserts_instead_of_duplicating() {
    let (store, _dir) = create_test_store();

    store.put(KEY, &json!({"v": 1}), 100).unwrap();
    store.put(KEY, &json!({"v": 2}), 200).unwrap();

    let entry = store.get(KEY).unwrap().unwrap();
    assert_eq!(entry.payload, json!({"v": 2}));
    assert_eq!(entry.inserted_at, 200);
    assert_eq!(row_count(&store), 1);
  }

  #[test]
  fn test_stale_entry_is_not_deleted_by_get() {
    let (store, _dir) = create_test_store();
    store.put(KEY, &json!({"a": 1}), 0).unwrap();

    let entry = store.get(KEY).unwrap().unwrap();
    assert!(!entry.is_fresh(10_000, 3600));

    // Still there after being judged stale
    assert!(store.get(KEY).unwrap().is_some());
    assert_eq!(row_count(&store), 1);
  }

  #[test]
  fn test_corrupt_payload_is_reported() {
    let (store, _dir) = create_test_store();
    {
      let conn = store.lock().unwrap();
      conn
        .execute(
          "INSERT INTO cache (key, response, timestamp) VALUES (?1, ?2, ?3)",
          params![KEY, "{not json", 1],
        )
        .unwrap();
    }

    let err = store.get(KEY).unwrap_err();
    assert!(err.is_corrupt());
  }

  #[test]
  fn test_open_is_idempotent_and_persistent() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cache.db");

    {
      let store = SqliteStore::open(&path).unwrap();
      store.put(KEY, &json!({"kept": true}), 42).unwrap();
    }

    let reopened = SqliteStore::open(&path).unwrap();
    let entry = reopened.get(KEY).unwrap().unwrap();
    assert_eq!(entry.payload, json!({"kept": true}));
  }

  #[test]
  fn test_open_creates_missing_directories() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("dir").join("cache.db");

    SqliteStore::open(&path).unwrap();
    assert!(path.exists());
  }

  #[test]
  fn test_open_rejects_non_database_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cache.db");
    std::fs::write(&path, "not an sqlite database\n".repeat(64)).unwrap();

    assert!(SqliteStore::open(&path).is_err());
  }

  #[test]
  fn test_in_memory_store() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.put("k", &json!([1, 2, 3]), 5).unwrap();
    assert_eq!(store.get("k").unwrap().unwrap().payload, json!([1, 2, 3]));
  }

  #[test]
  fn test_noop_store_never_hits() {
    let store = NoopStore;
    store.put(KEY, &json!({"a": 1}), 1).unwrap();
    assert!(store.get(KEY).unwrap().is_none());
  }
}
