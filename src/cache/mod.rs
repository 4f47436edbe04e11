//! Persistent response cache.
//!
//! This module provides an API-agnostic key/value store that:
//! - Persists serialized JSON payloads keyed by canonical request URL
//! - Records when each payload was written (seconds since epoch)
//! - Leaves freshness decisions to the caller (entries are never expired here)
//! - Reports unreadable payloads as `CacheError::CorruptEntry`

mod error;
mod storage;
mod traits;

pub use storage::{NoopStore, SqliteStore};
pub use traits::CacheStore;

#[cfg(test)]
pub(crate) use error::CacheError;
#[cfg(test)]
pub(crate) use traits::CacheEntry;
