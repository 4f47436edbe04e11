//! Fetch client that orchestrates cache lookups, requests and retries.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

use crate::cache::CacheStore;

use super::backoff::{RetryDecision, RetryPolicy, RetryState};
use super::clock::{Clock, SystemClock};
use super::error::FetchError;
use super::transport::{Transport, TransportOutcome};

/// Default time-to-live for cached responses.
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// Terminal state of one fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
  /// Served from a fresh cache entry; no request was made
  Cached(Value),
  /// Fetched from the network and written to the cache
  Fetched(Value),
  /// The server answered 404: no data, but not an error
  NotFound,
  /// The fetch failed; nothing was cached
  Failed(FetchError),
}

impl FetchOutcome {
  /// Collapse to the payload, if any. Not-found and failure both give `None`.
  pub fn into_payload(self) -> Option<Value> {
    match self {
      FetchOutcome::Cached(payload) | FetchOutcome::Fetched(payload) => Some(payload),
      FetchOutcome::NotFound | FetchOutcome::Failed(_) => None,
    }
  }
}

/// Cache-first HTTP client with bounded retry on rate limiting.
///
/// This sits between the API layer and the network:
///
/// 1. Check cache - if a fresh entry exists, return it without a request
/// 2. Otherwise GET the resource
/// 3. On 429, wait (server hint or exponential backoff) and try again,
///    up to the attempt budget
/// 4. On 200, parse the body and write it through to the cache
///
/// Any other response ends the fetch immediately.
pub struct FetchClient<S: CacheStore + ?Sized, T: Transport, C: Clock = SystemClock> {
  base_url: Url,
  store: Arc<S>,
  transport: T,
  clock: C,
  /// How long cached responses stay fresh
  ttl_secs: u64,
  policy: RetryPolicy,
}

impl<S: CacheStore + ?Sized, T: Transport, C: Clock> FetchClient<S, T, C> {
  pub fn new(base_url: Url, store: Arc<S>, transport: T, clock: C) -> Self {
    Self {
      base_url,
      store,
      transport,
      clock,
      ttl_secs: DEFAULT_TTL_SECS,
      policy: RetryPolicy::default(),
    }
  }

  /// Set the TTL for cached responses, in seconds.
  pub fn with_ttl(mut self, ttl_secs: u64) -> Self {
    self.ttl_secs = ttl_secs;
    self
  }

  /// Set the retry limits used on rate limiting.
  pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
    self.policy = policy;
    self
  }

  pub fn base_url(&self) -> &Url {
    &self.base_url
  }

  /// Absolute URL for `path`, which doubles as its cache key.
  pub fn request_url(&self, path: &str) -> Result<Url, FetchError> {
    let joined = format!(
      "{}/{}",
      self.base_url.as_str().trim_end_matches('/'),
      path.trim_start_matches('/')
    );
    Url::parse(&joined).map_err(|e| FetchError::InvalidPath(format!("{}: {}", path, e)))
  }

  /// Absolute URL for `segments`, each percent-encoded as one path segment.
  ///
  /// Empty, `.` and `..` segments are rejected instead of being resolved
  /// against the base path.
  pub fn segments_url<P: AsRef<str>>(&self, segments: &[P]) -> Result<Url, FetchError> {
    let mut url = self.base_url.clone();
    {
      let mut path = url.path_segments_mut().map_err(|_| {
        FetchError::InvalidPath(format!("{} cannot take path segments", self.base_url))
      })?;
      path.pop_if_empty();
      for segment in segments {
        let segment = segment.as_ref();
        if matches!(segment, "" | "." | "..") {
          return Err(FetchError::InvalidPath(format!(
            "'{}' is not a usable path segment",
            segment
          )));
        }
        path.push(segment);
      }
    }
    Ok(url)
  }

  /// Fetch the JSON payload for `path`.
  ///
  /// Returns `None` both when the resource does not exist and when the
  /// fetch failed; use [`fetch_outcome`](Self::fetch_outcome) to tell
  /// them apart.
  pub async fn fetch(&self, path: &str) -> Option<Value> {
    self.fetch_outcome(path).await.into_payload()
  }

  /// Fetch `path` and report how the fetch ended.
  pub async fn fetch_outcome(&self, path: &str) -> FetchOutcome {
    match self.request_url(path) {
      Ok(url) => self.fetch_url(&url).await,
      Err(e) => {
        warn!(path, error = %e, "refusing to fetch");
        FetchOutcome::Failed(e)
      }
    }
  }

  /// Fetch the resource named by `segments` (see [`segments_url`](Self::segments_url)).
  pub async fn fetch_segments<P: AsRef<str>>(&self, segments: &[P]) -> FetchOutcome {
    match self.segments_url(segments) {
      Ok(url) => self.fetch_url(&url).await,
      Err(e) => {
        warn!(error = %e, "refusing to fetch");
        FetchOutcome::Failed(e)
      }
    }
  }

  async fn fetch_url(&self, url: &Url) -> FetchOutcome {
    let key = url.as_str();

    if let Some(payload) = self.lookup(key) {
      return FetchOutcome::Cached(payload);
    }

    let mut retry = RetryState::new(self.policy);
    loop {
      debug!(url = key, attempt = retry.attempt(), "sending request");

      match self.transport.get(url).await {
        TransportOutcome::Success(body) => return self.accept(key, &body),
        TransportOutcome::RateLimited { retry_after } => {
          match retry.on_rate_limited(retry_after) {
            RetryDecision::Wait(wait) => {
              warn!(
                url = key,
                wait_secs = wait.as_secs(),
                hinted = retry_after.is_some(),
                next_attempt = retry.attempt(),
                max_attempts = retry.max_attempts(),
                "rate limited, backing off"
              );
              self.clock.sleep(wait).await;
            }
            RetryDecision::GiveUp { attempts } => {
              warn!(url = key, attempts, "rate limited, giving up");
              return FetchOutcome::Failed(FetchError::RateLimitExhausted { attempts });
            }
          }
        }
        TransportOutcome::NotFound => {
          info!(url = key, "no records found");
          return FetchOutcome::NotFound;
        }
        TransportOutcome::Status(code) => {
          warn!(url = key, status = code, "unexpected status");
          return FetchOutcome::Failed(FetchError::UnexpectedStatus(code));
        }
        TransportOutcome::Failure(reason) => {
          warn!(url = key, error = %reason, "request failed");
          return FetchOutcome::Failed(FetchError::Network(reason));
        }
      }
    }
  }

  /// Return the cached payload for `key` if it is present and fresh.
  fn lookup(&self, key: &str) -> Option<Value> {
    match self.store.get(key) {
      Ok(Some(entry)) if entry.is_fresh(self.clock.now(), self.ttl_secs) => {
        debug!(url = %entry.key, inserted_at = entry.inserted_at, "cache hit");
        Some(entry.payload)
      }
      Ok(Some(entry)) => {
        debug!(url = key, inserted_at = entry.inserted_at, "cache entry stale");
        None
      }
      Ok(None) => {
        debug!(url = key, "cache miss");
        None
      }
      Err(e) if e.is_corrupt() => {
        warn!(url = key, error = %e, "ignoring corrupt cache entry");
        None
      }
      Err(e) => {
        warn!(url = key, error = %e, "cache read failed");
        None
      }
    }
  }

  /// Parse a 200 body and write it through to the cache.
  fn accept(&self, key: &str, body: &str) -> FetchOutcome {
    let payload: Value = match serde_json::from_str(body) {
      Ok(payload) => payload,
      Err(e) => {
        warn!(url = key, error = %e, "response body is not JSON");
        return FetchOutcome::Failed(FetchError::MalformedBody(e.to_string()));
      }
    };

    // The payload is still good if the write fails; the next fetch refetches
    if let Err(e) = self.store.put(key, &payload, self.clock.now()) {
      warn!(url = key, error = %e, "failed to cache response");
    }

    info!(url = key, "fetched");
    FetchOutcome::Fetched(payload)
  }
}
