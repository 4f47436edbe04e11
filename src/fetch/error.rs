use thiserror::Error;

/// Why a fetch produced no payload.
///
/// A 404 is not listed here: an absent resource is a successful, empty
/// result (`FetchOutcome::NotFound`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
  /// The transport could not complete the request (unreachable, timeout, DNS).
  #[error("request failed: {0}")]
  Network(String),

  /// Every attempt was answered with 429.
  #[error("rate limited; gave up after {attempts} attempts")]
  RateLimitExhausted { attempts: u32 },

  /// Any status other than 200, 404 and 429.
  #[error("HTTP {0} error")]
  UnexpectedStatus(u16),

  /// A 200 response whose body is not JSON.
  #[error("malformed response body: {0}")]
  MalformedBody(String),

  /// Base URL and path do not form a valid URL.
  #[error("invalid request path {0}")]
  InvalidPath(String),
}
