//! Retry bookkeeping for rate-limited requests.

use std::time::Duration;

/// Limits applied when the server answers 429.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  /// Total number of requests per fetch, including the first one
  pub max_attempts: u32,
  /// First computed wait, in seconds
  pub initial_backoff_secs: u64,
  /// Upper bound for the computed wait, in seconds
  pub max_backoff_secs: u64,
  /// Upper bound applied to server-provided `Retry-After` hints, in seconds
  pub max_retry_after_secs: u64,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      max_attempts: 5,
      initial_backoff_secs: 1,
      max_backoff_secs: 60,
      max_retry_after_secs: 300,
    }
  }
}

/// What to do after a rate-limited response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
  /// Sleep for the given duration, then send the next attempt
  Wait(Duration),
  /// The attempt budget is spent
  GiveUp { attempts: u32 },
}

/// State of one fetch's retry loop.
///
/// The computed backoff advances on every 429, whether or not a server hint
/// replaced the wait for that particular attempt.
#[derive(Debug, Clone)]
pub struct RetryState {
  policy: RetryPolicy,
  attempt: u32,
  backoff_secs: u64,
}

impl RetryState {
  pub fn new(policy: RetryPolicy) -> Self {
    Self {
      policy,
      attempt: 1,
      backoff_secs: policy.initial_backoff_secs.min(policy.max_backoff_secs),
    }
  }

  /// The 1-based number of the attempt currently in flight.
  pub fn attempt(&self) -> u32 {
    self.attempt
  }

  pub fn max_attempts(&self) -> u32 {
    self.policy.max_attempts
  }

  /// Record a 429 for the current attempt and decide what comes next.
  pub fn on_rate_limited(&mut self, retry_after: Option<u64>) -> RetryDecision {
    if self.attempt >= self.policy.max_attempts {
      return RetryDecision::GiveUp {
        attempts: self.attempt,
      };
    }

    let computed = self.backoff_secs;
    self.backoff_secs = computed
      .saturating_mul(2)
      .min(self.policy.max_backoff_secs);

    let wait = retry_after
      .map(|hint| hint.min(self.policy.max_retry_after_secs))
      .unwrap_or(computed);

    self.attempt += 1;
    RetryDecision::Wait(Duration::from_secs(wait))
  }
}
