use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Source of wall-clock time and of the delay between retries.
pub trait Clock: Send + Sync {
  /// Current time in seconds since the Unix epoch.
  fn now(&self) -> i64;

  /// Wait for `duration` on the calling task.
  fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// The real clock: chrono for timestamps, tokio for sleeping.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> i64 {
    Utc::now().timestamp()
  }

  async fn sleep(&self, duration: Duration) {
    tokio::time::sleep(duration).await;
  }
}

impl<C: Clock> Clock for Arc<C> {
  fn now(&self) -> i64 {
    (**self).now()
  }

  fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
    (**self).sleep(duration)
  }
}
