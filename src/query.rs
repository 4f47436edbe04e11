//! Background loading of view data.
//!
//! A `Query<T>` owns a loader closure. Calling [`Query::fetch`] spawns the
//! loader on the tokio runtime; the view then calls [`Query::poll`] on every
//! tick to pick up the result without blocking the render loop.
//!
//! ```ignore
//! let client = ctx.client.clone();
//! let mut query = Query::new(move || {
//!   let client = client.clone();
//!   async move { client.groups().await }
//! });
//! query.fetch();
//!
//! // on tick
//! query.poll();
//!
//! // on render
//! match query.state() {
//!   QueryState::Loading => render_spinner(),
//!   QueryState::Success(groups) => render_table(groups),
//!   QueryState::Error(e) => render_error(e),
//!   QueryState::Idle => {}
//! }
//! ```

use color_eyre::Result;
use std::future::Future;
use std::pin::Pin;
use tokio::sync::oneshot;

#[derive(Debug, Clone)]
pub enum QueryState<T> {
  /// Not started yet
  Idle,
  Loading,
  Success(T),
  /// Failed; holds the full error chain as text
  Error(String),
}

type BoxFuture<T> = Pin<Box<dyn Future<Output = Result<T>> + Send>>;

type Loader<T> = Box<dyn Fn() -> BoxFuture<T> + Send + Sync>;

/// Data loaded off the UI thread, with its loading state.
pub struct Query<T> {
  state: QueryState<T>,
  loader: Loader<T>,
  receiver: Option<oneshot::Receiver<Result<T>>>,
}

impl<T: Send + 'static> Query<T> {
  pub fn new<F, Fut>(loader: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
  {
    Self {
      state: QueryState::Idle,
      loader: Box::new(move || Box::pin(loader())),
      receiver: None,
    }
  }

  pub fn state(&self) -> &QueryState<T> {
    &self.state
  }

  pub fn data(&self) -> Option<&T> {
    match &self.state {
      QueryState::Success(data) => Some(data),
      _ => None,
    }
  }

  pub fn is_loading(&self) -> bool {
    matches!(self.state, QueryState::Loading)
  }

  /// Start loading unless a load is already running.
  pub fn fetch(&mut self) {
    if !self.is_loading() {
      self.spawn();
    }
  }

  /// Start a fresh load. A result from an earlier load is discarded.
  pub fn refetch(&mut self) {
    self.receiver = None;
    self.spawn();
  }

  /// Pick up a finished load. Returns `true` if the state changed.
  pub fn poll(&mut self) -> bool {
    let Some(receiver) = self.receiver.as_mut() else {
      return false;
    };

    let state = match receiver.try_recv() {
      Ok(Ok(data)) => QueryState::Success(data),
      Ok(Err(e)) => QueryState::Error(format!("{:#}", e)),
      Err(oneshot::error::TryRecvError::Empty) => return false,
      Err(oneshot::error::TryRecvError::Closed) => {
        QueryState::Error("Loading was interrupted".to_string())
      }
    };

    self.state = state;
    self.receiver = None;
    true
  }

  fn spawn(&mut self) {
    let (tx, rx) = oneshot::channel();
    self.receiver = Some(rx);
    self.state = QueryState::Loading;

    let future = (self.loader)();
    tokio::spawn(async move {
      // The view may be gone by now
      let _ = tx.send(future.await);
    });
  }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Query<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Query")
      .field("state", &self.state)
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use color_eyre::eyre::eyre;
  use std::sync::atomic::{AtomicU32, Ordering};
  use std::sync::Arc;
  use std::time::Duration;

  async fn settle<T: Send + 'static>(query: &mut Query<T>) -> bool {
    for _ in 0..50 {
      if query.poll() {
        return true;
      }
      tokio::time::sleep(Duration::from_millis(5)).await;
    }
    false
  }

  #[tokio::test]
  async fn test_query_success() {
    let mut query = Query::new(|| async { Ok(vec![1, 2, 3]) });
    assert!(matches!(query.state(), QueryState::Idle));

    query.fetch();
    assert!(query.is_loading());

    assert!(settle(&mut query).await);
    assert_eq!(query.data(), Some(&vec![1, 2, 3]));
  }

  #[tokio::test]
  async fn test_query_error_keeps_chain() {
    let mut query: Query<i32> =
      Query::new(|| async { Err(eyre!("connection reset").wrap_err("Failed to fetch groups")) });

    query.fetch();
    assert!(settle(&mut query).await);
    match query.state() {
      QueryState::Error(e) => assert_eq!(e, "Failed to fetch groups: connection reset"),
      other => panic!("expected an error, got {:?}", other),
    }
  }

  #[tokio::test]
  async fn test_fetch_while_loading_is_noop() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);
    let mut query = Query::new(move || {
      counter.fetch_add(1, Ordering::SeqCst);
      async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok(42)
      }
    });

    query.fetch();
    query.fetch();
    assert!(query.is_loading());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_refetch_discards_pending() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);
    let mut query = Query::new(move || {
      let n = counter.fetch_add(1, Ordering::SeqCst);
      async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(n)
      }
    });

    query.fetch();
    query.refetch();
    assert!(settle(&mut query).await);
    assert_eq!(query.data(), Some(&1));
  }
}
