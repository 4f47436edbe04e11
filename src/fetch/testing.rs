//! Deterministic transports and clocks for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

use super::clock::Clock;
use super::transport::{Transport, TransportOutcome};

/// Transport that replays scripted outcomes in order and records every request.
pub struct StubTransport {
  responses: Mutex<VecDeque<TransportOutcome>>,
  requests: Mutex<Vec<String>>,
}

impl StubTransport {
  pub fn scripted(responses: Vec<TransportOutcome>) -> Arc<Self> {
    Arc::new(Self {
      responses: Mutex::new(responses.into()),
      requests: Mutex::new(Vec::new()),
    })
  }

  pub fn calls(&self) -> usize {
    self.requests.lock().unwrap().len()
  }
}

impl Transport for StubTransport {
  async fn get(&self, url: &Url) -> TransportOutcome {
    self.requests.lock().unwrap().push(url.to_string());
    self
      .responses
      .lock()
      .unwrap()
      .pop_front()
      .expect("unexpected request: script exhausted")
  }
}

/// Transport that answers by URL path; unknown paths get a 404.
#[derive(Default)]
pub struct RouteTransport {
  routes: HashMap<String, TransportOutcome>,
  requests: Mutex<Vec<String>>,
}

impl RouteTransport {
  pub fn new() -> Self {
    Self::default()
  }

  /// Answer `path` (e.g. "/v2/groups") with a 200 and `body`.
  pub fn json(mut self, path: &str, body: &str) -> Self {
    self
      .routes
      .insert(path.to_string(), TransportOutcome::Success(body.to_string()));
    self
  }

  pub fn outcome(mut self, path: &str, outcome: TransportOutcome) -> Self {
    self.routes.insert(path.to_string(), outcome);
    self
  }

  pub fn requested_paths(&self) -> Vec<String> {
    self.requests.lock().unwrap().clone()
  }
}

impl Transport for RouteTransport {
  async fn get(&self, url: &Url) -> TransportOutcome {
    let path = url.path().to_string();
    self.requests.lock().unwrap().push(path.clone());
    self
      .routes
      .get(&path)
      .cloned()
      .unwrap_or(TransportOutcome::NotFound)
  }
}

/// Transport that fails the test if it is ever used.
pub struct NoNetwork;

impl Transport for NoNetwork {
  async fn get(&self, url: &Url) -> TransportOutcome {
    panic!("transport must not be called (requested {})", url);
  }
}

/// Clock that records sleeps and advances time by them instead of waiting.
pub struct ManualClock {
  now: AtomicI64,
  sleeps: Mutex<Vec<Duration>>,
}

impl ManualClock {
  pub fn at(now: i64) -> Arc<Self> {
    Arc::new(Self {
      now: AtomicI64::new(now),
      sleeps: Mutex::new(Vec::new()),
    })
  }

  pub fn set(&self, now: i64) {
    self.now.store(now, Ordering::SeqCst);
  }

  pub fn sleeps_secs(&self) -> Vec<u64> {
    self
      .sleeps
      .lock()
      .unwrap()
      .iter()
      .map(|d| d.as_secs())
      .collect()
  }
}

impl Clock for ManualClock {
  fn now(&self) -> i64 {
    self.now.load(Ordering::SeqCst)
  }

  async fn sleep(&self, duration: Duration) {
    self.sleeps.lock().unwrap().push(duration);
    self
      .now
      .fetch_add(duration.as_secs() as i64, Ordering::SeqCst);
  }
}
