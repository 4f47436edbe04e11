use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Classified result of a single GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportOutcome {
  /// 200 with the raw response body
  Success(String),
  /// 429, with the server's wait hint in seconds when it sent a usable one
  RateLimited { retry_after: Option<u64> },
  /// 404
  NotFound,
  /// Any other status code
  Status(u16),
  /// The request never produced a response (connect error, timeout, ...)
  Failure(String),
}

/// A source of HTTP GET responses.
pub trait Transport: Send + Sync {
  fn get(&self, url: &Url) -> impl Future<Output = TransportOutcome> + Send;
}

impl<T: Transport> Transport for Arc<T> {
  fn get(&self, url: &Url) -> impl Future<Output = TransportOutcome> + Send {
    (**self).get(url)
  }
}

/// reqwest-backed transport with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
  client: reqwest::Client,
}

impl HttpTransport {
  pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
    let client = reqwest::Client::builder()
      .timeout(timeout)
      .user_agent(concat!("rwlive/", env!("CARGO_PKG_VERSION")))
      .build()?;

    Ok(Self { client })
  }
}

impl Transport for HttpTransport {
  async fn get(&self, url: &Url) -> TransportOutcome {
    let response = match self.client.get(url.clone()).send().await {
      Ok(response) => response,
      Err(e) => return TransportOutcome::Failure(e.to_string()),
    };

    match response.status() {
      StatusCode::OK => match response.text().await {
        Ok(body) => TransportOutcome::Success(body),
        Err(e) => TransportOutcome::Failure(format!("failed to read body: {}", e)),
      },
      StatusCode::TOO_MANY_REQUESTS => TransportOutcome::RateLimited {
        retry_after: parse_retry_after(response.headers()),
      },
      StatusCode::NOT_FOUND => TransportOutcome::NotFound,
      other => TransportOutcome::Status(other.as_u16()),
    }
  }
}

/// Read a `Retry-After` header given in whole seconds.
///
/// HTTP-date values and anything that is not a plain non-negative integer
/// are ignored, leaving the computed backoff in charge.
fn parse_retry_after(headers: &HeaderMap) -> Option<u64> {
  let value = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
  if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  value.parse().ok()
}

#[cfg(test)]
mod tests {
  use super::*;
  use reqwest::header::HeaderValue;

  fn headers_with(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(RETRY_AFTER, HeaderValue::from_str(value).unwrap());
    headers
  }

  #[test]
  fn test_retry_after_seconds() {
    assert_eq!(parse_retry_after(&headers_with("3")), Some(3));
    assert_eq!(parse_retry_after(&headers_with(" 120 ")), Some(120));
    assert_eq!(parse_retry_after(&headers_with("0")), Some(0));
  }

  #[test]
  fn test_retry_after_rejects_non_integers() {
    assert_eq!(parse_retry_after(&headers_with("-1")), None);
    assert_eq!(parse_retry_after(&headers_with("1.5")), None);
    assert_eq!(
      parse_retry_after(&headers_with("Wed, 21 Oct 2015 07:28:00 GMT")),
      None
    );
    assert_eq!(parse_retry_after(&headers_with("")), None);
  }

  #[test]
  fn test_retry_after_missing() {
    assert_eq!(parse_retry_after(&HeaderMap::new()), None);
  }

  #[test]
  fn test_retry_after_overflow() {
    assert_eq!(
      parse_retry_after(&headers_with("99999999999999999999999")),
      None
    );
  }

  #[tokio::test]
  async fn test_unreachable_host_is_failure() {
    let transport = HttpTransport::new(Duration::from_millis(500)).unwrap();
    // Port 9 on localhost: nothing listens, connection is refused
    let url = Url::parse("http://127.0.0.1:9/v2/groups").unwrap();

    let outcome = transport.get(&url).await;
    assert!(matches!(outcome, TransportOutcome::Failure(_)));
  }
}
