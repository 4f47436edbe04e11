use color_eyre::{eyre::eyre, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cache::CacheStore;
use crate::config::Config;
use crate::dashboard::{self, DashboardTarget, MonthlyCounts};
use crate::fetch::{Clock, FetchClient, FetchOutcome, HttpTransport, SystemClock, Transport};

use super::endpoints::Endpoint;
use super::types::{Group, GroupDetails, Victim};

/// One month's victims, keyed by month number (1-12).
pub type MonthBatch = (u32, Vec<Victim>);

/// Typed access to the ransomware.live API, backed by the caching fetch client.
pub struct LiveClient<T: Transport = HttpTransport, C: Clock = SystemClock> {
  fetch: Arc<FetchClient<dyn CacheStore, T, C>>,
}

impl<T: Transport, C: Clock> Clone for LiveClient<T, C> {
  fn clone(&self) -> Self {
    Self {
      fetch: Arc::clone(&self.fetch),
    }
  }
}

impl LiveClient {
  /// Build a client talking to the configured API over HTTP.
  pub fn from_config(config: &Config, store: Arc<dyn CacheStore>) -> Result<Self> {
    let transport = HttpTransport::new(config.timeout())
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    let fetch = FetchClient::new(config.base_url()?, store, transport, SystemClock)
      .with_ttl(config.cache.ttl_secs)
      .with_retry_policy(config.retry_policy());

    Ok(Self::new(fetch))
  }
}

impl<T: Transport, C: Clock> LiveClient<T, C> {
  pub fn new(fetch: FetchClient<dyn CacheStore, T, C>) -> Self {
    Self {
      fetch: Arc::new(fetch),
    }
  }

  /// Host part of the API base URL, for the header.
  pub fn api_host(&self) -> String {
    self
      .fetch
      .base_url()
      .host_str()
      .unwrap_or_default()
      .to_string()
  }

  /// Fetch `endpoint` and decode its records. A 404 yields an empty list.
  async fn records<R: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<Vec<R>> {
    match self.fetch.fetch_segments(&endpoint.segments()).await {
      FetchOutcome::Cached(payload) | FetchOutcome::Fetched(payload) => parse_records(payload)
        .map_err(|e| eyre!("Unexpected response for {}: {}", endpoint.description(), e)),
      FetchOutcome::NotFound => Ok(Vec::new()),
      FetchOutcome::Failed(e) => Err(eyre!("Failed to fetch {}: {}", endpoint.description(), e)),
    }
  }

  pub async fn search_victims(&self, keyword: &str) -> Result<Vec<Victim>> {
    self
      .records(&Endpoint::SearchVictims {
        keyword: keyword.to_string(),
      })
      .await
  }

  pub async fn victims_by_month(&self, year: i32, month: u32) -> Result<Vec<Victim>> {
    self.records(&Endpoint::VictimsByMonth { year, month }).await
  }

  /// Victims for one month, or for the whole year when `month` is `None`.
  pub async fn victims_by_date(&self, year: i32, month: Option<u32>) -> Result<Vec<Victim>> {
    match month {
      Some(month) => self.victims_by_month(year, month).await,
      None => Ok(
        self
          .year_batches(year)
          .await?
          .into_iter()
          .flat_map(|(_, victims)| victims)
          .collect(),
      ),
    }
  }

  pub async fn victims_by_country(&self, country: &str) -> Result<Vec<Victim>> {
    self
      .records(&Endpoint::CountryVictims {
        country: country.to_string(),
      })
      .await
  }

  /// Victims published in the given period, restricted to one country.
  pub async fn victims_by_country_and_date(
    &self,
    country: &str,
    year: i32,
    month: Option<u32>,
  ) -> Result<Vec<Victim>> {
    let country = country.to_uppercase();
    let victims = self.victims_by_date(year, month).await?;
    Ok(
      victims
        .into_iter()
        .filter(|v| v.country().to_uppercase() == country)
        .collect(),
    )
  }

  pub async fn group_victims(&self, group: &str) -> Result<Vec<Victim>> {
    self
      .records(&Endpoint::GroupVictims {
        group: group.to_string(),
      })
      .await
  }

  pub async fn groups(&self) -> Result<Vec<Group>> {
    self.records(&Endpoint::Groups).await
  }

  /// Details for one group; `None` if the API does not know it.
  pub async fn group(&self, name: &str) -> Result<Option<GroupDetails>> {
    let endpoint = Endpoint::Group {
      name: name.to_string(),
    };
    match self.fetch.fetch_segments(&endpoint.segments()).await {
      FetchOutcome::Cached(payload) | FetchOutcome::Fetched(payload) => {
        Ok(GroupDetails::from_value(payload))
      }
      FetchOutcome::NotFound => Ok(None),
      FetchOutcome::Failed(e) => Err(eyre!("Failed to fetch {}: {}", endpoint.description(), e)),
    }
  }

  /// Monthly incident counts for a country or a group over one year.
  pub async fn dashboard(&self, target: &DashboardTarget, year: i32) -> Result<MonthlyCounts> {
    match target {
      DashboardTarget::Country(country) => {
        let batches = self.year_batches(year).await?;
        Ok(dashboard::count_by_country(year, country, &batches))
      }
      DashboardTarget::Group(group) => {
        let victims = self.group_victims(group).await?;
        Ok(dashboard::count_by_group(year, group, &victims))
      }
    }
  }

  /// Payload of an arbitrary API path; `None` when empty or unavailable.
  pub async fn raw(&self, path: &str) -> Option<Value> {
    self.fetch.fetch(path).await
  }

  /// Fetch all twelve months of `year`, one request at a time.
  ///
  /// Months that fail are skipped; the call only fails if every month did.
  async fn year_batches(&self, year: i32) -> Result<Vec<MonthBatch>> {
    let mut batches = Vec::with_capacity(12);
    let mut last_error = None;
    for month in 1..=12u32 {
      match self.victims_by_month(year, month).await {
        Ok(victims) => {
          debug!(year, month, count = victims.len(), "month loaded");
          batches.push((month, victims));
        }
        Err(e) => {
          warn!(year, month, error = %e, "skipping month");
          last_error = Some(e);
        }
      }
    }

    match last_error {
      Some(e) if batches.is_empty() => {
        Err(e.wrap_err(format!("No month of {} could be loaded", year)))
      }
      _ => Ok(batches),
    }
  }
}

/// Decode a list payload. Non-object items are skipped; a lone object is
/// treated as a one-element list and `null` as an empty one.
fn parse_records<R: DeserializeOwned>(payload: Value) -> Result<Vec<R>, serde_json::Error> {
  let items = match payload {
    Value::Array(items) => items,
    Value::Null => Vec::new(),
    other => vec![other],
  };
  items
    .into_iter()
    .filter(|item| item.is_object())
    .map(serde_json::from_value)
    .collect()
}
