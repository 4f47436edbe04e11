//! Cache-aware fetch client for the remote API.
//!
//! Every network call goes through [`FetchClient`], which:
//! - Serves fresh entries straight from the [`CacheStore`](crate::cache::CacheStore)
//! - Issues a single GET otherwise, classified by its [`Transport`]
//! - Retries rate-limited (429) responses with bounded exponential backoff
//! - Writes successful payloads back to the cache

mod backoff;
mod client;
mod clock;
mod error;
mod transport;

pub use backoff::RetryPolicy;
pub use client::{FetchClient, FetchOutcome, DEFAULT_TTL_SECS};
pub use clock::{Clock, SystemClock};
pub use transport::{HttpTransport, Transport};

#[cfg(test)]
pub(crate) use transport::TransportOutcome;

#[cfg(test)]
pub(crate) mod testing;
