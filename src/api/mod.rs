//! ransomware.live API surface: endpoints, record types and the typed client.

mod client;
mod endpoints;
pub mod types;

pub use client::LiveClient;
pub use types::{Group, GroupDetails, Victim};
