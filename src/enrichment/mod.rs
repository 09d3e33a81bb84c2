//! Lookups against the internet-scanning provider

pub mod censys;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// The three lookups the connector can run for an observable.
///
/// `Ok(Some(_))` carries the extracted enrichment mapping, `Ok(None)` means
/// the provider has no data for the key, and `Err` means the lookup itself
/// failed. The dispatcher treats the last two the same way: skip the
/// observable and keep serving.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LookupProvider: Send + Sync {
    /// Host view for an IP address
    async fn host_view(&self, ip: &str) -> Result<Option<Value>>;

    /// Certificates whose names contain the domain
    async fn certificate_search(&self, domain: &str) -> Result<Option<Value>>;

    /// Single certificate by SHA-256 fingerprint
    async fn certificate_view(&self, fingerprint: &str) -> Result<Option<Value>>;
}
