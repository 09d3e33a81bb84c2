//! Per-observable dispatch
//!
//! One work item at a time: read the observable, enforce the TLP ceiling,
//! run the type-specific lookup, and push the resulting bundle. Every
//! per-observable failure is soft; only platform transport errors propagate
//! to the handler boundary.

use std::sync::Arc;

use anyhow::Result;
use url::Url;

use crate::config::Config;
use crate::enrichment::LookupProvider;
use crate::models::{check_max_tlp, EntityType, Observable};
use crate::platform::Platform;
use crate::stix;

const HOSTS_URL: &str = "https://search.censys.io/hosts";
const CERTIFICATES_URL: &str = "https://search.censys.io/certificates";

pub struct Connector {
    config: Arc<Config>,
    lookup: Arc<dyn LookupProvider>,
    platform: Arc<dyn Platform>,
}

impl Connector {
    pub fn new(
        config: Arc<Config>,
        lookup: Arc<dyn LookupProvider>,
        platform: Arc<dyn Platform>,
    ) -> Self {
        Self {
            config,
            lookup,
            platform,
        }
    }

    /// Handle one inbound work item.
    ///
    /// The returned string, when present, is a human-readable status for the
    /// caller. `Ok(None)` covers every skip: unknown observable, TLP-blocked,
    /// unsupported type, missing hash, and lookups with no data.
    pub async fn process_message(&self, entity_id: &str) -> Result<Option<String>> {
        let Some(observable) = self.platform.observable(entity_id).await? else {
            tracing::error!(entity_id, "Observable not found");
            return Ok(None);
        };

        if !check_max_tlp(observable.markings(), self.config.max_tlp) {
            tracing::warn!(
                observable = %observable.value,
                max_tlp = %self.config.max_tlp,
                "Skipping due to TLP restrictions"
            );
            return Ok(None);
        }

        self.enrich_observable(&observable).await
    }

    async fn enrich_observable(&self, observable: &Observable) -> Result<Option<String>> {
        let value = &observable.value;

        let (result, url) = match observable.entity_type {
            EntityType::Ipv4Addr => (
                self.lookup.host_view(value).await,
                format!("{}/{}", HOSTS_URL, value),
            ),
            EntityType::DomainName => (
                self.lookup.certificate_search(value).await,
                certificate_search_url(value),
            ),
            EntityType::X509Certificate => {
                let Some(sha256) = observable.sha256() else {
                    tracing::debug!(observable = %value, "Certificate has no SHA-256 hash");
                    return Ok(None);
                };
                (
                    self.lookup.certificate_view(sha256).await,
                    format!("{}/{}", CERTIFICATES_URL, sha256),
                )
            }
            EntityType::Other => return Ok(None),
        };

        let enrichment = match result {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::debug!(observable = %value, "No enrichment data returned");
                return Ok(None);
            }
            Err(e) => {
                tracing::warn!(observable = %value, error = %e, "Enrichment failed");
                return Ok(None);
            }
        };

        let bundle = stix::create_bundle(&observable.id, &enrichment, &url);
        self.platform
            .push_bundle(&serde_json::to_string(&bundle)?)
            .await?;

        Ok(Some(format!("Enriched {}", value)))
    }
}

fn certificate_search_url(domain: &str) -> String {
    Url::parse_with_params(CERTIFICATES_URL, &[("q", domain)])
        .map(String::from)
        .unwrap_or_else(|_| format!("{}?q={}", CERTIFICATES_URL, domain))
}
