//! Censys Search API client

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::enrichment::LookupProvider;

const CENSYS_API_URL: &str = "https://search.censys.io/api";

/// Fixed result cap for certificate searches
const CERT_SEARCH_PER_PAGE: usize = 5;

#[derive(Debug, Deserialize)]
struct CensysResponse<T> {
    result: Option<T>,
}

#[derive(Debug, Default, Deserialize)]
struct HostResult {
    #[serde(default)]
    services: Vec<Value>,
    #[serde(default)]
    location: Map<String, Value>,
    #[serde(default)]
    autonomous_system: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
struct CertSearchResult {
    #[serde(default)]
    hits: Vec<CertHit>,
}

#[derive(Debug, Deserialize)]
struct CertHit {
    #[serde(default)]
    parsed: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
struct CertViewResult {
    #[serde(default)]
    parsed: CertParsed,
}

#[derive(Debug, Default, Deserialize)]
struct CertParsed {
    #[serde(default)]
    subject: Map<String, Value>,
    #[serde(default)]
    issuer: Map<String, Value>,
    #[serde(default)]
    validity: Map<String, Value>,
}

/// Client for the Censys Search API
pub struct CensysClient {
    client: Client,
    api_id: String,
    api_secret: String,
    base_url: String,
}

impl CensysClient {
    /// Create a client against the production API
    pub fn new(api_id: &str, api_secret: &str) -> Result<Self> {
        Self::with_base_url(api_id, api_secret, CENSYS_API_URL)
    }

    /// Create a client against a specific API base URL
    pub fn with_base_url(api_id: &str, api_secret: &str, base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_id: api_id.to_string(),
            api_secret: api_secret.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch<T>(&self, url: &str, query: &[(&str, String)]) -> Result<Option<T>>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        let response = self
            .client
            .get(url)
            .basic_auth(&self.api_id, Some(&self.api_secret))
            .query(query)
            .send()
            .await
            .context("Failed to send request to Censys")?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Censys API error: {} - {}", status, body);
        }

        let body: CensysResponse<T> = response
            .json()
            .await
            .context("Failed to parse Censys response")?;

        Ok(Some(body.result.unwrap_or_default()))
    }
}

#[async_trait]
impl LookupProvider for CensysClient {
    async fn host_view(&self, ip: &str) -> Result<Option<Value>> {
        let url = format!("{}/v2/hosts/{}", self.base_url, ip);
        let Some(host) = self.fetch::<HostResult>(&url, &[]).await? else {
            return Ok(None);
        };

        Ok(Some(json!({
            "services": host.services,
            "location": host.location,
            "autonomous_system": host.autonomous_system,
        })))
    }

    async fn certificate_search(&self, domain: &str) -> Result<Option<Value>> {
        let url = format!("{}/v2/certificates/search", self.base_url);
        let query = [
            ("q", format!("names: {}", domain)),
            ("per_page", CERT_SEARCH_PER_PAGE.to_string()),
        ];

        let Some(search) = self.fetch::<CertSearchResult>(&url, &query).await? else {
            return Ok(None);
        };

        let certificates: Vec<Map<String, Value>> =
            search.hits.into_iter().map(|hit| hit.parsed).collect();

        Ok(Some(json!({ "certificates": certificates })))
    }

    async fn certificate_view(&self, fingerprint: &str) -> Result<Option<Value>> {
        let url = format!("{}/v2/certificates/{}", self.base_url, fingerprint);
        let Some(cert) = self.fetch::<CertViewResult>(&url, &[]).await? else {
            return Ok(None);
        };

        Ok(Some(json!({
            "subject": cert.parsed.subject,
            "issuer": cert.parsed.issuer,
            "validity": cert.parsed.validity,
        })))
    }
}
