//! Threat-intelligence platform interface

pub mod opencti;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Observable;

/// Errors from the platform API
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("platform request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("platform API error: {status} - {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("platform query failed: {0}")]
    Query(String),

    #[error("malformed platform response: {0}")]
    Malformed(String),
}

/// Operations the connector needs from the platform
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Platform: Send + Sync {
    /// Read a full observable by id. `Ok(None)` when the platform does not
    /// know the id.
    async fn observable(&self, id: &str) -> Result<Option<Observable>, PlatformError>;

    /// Submit a serialized STIX bundle for ingestion
    async fn push_bundle(&self, bundle: &str) -> Result<(), PlatformError>;
}
