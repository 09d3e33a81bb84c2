//! Connector configuration
//!
//! Required values come from the environment (or a `.env` file loaded at
//! startup); a missing required value aborts the process before any message
//! is accepted. No reachability or format validation beyond parsing.

use clap::Parser;

use crate::models::{EntityType, Tlp};

/// Censys enrichment connector for OpenCTI
#[derive(Parser, Debug)]
#[command(name = "censys-connector")]
#[command(about = "Enrich OpenCTI observables with Censys scan data")]
pub struct Config {
    /// Censys API id
    #[arg(long, env = "CENSYS_API_ID")]
    pub censys_api_id: String,

    /// Censys API secret
    #[arg(long, env = "CENSYS_API_SECRET")]
    pub censys_api_secret: String,

    /// OpenCTI platform URL
    #[arg(long, env = "OPENCTI_URL")]
    pub opencti_url: String,

    /// OpenCTI API token
    #[arg(long, env = "OPENCTI_TOKEN")]
    pub opencti_token: String,

    /// Connector identifier registered with the platform
    #[arg(long, env = "CONNECTOR_ID")]
    pub connector_id: String,

    /// Observable types this connector registers for
    #[arg(
        long,
        env = "CONNECTOR_SCOPE",
        value_delimiter = ',',
        default_value = "IPv4-Addr,Domain-Name,X509-Certificate"
    )]
    pub connector_scope: Vec<EntityType>,

    /// Highest TLP marking this connector will process
    #[arg(long, env = "MAX_TLP", default_value = "TLP:AMBER")]
    pub max_tlp: Tlp,

    /// Server host
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Server port
    #[arg(long, env = "PORT", default_value = "8080")]
    pub port: u16,
}
