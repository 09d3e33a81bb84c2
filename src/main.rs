//! Censys enrichment connector for OpenCTI
//!
//! Listens for observable enrichment work items, queries the Censys Search
//! API, and pushes the results back to the platform as STIX bundles.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod connector;
mod enrichment;
mod models;
mod platform;
mod stix;

use api::{create_router, AppState};
use config::Config;
use connector::Connector;
use enrichment::censys::CensysClient;
use platform::opencti::OpenCtiClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "censys_connector=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Missing required values abort here with a non-zero exit
    let config = Arc::new(Config::parse());

    tracing::info!(
        connector_id = %config.connector_id,
        scope = ?config.connector_scope,
        max_tlp = %config.max_tlp,
        "Starting Censys connector"
    );

    let censys = CensysClient::new(&config.censys_api_id, &config.censys_api_secret)
        .context("Failed to initialize Censys API client")?;

    let opencti = OpenCtiClient::new(
        &config.opencti_url,
        &config.opencti_token,
        &config.connector_id,
    )
    .context("Failed to initialize OpenCTI client")?;

    let connector = Connector::new(config.clone(), Arc::new(censys), Arc::new(opencti));

    let state = Arc::new(AppState {
        config: config.clone(),
        connector: Mutex::new(connector),
    });

    let app = create_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!("Listening on http://{}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
