//! FiatBridge Server
//!
//! HTTP front end over the conversion router. Accepts a fiat amount and
//! answers with the best conversion found through a crypto intermediary.

pub mod api;
pub mod config;
pub mod dto;
pub mod error;
pub mod metrics;
pub mod state;

use std::sync::Arc;

use anyhow::Context;
use fiatbridge_router::{BudaClient, BudaConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use api::{app_router, ApiDoc};
pub use config::ServerConfig;
pub use state::AppState;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when it is set.
pub fn init_tracing(config: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Build the shared state over the configured venue.
pub fn build_state(config: &ServerConfig) -> anyhow::Result<Arc<AppState>> {
    let client = BudaClient::new(BudaConfig {
        base_url: config.market_api_url.clone(),
        timeout: config.upstream_timeout,
        ..BudaConfig::default()
    })
    .context("failed to build venue HTTP client")?;

    Ok(Arc::new(AppState::new(
        Arc::new(client),
        config.router.clone(),
    )))
}
