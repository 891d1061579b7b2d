//! FiatBridge CLI
//!
//! One-shot conversion against the live venue, printed as JSON.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fiatbridge_common::{FiatCode, FiatSet};
use fiatbridge_router::buda::DEFAULT_BASE_URL;
use fiatbridge_router::{BudaClient, BudaConfig, ConversionRouter, RouterConfig};

/// FiatBridge conversion CLI
#[derive(Parser, Debug)]
#[command(name = "fiatbridge")]
#[command(about = "Convert between fiat currencies through the best crypto intermediary")]
struct Args {
    /// Source fiat currency
    #[arg(short, long, value_parser = FiatCode::parse)]
    from: FiatCode,

    /// Target fiat currency
    #[arg(short, long, value_parser = FiatCode::parse)]
    to: FiatCode,

    /// Amount to convert
    #[arg(short, long)]
    amount: Decimal,

    /// Print every evaluated candidate instead of only the best one
    #[arg(long)]
    report: bool,

    /// Comma-separated fiat currencies used to discover intermediaries
    #[arg(long, default_value = "CLP,COP,PEN")]
    fiats: FiatSet,

    /// Venue API root
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Candidates priced at the same time
    #[arg(long, default_value = "8")]
    concurrency: usize,

    /// Per-request venue timeout in seconds
    #[arg(long, default_value = "10")]
    timeout: u64,
}

impl Args {
    fn router_config(&self) -> RouterConfig {
        RouterConfig {
            fiats: self.fiats.clone(),
            price_concurrency: self.concurrency.max(1),
            ..RouterConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays machine readable
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    if args.amount.is_sign_negative() && !args.amount.is_zero() {
        anyhow::bail!("Amount must be greater than or equal to 0");
    }

    let client = BudaClient::new(BudaConfig {
        base_url: args.api_url.clone(),
        timeout: Duration::from_secs(args.timeout),
        ..BudaConfig::default()
    })
    .context("failed to build venue HTTP client")?;

    let router = ConversionRouter::new(Arc::new(client), args.router_config());

    info!(from = %args.from, to = %args.to, amount = %args.amount, "Converting");

    let report = router.evaluate(&args.from, &args.to, args.amount).await;

    if args.report {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    match report.best {
        Some(best) => {
            if !args.report {
                println!("{}", serde_json::to_string_pretty(&best)?);
            }
            Ok(())
        }
        None => Err(anyhow::anyhow!("No conversion path found")),
    }
}
