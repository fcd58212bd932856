//! SalesDesk Gateway
//!
//! Run with: cargo run --bin salesdesk
//!
//! # Configuration
//!
//! Read from `--config`, or the first of
//! `~/.config/salesdesk/config.toml`, `/etc/salesdesk/config.toml`,
//! `./config.toml`. Environment variables override the file:
//! - `SALESDESK_HOST`, `SALESDESK_PORT`
//! - `SALESDESK_SALES_API_URL`, `SALESDESK_ORDERS_API_URL`
//! - `SALESDESK_LOG_LEVEL`, `SALESDESK_LOG_FORMAT`
//! - `RUST_LOG` takes precedence over the configured level

use clap::Parser;
use salesdesk::config::{generate_default_config, Config, LoggingConfig};
use salesdesk::intercept::HttpTransport;
use salesdesk::{serve, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "salesdesk")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Gateway and live notification relay for the SalesDesk dashboard")]
struct Args {
    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print a default config file and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.print_config {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let config = Config::resolve(args.config.as_deref())?;
    init_tracing(&config.logging);

    tracing::info!("Starting SalesDesk gateway v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        sales_api = %config.upstream.sales_base_url,
        orders_api = ?config.upstream.orders_base_url,
        "Remote sales API"
    );

    let transport = HttpTransport::new(config.upstream.timeout())?;
    let state = AppState::new(&config, Arc::new(transport));

    serve(state).await?;

    tracing::info!("SalesDesk gateway stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("salesdesk={},tower_http=debug", logging.level))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
