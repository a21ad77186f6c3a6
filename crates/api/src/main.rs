//! Walletcheck API server binary.

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use walletcheck_api::config::Config;
use walletcheck_api::server::build_app;

#[derive(Parser, Debug)]
#[command(name = "walletcheck-api", about = "Wallet background-check API server")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "walletcheck.toml")]
    config: String,

    /// Enable debug logging regardless of the configured level.
    #[arg(long)]
    debug: bool,
}

fn init_logging(config: &Config, debug: bool) {
    let level = if debug { "debug" } else { &config.logging.level };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},hyper=warn,reqwest=warn")));

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_file(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config))?;
    init_logging(&config, cli.debug);

    let bind_addr = config.server.bind_addr.clone();
    info!(
        "starting walletcheck-api on {} ({}, chain id {})",
        bind_addr, config.network.chain_name, config.network.chain_id
    );

    let app = build_app(config)?;
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
