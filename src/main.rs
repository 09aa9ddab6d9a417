use anyhow::Result;
use clap::Parser;
use infini_portfolio::config::AppConfig;
use infini_portfolio::feed::build_feed;
use infini_portfolio::store_backends::build_store;
use infini_portfolio::web_server;
use log::info;
use std::sync::Arc;

/// Portfolio site: apps, blog, photo gallery and admin API.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Directory holding default.toml and optional overrides.
    #[arg(long, default_value = "config")]
    config_dir: String,

    /// Overrides `web_port` from the configuration.
    #[arg(long)]
    port: Option<u16>,

    /// Overrides `log_level` from the configuration.
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(&cli.config_dir)?;
    if let Some(port) = cli.port {
        config.web_port = port;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    env_logger::Builder::new()
        .filter_level(config.log_level.parse().unwrap_or(log::LevelFilter::Info))
        .init();

    info!("Starting infini-portfolio");

    let store = build_store(&config)?;
    let feed = build_feed(&config, store.clone());

    if let Err(e) = web_server::start_web_server(Arc::new(config), store, feed).await {
        log::error!("Web server error: {}", e);
    }

    info!("infini-portfolio finished");

    Ok(())
}
