//! Binary crate for the `weather-web` server.
//!
//! Serves the HTML page at `/` and the JSON endpoint at `/api/weather`.

use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use weather_core::Config;

mod page;
mod routes;

#[derive(Debug, Parser)]
#[command(name = "weather-web", version, about = "Weather web page and JSON API")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8000")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let args = Args::parse();
    let config = Config::load().context("Failed to load configuration")?;

    match config.preferred_provider() {
        Some(id) => info!(provider = %id, "live weather enabled"),
        None => info!("no API key configured, serving mock weather"),
    }

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;
    info!(addr = %args.bind, "listening");

    axum::serve(listener, routes::router(config))
        .await
        .context("Server error")?;

    Ok(())
}
