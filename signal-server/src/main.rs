//! Signal analysis server
//!
//! HTTP front for the chart-screenshot analysis pipeline: accepts a base64
//! screenshot, runs vision analysis, market data reconciliation and decision
//! synthesis, and returns the combined result.

mod api;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use warp::Filter;

use signal_core::{AnalysisMode, BinanceMarketData};

const DEFAULT_PORT: u16 = 8080;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let port = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let mode = AnalysisMode::from_env();

    // The market data client carries no credentials and is shared across
    // requests; AI credentials are resolved per request inside the handler.
    let market = Arc::new(BinanceMarketData::new());

    let routes = api::routes(market, mode).recover(api::handle_rejection);

    info!(port, ?mode, "starting signal-server");
    warp::serve(routes).run(([0, 0, 0, 0], port)).await;

    Ok(())
}
