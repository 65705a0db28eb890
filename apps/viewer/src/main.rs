use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use client_core::{HttpDocsGateway, OverviewController, PassthroughEscaper};
use tracing::info;

/// Terminal front-end for the docs API overview.
#[derive(Parser, Debug)]
struct Args {
    /// Base URL of the docs API server.
    #[arg(long, default_value = "http://localhost:8776")]
    server_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    info!(server_url = %args.server_url, "fetching docs overview");
    let gateway = Arc::new(HttpDocsGateway::new(args.server_url));
    let mut controller = OverviewController::new(gateway, PassthroughEscaper);
    controller.activate().await;

    for line in controller.render_lines() {
        println!("{line}");
    }
    if controller.scope.api_data.is_none() {
        println!("(no API data)");
    }

    Ok(())
}
