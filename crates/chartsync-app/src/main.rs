//! chartsync - live chart/order synchronization client entry point.

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Live chart/order synchronization client
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via CHARTSYNC_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    chartsync_app::init_logging();
    info!("Starting chartsync v{}", env!("CARGO_PKG_VERSION"));

    let config = chartsync_app::AppConfig::load(args.config.as_deref())?;
    info!(
        base_url = %config.base_url,
        charts = config.charts.len(),
        "Configuration loaded"
    );

    let app = chartsync_app::Application::new(config);
    app.run().await?;

    Ok(())
}
