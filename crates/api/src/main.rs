//! Housing Price API - Main Entry Point

use api::{init_logging, run_server, ApiSettings};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    info!("=== Housing Price API v{} ===", env!("CARGO_PKG_VERSION"));

    let settings = ApiSettings::load()?;
    run_server(&settings).await?;

    Ok(())
}
