// rest_api/src/main.rs
// Standalone symptom analyzer. `suvera analyzer start` runs the same service
// from the main CLI.

use anyhow::Result;
use log::info;
use tokio::sync::oneshot;

use lib::config::load_config;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = load_config(None)?;
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received, shutting down analyzer");
            let _ = shutdown_tx.send(());
        }
    });

    rest_api::start_server(&config.analyzer, shutdown_rx).await
}
