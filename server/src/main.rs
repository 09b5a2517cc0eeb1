// server/src/main.rs

// Entry point for the suvera command-line client.

use anyhow::Result;
use suvera_server::cli::start_cli;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    start_cli().await
}
