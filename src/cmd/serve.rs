//! HTTP API server command — `prime-numbers serve`.

use anyhow::Result;
use std::path::Path;

use prime_numbers::inventory::Inventory;
use prime_numbers::inventory::server::{ServerConfig, start_server};

pub async fn cmd_serve(
    project_dir: &Path,
    port: Option<u16>,
    host: Option<String>,
    open: bool,
    dev: bool,
) -> Result<()> {
    let config = super::load_config(project_dir)?;
    let server_config = ServerConfig {
        host: host.unwrap_or_else(|| config.host().to_string()),
        port: port.unwrap_or(config.port()),
        dev_mode: dev,
    };
    let inventory = Inventory::open(&config)?;

    // Skip in dev mode (no browser inside containers)
    if open && !dev {
        let url = format!("http://localhost:{}/api/phones", server_config.port);
        tokio::spawn(async move {
            // Small delay to let the server start binding
            tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;
            if let Err(e) = open::that(&url) {
                eprintln!("Failed to open browser: {}", e);
            }
        });
    }

    start_server(inventory, server_config).await
}
