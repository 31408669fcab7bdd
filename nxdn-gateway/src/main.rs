use nxdn_gateway::config::{GatewayConfig, DEFAULT_CONFIG_PATH};
use nxdn_gateway::logging::init_logging;
use nxdn_gateway::query;
use nxdn_lookup::IdLookup;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = GatewayConfig::from_file(&config_path)?;

    // Initialize logging
    let _logging_guard = init_logging(
        &config.log_dir,
        &config.log_prefix,
        &config.log_level,
        config.log_retention_days,
    )?;

    tracing::info!("NXDN Gateway starting...");

    let mut lookup = IdLookup::from_config(&config.lookup)?;
    tracing::info!("Using NXDN Id lookup file {}", lookup.source().display());
    if !lookup.initialize().await {
        tracing::warn!("NXDN Id lookup table is empty, identifiers will be shown numerically");
    }

    let reader = lookup.lookup();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupt received, shutting down");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if let Some(reply) = query::answer(&reader, &line) {
                    stdout.write_all(reply.as_bytes()).await?;
                    stdout.write_all(b"\n").await?;
                    stdout.flush().await?;
                }
            }
        }
    }

    lookup.stop().await;
    tracing::info!("NXDN Gateway stopped");

    Ok(())
}
