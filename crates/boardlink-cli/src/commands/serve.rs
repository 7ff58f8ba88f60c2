use anyhow::Result;
use boardlink_core::ArduinoCli;
use boardlink_core::mcp::{BoardlinkMcpServer, CliBackend};
use std::sync::Arc;

pub async fn run() -> Result<()> {
    let cli = ArduinoCli::from_env()?;
    let backend = CliBackend::new(cli);
    tracing::info!("Priming board detection cache...");
    backend.prime().await;

    let server = BoardlinkMcpServer::with_backend(Arc::new(backend));
    server.run().await
}
