use scanner_forward::config::ConfigLoader;
use scanner_forward::logging::setup_logging;
use scanner_forward::server::IngestServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|e| anyhow::anyhow!("Failed to install default crypto provider: {:?}", e))?;

    setup_logging()?;

    let config = ConfigLoader::load_config()?;
    let server = IngestServer::bind(&config).await?;
    server.run().await
}
