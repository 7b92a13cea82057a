use gambit::prelude::*;

// ---------------------------------------------------------------------------
// Server bootstrap
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    gambit::init_tracing();

    let config = ServerConfig::from_env()?;
    tracing::info!(addr = %config.bind_addr, "starting chess server");

    let server = GambitServer::builder().config(config).build().await?;

    server.run().await?;
    Ok(())
}
