use comanda::{Config, Server, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_environment();

    tracing::info!("Comanda server starting...");

    let config = Config::from_env();
    let server = Server::new(config);

    if let Err(err) = server.run().await {
        tracing::error!("Server error: {}", err);
        return Err(err.into());
    }

    Ok(())
}
