use anyhow::Context;
use juniper_relay_loaders_test::config::AppConfig;
use juniper_relay_loaders_test::db::Store;
use juniper_relay_loaders_test::server;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,juniper_relay_loaders=debug")),
        )
        .init();

    let config = AppConfig::from_env()?;
    let store = Arc::new(Store::seeded());

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!("GraphiQL available at http://{}/graphql", config.bind_addr);

    axum::serve(listener, server::app(store, config.pagination)).await?;
    Ok(())
}
