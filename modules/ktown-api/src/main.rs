use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ktown_api::{build_router, AppState};
use ktown_common::Config;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("ktown=info".parse()?))
        .init();

    let config = Config::from_env()?;
    let addr = config.bind_addr();
    info!(public_dir = %config.public_dir.display(), "Serving default exports");

    let app = build_router(Arc::new(AppState { config }));

    info!("World map server starting on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
