use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use wardline::api::api_router;
use wardline::{config, CoreState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let core = Arc::new(CoreState::new()?);
    let app = api_router(core);

    let addr = config::bind_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Citizen API listening");

    axum::serve(listener, app).await?;
    Ok(())
}
