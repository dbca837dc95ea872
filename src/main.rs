use tracing::info;
use tracing_subscriber::FmtSubscriber;

use eventhub::{app, config::AppConfig, errors::Result, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing::subscriber::set_global_default(FmtSubscriber::default()).unwrap();

    let config = AppConfig::from_env();
    let bind_addr = config.bind_addr.clone();
    let state = AppState::init(config).await?;

    info!("Starting server");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Serving eventhub at http://{}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;

    Ok(())
}
