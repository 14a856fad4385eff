use anyhow::Context;
use parkwise_api::{app, worker::start_status_ticker, AppState};
use parkwise_assistant::AssistantBridge;
use parkwise_store::{app_config::Config, LotStore};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parkwise_api=debug,parkwise_store=info,parkwise_assistant=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting ParkWise API on port {}", config.server.port);
    tracing::debug!("Config: {:?}", config);

    let lot = Arc::new(LotStore::from_config(&config.lot, config.tariff.clone()));
    let assistant = Arc::new(AssistantBridge::from_config(&config.assistant));
    let app_state = AppState::new(lot, assistant);

    tokio::spawn(start_status_ticker(
        app_state.lot.clone(),
        app_state.status_tx.clone(),
        Duration::from_millis(config.ticker.interval_ms.max(1)),
    ));

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
