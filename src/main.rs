use anyhow::Context;
use expense_tracker::{config, logging, relay};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env.local first so it wins over .env; neither is required
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::dotenv();

    let config = config::config();
    logging::init(&config.logging.level);
    tracing::info!("Starting OTP relay in {:?} mode", config.environment);

    let state = relay::RelayState::from_config(&config.relay)?;
    let app = relay::app(state);

    let bind_addr = format!("0.0.0.0:{}", config.relay.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    println!("🚀 OTP relay listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("relay server")?;
    Ok(())
}
