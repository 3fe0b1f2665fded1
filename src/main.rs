use std::net::SocketAddr;
use std::sync::Arc;

use storefront::cart::AppState;
use storefront::config::AppConfig;
use storefront::payment::SimulatedGateway;
use storefront::router::create_app_router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,storefront=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // No live payment provider is wired in; the simulated widget answers every session.
    let gateway = SimulatedGateway::new(
        config.widget_src.clone(),
        config.widget_load.clone(),
        config.simulation,
    );
    tracing::info!(simulation = ?config.simulation, load = ?config.widget_load, merchant = %config.checkout.merchant_name, "payment widget configured");

    // Initialize application state
    let state = Arc::new(AppState::new(Arc::new(gateway), config.checkout.clone()));

    // Build application router with all routes and middleware
    let app = create_app_router(state);

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
