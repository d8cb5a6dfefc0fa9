//! Development server for FoodShare Manager UI development
//!
//! Starts the stub backend on a fixed port and fills it with a realistic
//! dataset, so the dashboards have stores, products and orders to page
//! through.
//!
//! Usage: cargo run -p dev-server
//! Then:  cd ui && BACKEND_URL=http://127.0.0.1:8000 trunk serve

use anyhow::Result;
use test_helpers::mock::DevDataset;
use tracing::info;

const DEFAULT_PORT: u16 = 8000;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let subscriber = mock_api::telemetry::get_subscriber("info".into());
    mock_api::telemetry::init_subscriber(subscriber)?;

    info!("🚀 Starting FoodShare development server");

    let port = std::env::var("PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let app = test_helpers::spawn_app_on_port(port).await;
    info!("✅ API server running on {}", app.address());

    info!("📊 Setting up development test data...");
    let dataset = DevDataset::create(&app).await?;

    info!("🎯 Development server ready!");
    info!("   API: {}", app.address());
    info!("   UI:  cd ui && BACKEND_URL={} trunk serve", app.address());
    info!(
        "   Login: {} / {}",
        mock_api::DEFAULT_ADMIN_EMAIL,
        mock_api::DEFAULT_ADMIN_PASSWORD
    );
    info!("");
    dataset.print_summary();
    info!("");
    info!("👋 Press Ctrl+C to shutdown");

    tokio::signal::ctrl_c().await?;
    info!("🛑 Shutting down development server");
    Ok(())
}
