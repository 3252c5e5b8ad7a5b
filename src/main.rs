// Main entry point - Dependency injection and server setup
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sensor_plot::application::plot_service::PlotService;
use sensor_plot::application::refresh::run_refresh_loop;
use sensor_plot::domain::palette::Palette;
use sensor_plot::infrastructure::config::load_app_config;
use sensor_plot::infrastructure::gateway_client::GatewayClient;
use sensor_plot::presentation::app_state::AppState;
use sensor_plot::presentation::handlers::build_router;
use sensor_plot::PlotReducer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sensor_plot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = load_app_config().context("Failed to load configuration")?;
    let timezone = config.display.timezone()?;
    tracing::info!(
        gateway = %config.gateway.base_url,
        timezone = %timezone,
        refresh_secs = config.refresh.interval_secs,
        "Configuration loaded"
    );

    // Create gateway client (infrastructure layer)
    let gateway = Arc::new(
        GatewayClient::new(&config.gateway.base_url, config.gateway.timeout())
            .context("Failed to create gateway client")?,
    );

    // Create services (application layer)
    let plot_service = PlotService::new(
        gateway,
        PlotReducer::new(timezone),
        Palette::new(config.display.palette.clone()),
        config.refresh.default_period_secs,
        config.refresh.max_tracked_periods,
    );

    tokio::spawn(run_refresh_loop(plot_service.clone(), config.refresh.interval()));

    // Build router (presentation layer)
    let router = build_router(Arc::new(AppState { plot_service }));

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.server.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.listen_addr))?;
    tracing::info!(address = %config.server.listen_addr, "Starting sensor-plot service");

    axum::serve(listener, router).await?;

    Ok(())
}
