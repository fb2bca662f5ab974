use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info};

use product_service::{
    app::product::{handler::AppState, seed},
    connect_repository,
    core::router::build_app,
    infrastructure::{config::AppConfig, logger::Logger},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    Logger::init(&config.logging);

    info!("Starting product service...");

    let repository = connect_repository(&config.database).await.map_err(|e| {
        error!("Failed to connect to store: {}", e);
        e
    })?;

    // 开始接受请求之前执行一次
    seed::initialize(repository.as_ref())
        .await
        .context("failed to initialize products table")?;

    let app = build_app(AppState::new(repository), &config)?;

    let listener = TcpListener::bind(config.server.socket_addr()?).await?;
    let addr = listener.local_addr()?;

    info!("🚀 Product service running on http://{}", addr);
    info!("📖 Endpoints:");
    info!("   GET    /               - Greeting");
    info!("   GET    /health         - Health check");
    info!("   GET    /products       - List products");
    info!("   POST   /products       - Create product");
    info!("   GET    /products/:id   - Get product by ID");
    info!("   PUT    /products/:id   - Replace product");
    info!("   DELETE /products/:id   - Delete product");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Product service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
