use anyhow::Result;
use axum::{Router, serve};
use dotenv::dotenv;
use portfolio_proxy::{api::config::BIND_ADDRESS, mcp::PortfolioMCPFactory};
use rmcp::transport::{
    StreamableHttpServerConfig, StreamableHttpService,
    streamable_http_server::session::local::LocalSessionManager,
};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load variables from .env file if it exists into the environment
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".to_string().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Built once so missing configuration stops startup; sessions get clones
    let factory = PortfolioMCPFactory::new()?;

    info!("Setting up the Streamable HTTP Service for the portfolio tools");
    let service = StreamableHttpService::new(
        move || Ok(factory.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );

    // Starting the server... Setting up the router and TCP listener
    let bind_address = BIND_ADDRESS.as_str();
    info!("Starting server on {}", bind_address);
    let router = Router::new().nest_service("/mcp", service);
    let tcp_listener = TcpListener::bind(bind_address).await?;

    // Graceful shutdown on CTRL+C
    let shutdown = async {
        signal::ctrl_c().await.unwrap_or_else(|e| {
            error!("failed to install CTRL+C handler: {e}");
        });
    };

    serve(tcp_listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
