//! Folio Kernel
//!
//! HTTP server for block-composed pages and blog posts.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use folio_kernel::config::Config;
use folio_kernel::gateway::{MemoryPageGateway, PageGateway, PgPageGateway};
use folio_kernel::routes;
use folio_kernel::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    info!("Starting Folio kernel");

    // Load configuration from environment
    let config = Config::from_env().context("failed to load configuration")?;
    info!(port = config.port, "Configuration loaded");

    let gateway = connect_gateway(&config).await?;

    let state = AppState::new(&config, gateway).context("failed to initialize application state")?;

    let app = routes::app(state);

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind to address")?;

    info!(%addr, "Server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// Open the configured document store and make sure its schema exists.
async fn connect_gateway(config: &Config) -> Result<Arc<dyn PageGateway>> {
    let Some(url) = &config.database_url else {
        warn!("DATABASE_URL not set; documents are kept in memory and lost on exit");
        return Ok(Arc::new(MemoryPageGateway::new()));
    };

    let gateway = PgPageGateway::connect(url, config.database_max_connections)
        .await
        .context("failed to connect to PostgreSQL")?;
    gateway
        .ensure_schema()
        .await
        .context("failed to prepare page_document schema")?;

    info!("PostgreSQL connection established");
    Ok(Arc::new(gateway))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug,sqlx=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
