//! Nutrition guide HTTP server
//!
//! Applies the catalog schema, opens the catalog read-only and serves the
//! guide API until CTRL+C.
//!
//! Usage:
//!   cargo run --release --bin nutriguide_server
//!
//! Environment variables:
//!   NUTRIGUIDE_DB_PATH - SQLite catalog path (default: data/nutriguide.db)
//!   NUTRIGUIDE_SCHEMA_DIR - Migration directory (default: sql)
//!   HOST / PORT - Bind address (default: 0.0.0.0:3000)
//!   RUST_LOG - Log filter (default: info)

use dotenv::dotenv;
use log::{error, info};
use nutriguide::config::Config;
use nutriguide::http::create_router;
use nutriguide::service::GuideService;
use nutriguide::store::{run_schema_migrations, SqliteCatalog};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = Config::from_env()?;
    let addr = config.bind_addr()?;

    info!("🚀 Starting nutrition guide server");
    info!("📊 Configuration:");
    info!("   ├─ Database: {}", config.db_path);
    info!("   ├─ Schema dir: {}", config.schema_dir);
    info!("   ├─ Bind: {}", addr);
    info!(
        "   └─ Log filter: {}",
        config.rust_log.as_deref().unwrap_or("info (default)")
    );

    if let Some(parent) = Path::new(&config.db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    info!("🔧 Initializing database...");
    let mut conn = Connection::open(&config.db_path)?;
    run_schema_migrations(&mut conn, &config.schema_dir)?;
    drop(conn);

    let catalog = SqliteCatalog::open_read_only(&config.db_path)?;
    let service = Arc::new(GuideService::new(catalog));
    let router = create_router(service);

    let listener = TcpListener::bind(addr).await?;
    info!("✅ Listening on http://{}", addr);
    info!("📝 Available endpoints:");
    info!("   ├─ GET  /api/health");
    info!("   ├─ GET  /api/db-test");
    info!("   ├─ GET  /api/ingredients/search?q=<query>");
    info!("   ├─ GET  /api/ingredients/:name/compatibility?filter=<all|avoid|beneficial>");
    info!("   ├─ POST /api/diseases/guide");
    info!("   └─ GET  /api/diseases");
    info!("🔄 Press CTRL+C to shutdown gracefully");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("✅ Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("⚠️  Received CTRL+C, shutting down..."),
        Err(err) => error!("❌ Failed to listen for CTRL+C: {}", err),
    }
}
