//! `fotad` — the firmware-over-the-air lookup server.
//!
//! Usage:
//!   fotad -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/fota/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod config;
mod routes;

use std::sync::Arc;

use clap::Parser;
use fota_core::Module;
use tracing::info;

use config::ServerConfig;

/// Firmware OTA server.
#[derive(Parser, Debug)]
#[command(name = "fotad", about = "Firmware OTA lookup and download server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address (overrides `server.listen` from the config file).
    #[arg(long = "listen")]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;
    server_config.verify()?;

    let service_config = server_config.service_config(cli.listen.as_deref());
    if let Some(data_dir) = &service_config.data_dir {
        std::fs::create_dir_all(data_dir)?;
    }

    // Initialize storage.
    let sqlite_path = service_config.resolve_sqlite_path();
    let sql: Arc<dyn fota_sql::SQLStore> = Arc::new(
        fota_sql::SqliteStore::open(&sqlite_path)
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );
    info!("Firmware database at {}", sqlite_path.display());

    let fota_module = fota::FotaModule::new(Arc::clone(&sql), server_config.manifest.clone())
        .map_err(|e| anyhow::anyhow!("failed to initialize fota module: {}", e))?;
    info!("{} module initialized", fota_module.name());

    let app = routes::build_router(vec![(fota_module.name(), fota_module.routes())]);

    // Start server.
    let listener = tokio::net::TcpListener::bind(&service_config.listen).await?;
    info!("fotad listening on {}", service_config.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
