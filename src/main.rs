use crate::db::models::alert_models::ResolutionPolicy;
use crate::db::DatabaseService;
use crate::security::auth::AuthService;
use crate::security::SecurityService;
use anyhow::Result;
use log::{error, info};
use std::sync::Arc;

mod api;
mod config;
mod db;
mod error;
mod security;

pub use error::Error;

async fn run_app() -> Result<()> {
    // Initialize logging
    env_logger::init();
    info!("Starting Viillaage alert service");

    // Config file comes from the first argument or VIILLAAGE_CONFIG;
    // without either, built-in defaults apply.
    let config_path = config::resolve_config_path(std::env::args().skip(1));
    if let Some(path) = &config_path {
        info!("Loading configuration from {}", path.display());
    }
    let config = config::load_config(config_path.as_deref())?;
    info!("Configuration loaded");

    // Connect to the database; migrations run on startup when enabled
    let db_service = Arc::new(DatabaseService::new(&config.database).await?);

    // Create auth and token services
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&db_service.pool),
        &config.security,
    ));
    let security_service = Arc::new(SecurityService::new(config.security.clone()));

    let resolution_policy = ResolutionPolicy::from(config.alerts);

    // Start the REST API
    let http_server = api::rest::RestApi::new(
        &config.api,
        Arc::clone(&db_service),
        auth_service,
        security_service,
        resolution_policy,
    )?;

    tokio::select! {
        result = http_server.run() => {
            if let Err(e) = result {
                error!("API server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down...");
        }
    }

    db_service.close().await;

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}
