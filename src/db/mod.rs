use crate::config::DatabaseConfig;
use crate::error::Error;
use anyhow::Result;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

pub mod migrations;
pub mod models;
pub mod repositories;

/// Owns the PostgreSQL pool behind every repository and applies the
/// embedded schema migrations on startup.
pub struct DatabaseService {
    pub pool: Arc<PgPool>,
}

impl DatabaseService {
    /// Connect the pool; runs migrations when `auto_migrate` is set
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        info!(
            "Connecting to PostgreSQL (pool size {})",
            config.max_connections
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(&config.url)
            .await
            .map_err(|e| Error::Database(format!("Failed to connect to database: {}", e)))?;

        let service = Self {
            pool: Arc::new(pool),
        };

        if config.auto_migrate {
            service.migrate().await?;
        } else {
            info!("Automatic migrations disabled; assuming schema is current");
        }

        Ok(service)
    }

    /// Apply the embedded migrations in order
    pub async fn migrate(&self) -> Result<()> {
        migrations::run_migrations(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to run migrations: {}", e)))?;

        info!("Database schema is up to date");

        Ok(())
    }

    /// Liveness check behind the health endpoint; a failed ping is reported
    /// as unhealthy rather than propagated
    pub async fn health_check(&self) -> Result<bool> {
        match sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&*self.pool)
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                error!("Database health check failed: {}", e);
                Ok(false)
            }
        }
    }

    /// Drain the pool on shutdown
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
