use anyhow::Result;
use sqlx::{Executor, PgPool};
use tracing::info;

/// Schema migrations, applied in order on startup. Each file may hold
/// several statements; all of them are idempotent.
const MIGRATIONS: &[(&str, &str)] = &[
    (
        "001_create_users.sql",
        include_str!("sql/001_create_users.sql"),
    ),
    (
        "002_create_alerts.sql",
        include_str!("sql/002_create_alerts.sql"),
    ),
    (
        "003_create_alert_votes.sql",
        include_str!("sql/003_create_alert_votes.sql"),
    ),
];

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    for (name, sql) in MIGRATIONS {
        pool.execute(*sql).await?;
        info!("Applied migration: {}", name);
    }

    Ok(())
}
