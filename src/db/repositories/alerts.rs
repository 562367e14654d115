use crate::{
    db::models::alert_models::{Alert, AlertStatus},
    error::Error,
};
use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Alerts repository for handling alert lifecycle operations. Vote counters
/// and status transitions are owned by the votes repository and never
/// touched here.
#[derive(Clone)]
pub struct AlertsRepository {
    pool: Arc<PgPool>,
}

impl AlertsRepository {
    /// Create a new alerts repository
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create a new alert
    pub async fn create(&self, alert: &Alert) -> Result<Alert> {
        info!("Creating new alert in category: {}", alert.category);

        let result = sqlx::query_as::<_, Alert>(
            r#"
            INSERT INTO alerts (
                id, category, description, latitude, longitude, photo_url,
                status, confirmations, reports, created_at, updated_at, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, category, description, latitude, longitude, photo_url, status,
                      confirmations, reports, last_confirmed_at, created_at, updated_at, created_by
            "#,
        )
        .bind(alert.id)
        .bind(&alert.category)
        .bind(&alert.description)
        .bind(alert.latitude)
        .bind(alert.longitude)
        .bind(&alert.photo_url)
        .bind(alert.status)
        .bind(alert.confirmations)
        .bind(alert.reports)
        .bind(alert.created_at)
        .bind(alert.updated_at)
        .bind(alert.created_by)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to create alert: {}", e)))?;

        Ok(result)
    }

    /// Get alert by ID
    pub async fn get_by_id(&self, id: &Uuid) -> Result<Option<Alert>> {
        let result = sqlx::query_as::<_, Alert>(
            r#"
            SELECT id, category, description, latitude, longitude, photo_url, status,
                   confirmations, reports, last_confirmed_at, created_at, updated_at, created_by
            FROM alerts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get alert by ID: {}", e)))?;

        Ok(result)
    }

    /// List alerts, newest first, optionally filtered by status
    pub async fn list(&self, status: Option<AlertStatus>, limit: Option<i64>) -> Result<Vec<Alert>> {
        let limit = limit.unwrap_or(100);

        let result = match status {
            Some(status) => {
                sqlx::query_as::<_, Alert>(
                    r#"
                    SELECT id, category, description, latitude, longitude, photo_url, status,
                           confirmations, reports, last_confirmed_at, created_at, updated_at, created_by
                    FROM alerts
                    WHERE status = $1
                    ORDER BY created_at DESC
                    LIMIT $2
                    "#,
                )
                .bind(status)
                .bind(limit)
                .fetch_all(&*self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Alert>(
                    r#"
                    SELECT id, category, description, latitude, longitude, photo_url, status,
                           confirmations, reports, last_confirmed_at, created_at, updated_at, created_by
                    FROM alerts
                    ORDER BY created_at DESC
                    LIMIT $1
                    "#,
                )
                .bind(limit)
                .fetch_all(&*self.pool)
                .await
            }
        }
        .map_err(|e| Error::Database(format!("Failed to list alerts: {}", e)))?;

        Ok(result)
    }

    /// Update the editable description fields of an alert
    pub async fn update(&self, alert: &Alert) -> Result<Alert> {
        let result = sqlx::query_as::<_, Alert>(
            r#"
            UPDATE alerts
            SET category = $1, description = $2, photo_url = $3, updated_at = $4
            WHERE id = $5
            RETURNING id, category, description, latitude, longitude, photo_url, status,
                      confirmations, reports, last_confirmed_at, created_at, updated_at, created_by
            "#,
        )
        .bind(&alert.category)
        .bind(&alert.description)
        .bind(&alert.photo_url)
        .bind(Utc::now())
        .bind(alert.id)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to update alert: {}", e)))?;

        Ok(result)
    }

    /// Delete alert; the vote ledger rows go with it
    pub async fn delete(&self, id: &Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM alerts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to delete alert: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
