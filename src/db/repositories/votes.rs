use crate::{
    db::models::alert_models::{Alert, AlertStatus, ResolutionPolicy},
    db::models::vote_models::{AlertVote, VoteKind},
    error::Error,
};
use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Vote ledger and alert aggregator.
///
/// Owns the one-vote-per-user-per-alert ledger and the denormalized
/// confirmation/report counters on the alert row. Every mutation runs in a
/// single transaction that locks the alert row first, so concurrent casts
/// against the same alert serialize; the UNIQUE (alert_id, user_id)
/// constraint backstops the ledger against duplicate rows.
#[derive(Clone)]
pub struct VotesRepository {
    pool: Arc<PgPool>,
    policy: ResolutionPolicy,
}

impl VotesRepository {
    /// Create a new votes repository with the given resolution thresholds
    pub fn new(pool: Arc<PgPool>, policy: ResolutionPolicy) -> Self {
        Self { pool, policy }
    }

    /// Apply one user's vote to an alert and re-evaluate auto-resolution.
    ///
    /// A first vote creates a ledger row and bumps the matching counter; a
    /// repeat of the same kind is rejected without touching anything; a vote
    /// of the other kind replaces the ledger row and moves one count across.
    /// Returns the updated alert, possibly freshly resolved.
    pub async fn cast_vote(&self, alert_id: &Uuid, user_id: &Uuid, kind: VoteKind) -> Result<Alert> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Error::Database(format!("Failed to begin vote transaction: {}", e)))?;

        // Lock the alert row; concurrent casts for the same alert queue here.
        let alert = sqlx::query_as::<_, Alert>(
            r#"
            SELECT id, category, description, latitude, longitude, photo_url, status,
                   confirmations, reports, last_confirmed_at, created_at, updated_at, created_by
            FROM alerts
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(alert_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| Error::Database(format!("Failed to load alert for voting: {}", e)))?
        .ok_or_else(|| Error::NotFound(format!("Alert not found: {}", alert_id)))?;

        let existing = sqlx::query_as::<_, AlertVote>(
            r#"
            SELECT id, alert_id, user_id, kind, created_at
            FROM alert_votes
            WHERE alert_id = $1 AND user_id = $2
            "#,
        )
        .bind(alert_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| Error::Database(format!("Failed to look up existing vote: {}", e)))?;

        let mut confirmations = alert.confirmations;
        let mut reports = alert.reports;

        if let Some(prior) = existing {
            if prior.kind == kind {
                // Dropping the transaction rolls it back untouched.
                return Err(
                    Error::Conflict("User already voted this way on this alert".to_string()).into(),
                );
            }

            sqlx::query("DELETE FROM alert_votes WHERE id = $1")
                .bind(prior.id)
                .execute(&mut *tx)
                .await
                .map_err(|e| Error::Database(format!("Failed to replace existing vote: {}", e)))?;

            match prior.kind {
                VoteKind::Confirm => confirmations -= 1,
                VoteKind::Report => reports -= 1,
            }
        }

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO alert_votes (id, alert_id, user_id, kind, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(alert_id)
        .bind(user_id)
        .bind(kind)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Error::Conflict("Vote already recorded for this user and alert".to_string())
            }
            _ => Error::Database(format!("Failed to record vote: {}", e)),
        })?;

        let mut last_confirmed_at = alert.last_confirmed_at;
        match kind {
            VoteKind::Confirm => {
                confirmations += 1;
                last_confirmed_at = Some(now);
            }
            VoteKind::Report => reports += 1,
        }

        // Resolution is one-way; an already resolved alert stays resolved.
        let status = if alert.status == AlertStatus::Active
            && self.policy.should_resolve(confirmations, reports)
        {
            AlertStatus::Resolved
        } else {
            alert.status
        };

        let updated = sqlx::query_as::<_, Alert>(
            r#"
            UPDATE alerts
            SET confirmations = $1, reports = $2, status = $3, last_confirmed_at = $4, updated_at = $5
            WHERE id = $6
            RETURNING id, category, description, latitude, longitude, photo_url, status,
                      confirmations, reports, last_confirmed_at, created_at, updated_at, created_by
            "#,
        )
        .bind(confirmations)
        .bind(reports)
        .bind(status)
        .bind(last_confirmed_at)
        .bind(now)
        .bind(alert_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| Error::Database(format!("Failed to update alert counters: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| Error::Database(format!("Failed to commit vote transaction: {}", e)))?;

        if alert.status == AlertStatus::Active && updated.status == AlertStatus::Resolved {
            info!(
                "Alert {} auto-resolved at {} reports / {} confirmations",
                alert_id, updated.reports, updated.confirmations
            );
        }

        Ok(updated)
    }

    /// Get the vote a user holds on an alert, if any
    pub async fn find_for_user(&self, alert_id: &Uuid, user_id: &Uuid) -> Result<Option<AlertVote>> {
        let result = sqlx::query_as::<_, AlertVote>(
            r#"
            SELECT id, alert_id, user_id, kind, created_at
            FROM alert_votes
            WHERE alert_id = $1 AND user_id = $2
            "#,
        )
        .bind(alert_id)
        .bind(user_id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get vote for user: {}", e)))?;

        Ok(result)
    }

    /// Count surviving ledger rows of one kind for an alert
    pub async fn count_by_kind(&self, alert_id: &Uuid, kind: VoteKind) -> Result<i64> {
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM alert_votes
            WHERE alert_id = $1 AND kind = $2
            "#,
        )
        .bind(alert_id)
        .bind(kind)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to count votes: {}", e)))?;

        Ok(result)
    }
}
