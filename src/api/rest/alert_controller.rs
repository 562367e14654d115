use crate::api::rest::{ApiError, ApiResult, AppState};
use crate::db::models::alert_models::{Alert, AlertStatus};
use crate::db::models::vote_models::VoteKind;
use crate::db::repositories::alerts::AlertsRepository;
use crate::db::repositories::votes::VotesRepository;
use crate::error::Error;
use crate::security::Claims;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use log::info;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/api/alerts", get(list_alerts).post(create_alert))
        .route(
            "/api/alerts/:id",
            get(get_alert).put(update_alert).delete(delete_alert),
        )
        .route("/api/alerts/:id/vote", post(cast_vote))
}

#[derive(Debug, Deserialize)]
pub struct ListAlertsParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAlertRequest {
    pub category: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub photo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAlertRequest {
    pub category: Option<String>,
    pub description: Option<String>,
    pub photo_url: Option<String>,
}

/// Wire shape of a vote: `{ "type": "CONFIRM" }` or `{ "type": "REPORT" }`.
#[derive(Debug, Deserialize)]
pub struct CastVoteRequest {
    #[serde(rename = "type")]
    pub vote_type: String,
}

async fn list_alerts(
    State(state): State<AppState>,
    Query(params): Query<ListAlertsParams>,
) -> ApiResult<Json<Vec<Alert>>> {
    let status = match params.status.as_deref() {
        Some(value) => Some(AlertStatus::parse(value).ok_or_else(|| {
            ApiError::from(Error::Validation(format!("Invalid status filter: {}", value)))
        })?),
        None => None,
    };

    if params.limit.map_or(false, |limit| limit < 0) {
        return Err(Error::Validation("Limit must not be negative".to_string()).into());
    }

    let repo = AlertsRepository::new(Arc::clone(&state.db_pool));
    let alerts = repo.list(status, params.limit).await?;

    Ok(Json(alerts))
}

async fn create_alert(
    State(state): State<AppState>,
    claims: Claims,
    Json(request): Json<CreateAlertRequest>,
) -> ApiResult<(StatusCode, Json<Alert>)> {
    if request.category.trim().is_empty() {
        return Err(Error::Validation("Category must not be empty".to_string()).into());
    }

    if !(-90.0..=90.0).contains(&request.latitude) {
        return Err(Error::Validation("Latitude must be between -90 and 90".to_string()).into());
    }

    if !(-180.0..=180.0).contains(&request.longitude) {
        return Err(
            Error::Validation("Longitude must be between -180 and 180".to_string()).into(),
        );
    }

    let user_id = claims.user_id().map_err(|_| {
        ApiError::from(Error::Authentication("Invalid token subject".to_string()))
    })?;

    let now = Utc::now();
    let alert = Alert {
        id: Uuid::new_v4(),
        category: request.category,
        description: request.description,
        latitude: request.latitude,
        longitude: request.longitude,
        photo_url: request.photo_url,
        status: AlertStatus::Active,
        confirmations: 0,
        reports: 0,
        last_confirmed_at: None,
        created_at: now,
        updated_at: now,
        created_by: user_id,
    };

    let repo = AlertsRepository::new(Arc::clone(&state.db_pool));
    let created = repo.create(&alert).await?;

    info!("Alert created: {} ({})", created.id, created.category);

    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_alert(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Alert>> {
    let repo = AlertsRepository::new(Arc::clone(&state.db_pool));
    let alert = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::from(Error::NotFound(format!("Alert not found: {}", id))))?;

    Ok(Json(alert))
}

async fn update_alert(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAlertRequest>,
) -> ApiResult<Json<Alert>> {
    let repo = AlertsRepository::new(Arc::clone(&state.db_pool));
    let mut alert = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::from(Error::NotFound(format!("Alert not found: {}", id))))?;

    if !claims.can_modify(&alert.created_by) {
        return Err(
            Error::Authorization("Only the alert's author or an admin may modify it".to_string())
                .into(),
        );
    }

    if let Some(category) = request.category {
        if category.trim().is_empty() {
            return Err(Error::Validation("Category must not be empty".to_string()).into());
        }
        alert.category = category;
    }

    if let Some(description) = request.description {
        alert.description = description;
    }

    if let Some(photo_url) = request.photo_url {
        alert.photo_url = Some(photo_url);
    }

    let updated = repo.update(&alert).await?;

    Ok(Json(updated))
}

async fn delete_alert(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let repo = AlertsRepository::new(Arc::clone(&state.db_pool));
    let alert = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::from(Error::NotFound(format!("Alert not found: {}", id))))?;

    if !claims.can_modify(&alert.created_by) {
        return Err(
            Error::Authorization("Only the alert's author or an admin may delete it".to_string())
                .into(),
        );
    }

    repo.delete(&id).await?;

    info!("Alert deleted: {}", id);

    Ok(StatusCode::NO_CONTENT)
}

async fn cast_vote(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
    Json(request): Json<CastVoteRequest>,
) -> ApiResult<Json<Alert>> {
    // Reject malformed vote kinds before touching the database.
    let kind = VoteKind::parse(&request.vote_type).ok_or_else(|| {
        ApiError::from(Error::Validation(format!(
            "Invalid vote type: {}",
            request.vote_type
        )))
    })?;

    let user_id = claims.user_id().map_err(|_| {
        ApiError::from(Error::Authentication("Invalid token subject".to_string()))
    })?;

    let repo = VotesRepository::new(Arc::clone(&state.db_pool), state.resolution_policy);
    let alert = repo.cast_vote(&id, &user_id, kind).await?;

    info!(
        "Vote recorded: user={} alert={} kind={:?} status={:?}",
        user_id, id, kind, alert.status
    );

    Ok(Json(alert))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::rest::test_state;

    // Bad query parameters must come back as 400 without a database round
    // trip; the lazy test pool would fail any query it saw.
    #[tokio::test]
    async fn negative_limit_is_rejected_as_invalid() {
        let state = test_state();
        let params = ListAlertsParams {
            status: None,
            limit: Some(-1),
        };

        let err = list_alerts(State(state), Query(params)).await.unwrap_err();
        assert_eq!(err.status, 400);
        assert!(err.message.contains("Limit"));
    }

    #[tokio::test]
    async fn unknown_status_filter_is_rejected_as_invalid() {
        let state = test_state();
        let params = ListAlertsParams {
            status: Some("open".to_string()),
            limit: None,
        };

        let err = list_alerts(State(state), Query(params)).await.unwrap_err();
        assert_eq!(err.status, 400);
        assert!(err.message.contains("status"));
    }

    #[tokio::test]
    async fn junk_vote_type_is_rejected_before_any_read() {
        let state = test_state();
        let claims = crate::security::Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            name: "marie".to_string(),
            role: "resident".to_string(),
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
            iat: chrono::Utc::now().timestamp() as usize,
        };
        let request = CastVoteRequest {
            vote_type: "UPVOTE".to_string(),
        };

        let err = cast_vote(
            State(state),
            claims,
            Path(uuid::Uuid::new_v4()),
            Json(request),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, 400);
        assert!(err.message.contains("UPVOTE"));
    }
}
