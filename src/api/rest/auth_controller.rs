use crate::api::rest::{ApiError, ApiResult, AppState};
use crate::db::models::user_models::{AuthToken, LoginCredentials, User};
use crate::error::Error;
use crate::security::Claims;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use log::info;
use serde::{Deserialize, Serialize};

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(get_current_user))
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: AuthToken,
}

async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    if request.username.trim().is_empty() {
        return Err(Error::Validation("Username must not be empty".to_string()).into());
    }

    if request.email.trim().is_empty() || !request.email.contains('@') {
        return Err(Error::Validation("A valid email address is required".to_string()).into());
    }

    if request.password.is_empty() {
        return Err(Error::Validation("Password must not be empty".to_string()).into());
    }

    let user = state
        .auth_service
        .register(
            &request.username,
            &request.email,
            &request.password,
            request.display_name,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<LoginCredentials>,
) -> ApiResult<Json<LoginResponse>> {
    let (user, token) = state.auth_service.login(&credentials).await?;

    info!("Login succeeded for {}", user.username);

    Ok(Json(LoginResponse { user, token }))
}

async fn get_current_user(
    State(state): State<AppState>,
    claims: Claims,
) -> ApiResult<Json<User>> {
    let user_id = claims.user_id().map_err(|_| {
        ApiError::from(Error::Authentication("Invalid token subject".to_string()))
    })?;

    let user = state.auth_service.current_user(&user_id).await?;

    Ok(Json(user))
}
